//! Delimited-text writer for collected records
//!
//! Any `Serialize` record works: each record is turned into a JSON object and
//! the first record's field names, in API order, become the header row.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, warn};

use crate::config::ExportConfig;
use crate::error::Result;

/// Suffix of the file written before the final rename
const PARTIAL_SUFFIX: &str = ".part";

/// Writer for delimiter-separated exports
#[derive(Clone, Debug)]
pub struct CsvExporter {
    output_dir: PathBuf,
    delimiter: char,
}

impl CsvExporter {
    /// Create an exporter from the export section of the config
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            delimiter: config.delimiter,
        }
    }

    /// Override the field delimiter
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Where `file` ends up: relative names go under the output directory
    pub fn output_path(&self, file: impl AsRef<Path>) -> PathBuf {
        let file = file.as_ref();
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.output_dir.join(file)
        }
    }

    /// Render records to delimited text, header first
    ///
    /// An empty slice renders as an empty string.
    pub fn render<S: Serialize>(&self, records: &[S]) -> Result<String> {
        let rows = records
            .iter()
            .map(to_object)
            .collect::<Result<Vec<_>>>()?;
        let Some(first) = rows.first() else {
            return Ok(String::new());
        };
        let headers: Vec<&str> = first.keys().map(String::as_str).collect();

        let mut out = String::new();
        self.push_line(&mut out, headers.iter().map(|h| (*h).to_string()));
        for row in &rows {
            self.push_line(
                &mut out,
                headers.iter().map(|h| cell_text(row.get(*h))),
            );
        }
        Ok(out)
    }

    /// Write records to `file`, returning the final path
    ///
    /// Data goes to `<file>.part` first and is renamed into place only
    /// after everything is flushed, so a failed export leaves no partial
    /// file under the final name.
    pub async fn write<S: Serialize>(&self, file: impl AsRef<Path>, records: &[S]) -> Result<PathBuf> {
        let path = self.output_path(file);
        if records.is_empty() {
            warn!(path = %path.display(), "No records to export");
        }
        let body = self.render(records)?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut partial = path.clone().into_os_string();
        partial.push(PARTIAL_SUFFIX);
        let partial = PathBuf::from(partial);

        let mut writer = BufWriter::new(File::create(&partial).await?);
        let written = async {
            writer.write_all(body.as_bytes()).await?;
            writer.flush().await
        }
        .await;
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e.into());
        }
        drop(writer);

        tokio::fs::rename(&partial, &path).await?;
        info!(path = %path.display(), records = records.len(), "Exported records");
        Ok(path)
    }

    fn push_line(&self, out: &mut String, cells: impl Iterator<Item = String>) {
        let mut first = true;
        for cell in cells {
            if !first {
                out.push(self.delimiter);
            }
            first = false;
            out.push_str(&self.escape(&cell));
        }
        out.push('\n');
    }

    /// Quote a value if it contains the delimiter, a quote or a line break
    fn escape(&self, value: &str) -> String {
        if value.contains(self.delimiter)
            || value.contains('"')
            || value.contains('\n')
            || value.contains('\r')
        {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }
}

fn to_object<S: Serialize>(record: &S) -> Result<Map<String, Value>> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => {
            debug!("Exporting scalar record as a single column");
            let mut map = Map::new();
            map.insert("value".to_string(), other);
            Ok(map)
        }
    }
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn exporter(dir: &Path) -> CsvExporter {
        CsvExporter::new(&ExportConfig {
            output_dir: dir.to_path_buf(),
            delimiter: '\t',
        })
    }

    #[test]
    fn header_follows_first_record_field_order() {
        let records = vec![
            json!({"round": 1, "element": 9, "total_points": 6}),
            json!({"round": 1, "element": 10, "total_points": 2}),
        ];
        let text = exporter(Path::new(".")).render(&records).unwrap();
        assert_eq!(
            text,
            "round\telement\ttotal_points\n1\t9\t6\n1\t10\t2\n"
        );
    }

    #[test]
    fn later_records_are_aligned_to_the_header() {
        let records = vec![
            json!({"a": 1, "b": 2}),
            json!({"b": 3, "c": 4}),
        ];
        let text = exporter(Path::new(".")).render(&records).unwrap();
        assert_eq!(text, "a\tb\n1\t2\n\t3\n");
    }

    #[test]
    fn values_with_delimiter_or_quotes_are_quoted() {
        let records = vec![json!({"name": "a,b", "note": "say \"hi\"", "n": null})];
        let text = exporter(Path::new("."))
            .with_delimiter(',')
            .render(&records)
            .unwrap();
        assert_eq!(text, "name,note,n\n\"a,b\",\"say \"\"hi\"\"\",\n");
    }

    #[test]
    fn empty_records_render_nothing() {
        let records: Vec<Value> = Vec::new();
        assert_eq!(exporter(Path::new(".")).render(&records).unwrap(), "");
    }

    #[test]
    fn relative_paths_go_under_output_dir() {
        let exporter = exporter(Path::new("/tmp/out"));
        assert_eq!(exporter.output_path("a.csv"), PathBuf::from("/tmp/out/a.csv"));
        assert_eq!(exporter.output_path("/abs/b.csv"), PathBuf::from("/abs/b.csv"));
    }

    #[tokio::test]
    async fn write_creates_directory_and_leaves_no_partial_file() {
        let temp = TempDir::new().unwrap();
        let exporter = exporter(&temp.path().join("CSV"));

        let path = exporter
            .write("league.csv", &[json!({"entry": 1, "rank": 1})])
            .await
            .unwrap();

        assert_eq!(path, temp.path().join("CSV").join("league.csv"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "entry\trank\n1\t1\n");
        assert!(!temp.path().join("CSV").join("league.csv.part").exists());
    }
}
