//! Output of collected records: delimited files and terminal tables.

pub mod csv;
pub mod table;

pub use csv::CsvExporter;
pub use table::FixtureTable;
