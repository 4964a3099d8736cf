//! Configuration types for fpl-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Remote API endpoints and HTTP client settings
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every relative endpoint is joined onto
    /// (default: "https://fantasy.premierleague.com/drf/")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Login form URL used by the session handshake
    #[serde(default = "default_login_url")]
    pub login_url: String,

    /// `app` form field sent with the login request
    #[serde(default = "default_login_app")]
    pub login_app: String,

    /// `redirect_uri` form field sent with the login request
    #[serde(default = "default_login_redirect_uri")]
    pub login_redirect_uri: String,

    /// Per-request timeout in seconds (default: 30)
    ///
    /// A request that never resolves is failed here, so the aggregators
    /// never wait on it indefinitely.
    #[serde(default = "default_timeout", with = "duration_serde")]
    pub timeout: Duration,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            login_url: default_login_url(),
            login_app: default_login_app(),
            login_redirect_uri: default_login_redirect_uri(),
            timeout: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Bounded fan-out settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FanOutConfig {
    /// Maximum number of requests in flight at once (default: 20)
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Stop consuming results as soon as an early-abort predicate fires (default: false)
    ///
    /// Results arrive in completion order, not submission order, so an abort
    /// decided from one result can leave the aggregate incomplete and different
    /// from run to run. Only enable this when a best-effort answer is acceptable.
    #[serde(default)]
    pub early_abort: bool,
}

impl Default for FanOutConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            early_abort: false,
        }
    }
}

/// Sequential pagination settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Upper bound on pages fetched by a single walk (default: 1000)
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
        }
    }
}

/// CSV export settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory relative file names are written into (default: "./CSV")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Field delimiter (default: tab)
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            delimiter: default_delimiter(),
        }
    }
}

/// Upcoming-fixtures report settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Number of gameweeks shown after the current one (default: 6)
    #[serde(default = "default_fixture_horizon")]
    pub fixture_horizon: u32,

    /// Last gameweek of the season (default: 38)
    #[serde(default = "default_season_length")]
    pub season_length: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            fixture_horizon: default_fixture_horizon(),
            season_length: default_season_length(),
        }
    }
}

/// Main configuration for fpl-dl
///
/// Fields are organized into logical sub-configs:
/// - [`api`](ApiConfig) - endpoints, timeout, user agent
/// - [`fan_out`](FanOutConfig) - worker cap and early-abort behaviour
/// - [`pagination`](PaginationConfig) - page walk safety bound
/// - [`export`](ExportConfig) - CSV output
/// - [`report`](ReportConfig) - fixtures report shape
///
/// Every field has a default, so an empty TOML file is a valid config.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// API endpoints and HTTP client settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Bounded fan-out settings
    #[serde(default)]
    pub fan_out: FanOutConfig,

    /// Sequential pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// CSV export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Fixtures report settings
    #[serde(default)]
    pub report: ReportConfig,
}

impl Config {
    /// Load configuration from a TOML file and validate it
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| Error::Config {
            message: format!("failed to parse {}: {}", path.display(), e),
            key: None,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that would otherwise fail later in a less obvious way
    pub fn validate(&self) -> Result<()> {
        if self.fan_out.max_workers == 0 {
            return Err(Error::config(
                "max_workers must be at least 1",
                "fan_out.max_workers",
            ));
        }
        if self.pagination.max_pages == 0 {
            return Err(Error::config(
                "max_pages must be at least 1",
                "pagination.max_pages",
            ));
        }
        for (key, value) in [
            ("api.base_url", &self.api.base_url),
            ("api.login_url", &self.api.login_url),
        ] {
            url::Url::parse(value)
                .map_err(|e| Error::config(format!("invalid URL '{value}': {e}"), key))?;
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    "https://fantasy.premierleague.com/drf/".to_string()
}

fn default_login_url() -> String {
    "https://users.premierleague.com/accounts/login/".to_string()
}

fn default_login_app() -> String {
    "plfpl-web".to_string()
}

fn default_login_redirect_uri() -> String {
    "https://fantasy.premierleague.com/a/login".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_user_agent() -> String {
    concat!("fpl-dl/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_max_workers() -> usize {
    20
}

fn default_max_pages() -> u32 {
    1000
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./CSV")
}

fn default_delimiter() -> char {
    '\t'
}

fn default_fixture_horizon() -> u32 {
    6
}

fn default_season_length() -> u32 {
    38
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
