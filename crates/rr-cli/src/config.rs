//! Configuration loading and management.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use rr_core::{AliasSets, ResultColumns, RosterColumns, SelectionRules};
use rr_sources::{DEFAULT_RESULTS_URL, DEFAULT_USER_AGENT};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory saved reports are written to.
    pub output_dir: PathBuf,

    /// Per-participant lookup timeout in seconds.
    pub lookup_timeout_secs: u64,

    /// Concurrent lookups; unset uses one per CPU.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<usize>,

    /// Results-site search endpoint.
    pub results_url: String,

    /// User agent sent to timing sites.
    pub user_agent: String,

    /// Distance label aliases.
    #[serde(default)]
    pub aliases: AliasSets,

    /// Column names of result tables.
    #[serde(default)]
    pub result_columns: ResultColumns,

    /// Column names of roster tables.
    #[serde(default)]
    pub roster_columns: RosterColumns,

    /// Rows excluded from best selection.
    #[serde(default)]
    pub selection: SelectionRules,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            output_dir: data_dir.join("results"),
            lookup_timeout_secs: 10,
            parallelism: None,
            results_url: DEFAULT_RESULTS_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            aliases: AliasSets::default(),
            result_columns: ResultColumns::default(),
            roster_columns: RosterColumns::default(),
            selection: SelectionRules::default(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (RR_*)
        figment = figment.merge(Env::prefixed("RR_"));

        figment.extract()
    }

    pub const fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }
}

/// Returns the platform-specific config directory for rr.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("rr"))
}

/// Returns the platform-specific data directory for rr.
///
/// On Linux: `~/.local/share/rr`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("rr"))
}
