//! Table providers for race records.
//!
//! Adapters that turn timing-site pages and local files into
//! [`rr_core::Table`]s:
//! - Roster pages for each supported registration site
//! - Per-participant result search on the results site
//! - CSV files for offline rosters and results, and CSV output

use rr_core::{LookupError, Table, TableError};
use thiserror::Error;

pub mod file;
pub mod html;
pub mod http;
pub mod roster;
pub mod shvoong;

pub use file::{CsvResults, CsvRoster, read_csv, write_csv};
pub use http::{DEFAULT_USER_AGENT, HttpFetcher};
pub use roster::{RosterProvider, WebRoster};
pub use shvoong::{DEFAULT_RESULTS_URL, ShvoongResults};

/// Provider errors.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// Failed to start the async runtime.
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// HTTP request failed.
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The request did not complete in time.
    #[error("request to {url} timed out")]
    Timeout { url: String },
    /// The server answered with a non-success status.
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },
    /// The page has no table matching the provider's layout.
    #[error("no table matching `{selector}` found")]
    TableNotFound { selector: String },
    /// A CSS selector failed to parse.
    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },
    /// CSV read or write failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    /// The provider produced a malformed table.
    #[error(transparent)]
    Table(#[from] TableError),
}

impl SourceError {
    /// Maps a provider error onto the engine's per-lookup failure kinds.
    pub fn into_lookup_error(self, timeout: std::time::Duration) -> LookupError {
        match self {
            Self::Timeout { .. } => LookupError::Timeout(timeout),
            Self::TableNotFound { .. } => LookupError::NoData,
            Self::Table(err) => LookupError::Malformed(err),
            other => LookupError::Transport(other.to_string()),
        }
    }
}

/// A provider of roster tables.
pub trait RosterSource {
    fn fetch_roster(&self) -> Result<Table, SourceError>;
}
