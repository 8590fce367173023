//! Shared utilities for CLI commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rr_core::{ResultSource, Table};
use rr_sources::{
    CsvResults, CsvRoster, HttpFetcher, RosterSource, ShvoongResults, WebRoster, write_csv,
};

use crate::Config;
use crate::cli::{ResultsArgs, RosterArgs};

/// Creates an HTTP fetcher only when some source needs the network.
pub fn fetcher_if(needed: bool, config: &Config) -> Result<Option<HttpFetcher>> {
    if !needed {
        return Ok(None);
    }
    HttpFetcher::new(&config.user_agent)
        .map(Some)
        .context("failed to create HTTP client")
}

impl RosterArgs {
    pub const fn needs_http(&self) -> bool {
        self.roster_file.is_none()
    }

    /// Builds the roster source selected on the command line.
    pub fn source<'a>(&self, fetcher: Option<&'a HttpFetcher>) -> Result<Box<dyn RosterSource + 'a>> {
        if let Some(path) = &self.roster_file {
            return Ok(Box::new(CsvRoster::new(path)));
        }
        let (Some(provider), Some(url)) = (self.provider, &self.url) else {
            anyhow::bail!("either --roster-file or --provider with --url is required");
        };
        let fetcher = fetcher.context("roster page requires an HTTP client")?;
        Ok(Box::new(WebRoster::new(fetcher, provider, url.clone())))
    }
}

impl ResultsArgs {
    pub const fn needs_http(&self) -> bool {
        self.results_file.is_none()
    }

    /// Builds the results source selected on the command line.
    pub fn source<'a>(
        &self,
        fetcher: Option<&'a HttpFetcher>,
        config: &Config,
    ) -> Result<Box<dyn ResultSource + 'a>> {
        if let Some(path) = &self.results_file {
            let source = CsvResults::open(path, config.result_columns.clone())
                .with_context(|| format!("failed to read {}", path.display()))?;
            return Ok(Box::new(source));
        }
        let fetcher = fetcher.context("results site requires an HTTP client")?;
        Ok(Box::new(ShvoongResults::new(fetcher, config.results_url.clone())))
    }
}

/// Writes `table` as `<dir>/<name>.csv`, creating the directory.
pub fn save_table(table: &Table, dir: &Path, name: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(format!("{name}.csv"));
    write_csv(table, &path).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "saved report");
    Ok(path)
}
