//! Per-participant search on the Shvoong results site.

use std::time::Duration;

use rr_core::{LookupError, ParticipantIdentity, ResultSource, Table};

use crate::html::extract_table;
use crate::http::HttpFetcher;

/// Search endpoint; the participant's full name goes in `q`.
pub const DEFAULT_RESULTS_URL: &str = "https://raceresults.shvoong.co.il/race-result/";

/// Looks up a participant's full race history by name.
#[derive(Debug)]
pub struct ShvoongResults<'a> {
    fetcher: &'a HttpFetcher,
    url: String,
}

impl<'a> ShvoongResults<'a> {
    pub fn new(fetcher: &'a HttpFetcher, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }

    /// Parses a search results page.
    ///
    /// A page without a results table, or with an empty one, means the
    /// participant has no recorded races.
    pub fn parse(html: &str) -> Result<Table, LookupError> {
        let table = extract_table(html, "table")
            .map_err(|err| err.into_lookup_error(Duration::ZERO))?;
        if table.is_empty() {
            return Err(LookupError::NoData);
        }
        Ok(table)
    }
}

impl ResultSource for ShvoongResults<'_> {
    fn fetch_results(
        &self,
        identity: &ParticipantIdentity,
        timeout: Duration,
    ) -> Result<Table, LookupError> {
        let query = identity.to_string();
        let html = self
            .fetcher
            .get_text(&self.url, &[("q", &query)], timeout)
            .map_err(|err| err.into_lookup_error(timeout))?;
        let table = Self::parse(&html)?;
        tracing::debug!(participant = %identity, rows = table.len(), "fetched results");
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_page_becomes_table() {
        let html = r"
            <table>
              <thead><tr><th>תאריך אירוע</th><th>שם מרוץ</th><th>מקצה</th><th>זמן אישי</th><th>תוצאה</th></tr></thead>
              <tbody><tr><td>01/02/2025</td><td>מרוץ העמק</td><td>10000</td><td>00:48:10</td><td>00:48:30</td></tr></tbody>
            </table>
        ";
        let table = ShvoongResults::parse(html).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows().next().unwrap().get("מקצה"), Some("10000"));
    }

    #[test]
    fn page_without_results_is_no_data() {
        assert_eq!(
            ShvoongResults::parse("<p>לא נמצאו תוצאות</p>"),
            Err(LookupError::NoData)
        );
        assert_eq!(
            ShvoongResults::parse("<table><thead><tr><th>a</th></tr></thead><tbody></tbody></table>"),
            Err(LookupError::NoData)
        );
    }
}
