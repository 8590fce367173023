//! Blocking HTTP access over an owned async runtime.

use std::fmt;
use std::time::Duration;

use tokio::runtime::Runtime;

use crate::SourceError;

/// Browser-like user agent; some registration sites reject unknown clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/141.0.0.0 Safari/537.36";

/// Timeout for roster pages, which are fetched once per run.
pub const PAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client with its own runtime.
///
/// # Thread Safety
///
/// `get_text` may be called from many threads at once; each call blocks the
/// calling thread on its own request while sharing the connection pool.
pub struct HttpFetcher {
    http: reqwest::Client,
    runtime: Runtime,
}

impl fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFetcher").finish_non_exhaustive()
    }
}

impl HttpFetcher {
    /// Creates a fetcher sending `user_agent` with every request.
    pub fn new(user_agent: &str) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(SourceError::ClientBuild)?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(SourceError::Runtime)?;
        Ok(Self { http, runtime })
    }

    /// Fetches `url` with `query` parameters and returns the body as text.
    pub fn get_text(
        &self,
        url: &str,
        query: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<String, SourceError> {
        let request_error = |source: reqwest::Error| {
            if source.is_timeout() {
                SourceError::Timeout {
                    url: url.to_string(),
                }
            } else {
                SourceError::Request {
                    url: url.to_string(),
                    source,
                }
            }
        };

        self.runtime.block_on(async {
            tracing::debug!(url, ?query, "GET");
            let response = self
                .http
                .get(url)
                .query(query)
                .timeout(timeout)
                .send()
                .await
                .map_err(request_error)?;

            let status = response.status();
            if !status.is_success() {
                return Err(SourceError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }
            response.text().await.map_err(request_error)
        })
    }
}
