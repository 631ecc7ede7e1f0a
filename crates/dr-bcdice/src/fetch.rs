//! Downloads uploaded dice table files.

use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use dr_core::{RelayError, RelayResult, TableFetcher};

/// Fetches table files over HTTP(S) or from the local file system.
///
/// `file://` URLs and bare paths are read from disk, which is what the
/// console front-end attaches.
#[derive(Debug, Clone, Default)]
pub struct HttpTableFetcher {
    http: Client,
}

impl HttpTableFetcher {
    /// Create a fetcher.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TableFetcher for HttpTableFetcher {
    async fn fetch(&self, url: &str) -> RelayResult<String> {
        debug!(url, "fetching dice table");
        if url.starts_with("http://") || url.starts_with("https://") {
            let resp = self
                .http
                .get(url)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| RelayError::Transport(format!("cannot download {url}: {e}")))?;
            return resp
                .text()
                .await
                .map_err(|e| RelayError::Transport(format!("cannot download {url}: {e}")));
        }
        let path = url.strip_prefix("file://").unwrap_or(url);
        tokio::fs::read_to_string(Path::new(path))
            .await
            .map_err(|e| RelayError::Transport(format!("cannot read {path}: {e}")))
    }
}
