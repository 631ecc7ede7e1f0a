pub mod console;
pub mod roll;

use std::sync::Arc;

use dr_bcdice::{BcdiceClient, HttpTableFetcher};
use dr_core::RelayConfig;

/// Evaluator client configured from `config`.
fn client(config: &RelayConfig) -> Arc<BcdiceClient> {
    Arc::new(BcdiceClient::new(
        config.servers.clone(),
        config.default_system.clone(),
        config.error_sensitive,
    ))
}

/// Table fetcher shared by every front-end.
fn fetcher() -> Arc<HttpTableFetcher> {
    Arc::new(HttpTableFetcher::new())
}
