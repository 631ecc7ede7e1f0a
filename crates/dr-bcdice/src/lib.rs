//! BCDice-API client for dicerelay.
//!
//! [`BcdiceClient`] implements the core's `Evaluator` port over the HTTP
//! API with server failover; [`HttpTableFetcher`] downloads uploaded table
//! files.

pub mod client;
pub mod detect;
pub mod fetch;
mod wire;

pub use client::BcdiceClient;
pub use fetch::HttpTableFetcher;
