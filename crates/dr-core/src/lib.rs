//! Chat-platform-independent core of the dicerelay bot.
//!
//! Classifies chat messages into keyword commands (`bcdice ...`) and roll
//! requests, plans rolls (repeats, per-target rolls, custom tables), talks to
//! a dice [`Evaluator`] through a trait, stores secret results per user and
//! splits every reply to the platform's length limit.

pub mod admin;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod help;
pub mod normalize;
pub mod orchestrator;
pub mod policy;
pub mod relay;
pub mod roll;
pub mod router;
pub mod secret;
pub mod session;
pub mod split;
pub mod table;

#[cfg(test)]
mod testing;

pub use config::RelayConfig;
pub use error::{RelayError, RelayResult};
pub use evaluator::{Attachment, Evaluator, SystemInfo, TableFetcher, VersionInfo};
pub use normalize::normalize;
pub use orchestrator::RollOrchestrator;
pub use policy::{SessionPolicy, SuppressMode};
pub use relay::{DiceRelay, Destination, InboundMessage, Outbound};
pub use roll::{RollOutcome, RollResult};
pub use router::CommandRouter;
pub use secret::SecretStore;
pub use session::Session;
pub use table::{DiceTable, TableRegistry};
