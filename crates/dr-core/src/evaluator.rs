//! Ports to the outside world: the dice evaluator and the table downloader.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RelayResult;
use crate::roll::RollResult;

/// Help and command prefixes of one game system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Display name.
    pub name: String,
    /// Identifier used when selecting the system.
    pub game_type: String,
    /// Command prefixes the system understands.
    pub prefixes: Vec<String>,
    /// Free-form help text.
    pub info: String,
}

/// Versions reported by the evaluator server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// API server version.
    pub api: String,
    /// Dice engine version.
    pub dice: String,
}

/// A file attached to an inbound chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Where the file can be downloaded.
    pub url: String,
    /// Original file name, including extension.
    pub file_name: String,
}

impl Attachment {
    /// Create an attachment.
    pub fn new(url: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            file_name: file_name.into(),
        }
    }

    /// File name up to the first dot.
    pub fn stem(&self) -> &str {
        self.file_name.split('.').next().unwrap_or("")
    }
}

/// The remote service that actually rolls dice.
///
/// Room bindings and the server list belong to the evaluator; the core only
/// reads and rewrites them through this trait.
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// Roll an already-normalized command with the default system.
    async fn roll(&self, command: &str) -> RelayResult<RollResult>;

    /// Roll an already-normalized command with the channel's system.
    async fn roll_in_channel(&self, command: &str, channel: &str) -> RelayResult<RollResult>;

    /// Help for one game system.
    async fn system_info(&self, name: &str) -> RelayResult<SystemInfo>;

    /// Names of every known game system.
    async fn systems(&self) -> RelayResult<Vec<String>>;

    /// Versions of the active server.
    async fn version(&self) -> RelayResult<VersionInfo>;

    /// Bind `name` to `channel`, or change the default when `channel` is `None`.
    fn set_system(&self, name: &str, channel: Option<&str>);

    /// System bound to `channel`, falling back to the default.
    fn system_for(&self, channel: &str) -> String;

    /// Configured server URLs, active one first.
    fn server_urls(&self) -> Vec<String>;

    /// Remove a server. `Ok(false)` when it was not listed.
    fn remove_server(&self, url: &str) -> RelayResult<bool>;

    /// Make `url` the active server.
    fn set_server(&self, url: &str);

    /// Snapshot of every channel binding.
    fn room_systems(&self) -> BTreeMap<String, String>;

    /// Heuristic: does `text` look like something worth sending?
    async fn is_dice_command(&self, text: &str) -> bool;

    /// One-line description of the active server and the channel's system.
    fn describe(&self, channel: Option<&str>) -> String;
}

/// Downloads the text of an uploaded table file.
#[async_trait]
pub trait TableFetcher: Send + Sync {
    /// Fetch the file behind `url` as UTF-8 text.
    async fn fetch(&self, url: &str) -> RelayResult<String>;
}
