//! In-memory stand-ins for the evaluator and the table downloader.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::{RelayError, RelayResult};
use crate::evaluator::{Evaluator, SystemInfo, TableFetcher, VersionInfo};
use crate::roll::RollResult;
use crate::table::DiceTable;

/// A three-row table rolled with `1D3`; row `n` reads `"{name} result {n}"`.
pub fn table(name: &str) -> DiceTable {
    let text = format!("1D3\n1:{name} result 1\n2:{name} result 2\n3:{name} result 3");
    DiceTable::parse(name, &text).expect("fixture table parses")
}

/// Serves files from a map.
#[derive(Default)]
pub struct MemoryFetcher {
    files: HashMap<String, String>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, url: &str, text: &str) -> Self {
        self.files.insert(url.to_string(), text.to_string());
        self
    }
}

#[async_trait]
impl TableFetcher for MemoryFetcher {
    async fn fetch(&self, url: &str) -> RelayResult<String> {
        self.files
            .get(url)
            .cloned()
            .ok_or_else(|| RelayError::Transport(format!("cannot download {url}")))
    }
}

/// Evaluator answering from a script and recording every command it sees.
///
/// Scripted responses are consumed first; afterwards every roll returns the
/// fallback text (or the configured failure). A command counts as a dice
/// command when it starts with a digit or `S`.
pub struct ScriptedEvaluator {
    fallback_text: String,
    failure: Option<String>,
    secret: bool,
    script: Mutex<VecDeque<RelayResult<RollResult>>>,
    calls: Mutex<Vec<String>>,
    channels: Mutex<Vec<String>>,
    systems: Vec<String>,
    version: Option<VersionInfo>,
    default_system: Mutex<String>,
    rooms: Mutex<BTreeMap<String, String>>,
    servers: Mutex<Vec<String>>,
}

impl Default for ScriptedEvaluator {
    fn default() -> Self {
        Self {
            fallback_text: ": (2D6) ＞ 7".to_string(),
            failure: None,
            secret: false,
            script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            channels: Mutex::new(Vec::new()),
            systems: vec!["DiceBot".to_string(), "Cthulhu".to_string()],
            version: Some(VersionInfo {
                api: "2.0.0".to_string(),
                dice: "3.1.0".to_string(),
            }),
            default_system: Mutex::new("DiceBot".to_string()),
            rooms: Mutex::new(BTreeMap::new()),
            servers: Mutex::new(vec!["http://primary".to_string()]),
        }
    }
}

impl ScriptedEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roll_text(mut self, text: &str) -> Self {
        self.fallback_text = text.to_string();
        self
    }

    /// Every call fails with a transport error.
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Fallback results are secret.
    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    /// Queue one response ahead of the fallback.
    pub fn then(self, response: RelayResult<RollResult>) -> Self {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(response);
        self
    }

    pub fn with_systems(mut self, systems: &[&str]) -> Self {
        self.systems = systems.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn without_version(mut self) -> Self {
        self.version = None;
        self
    }

    pub fn with_servers(self, servers: &[&str]) -> Self {
        *self.servers.lock().unwrap_or_else(PoisonError::into_inner) =
            servers.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Commands received so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Channels passed to `roll_in_channel`, in order.
    pub fn channels(&self) -> Vec<String> {
        self.channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn default_system(&self) -> String {
        self.default_system
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn answer(&self, command: &str, system: String) -> RelayResult<RollResult> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command.to_string());
        if let Some(scripted) = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
        {
            return scripted;
        }
        if let Some(message) = &self.failure {
            return Err(RelayError::Transport(message.clone()));
        }
        Ok(RollResult::rolled(self.fallback_text.clone(), system).with_secret(self.secret))
    }
}

#[async_trait]
impl Evaluator for ScriptedEvaluator {
    async fn roll(&self, command: &str) -> RelayResult<RollResult> {
        self.answer(command, self.default_system())
    }

    async fn roll_in_channel(&self, command: &str, channel: &str) -> RelayResult<RollResult> {
        self.channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(channel.to_string());
        self.answer(command, self.system_for(channel))
    }

    async fn system_info(&self, name: &str) -> RelayResult<SystemInfo> {
        if self.systems.iter().any(|s| s == name) {
            Ok(SystemInfo {
                name: name.to_string(),
                game_type: name.to_string(),
                prefixes: Vec::new(),
                info: format!("How to play {name}"),
            })
        } else {
            Err(RelayError::NotFound(format!("Unknown system: {name}")))
        }
    }

    async fn systems(&self) -> RelayResult<Vec<String>> {
        match &self.failure {
            Some(message) => Err(RelayError::Transport(message.clone())),
            None => Ok(self.systems.clone()),
        }
    }

    async fn version(&self) -> RelayResult<VersionInfo> {
        self.version
            .clone()
            .ok_or_else(|| RelayError::Transport("version unavailable".to_string()))
    }

    fn set_system(&self, name: &str, channel: Option<&str>) {
        match channel {
            Some(channel) => {
                self.rooms
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(channel.to_string(), name.to_string());
            }
            None => {
                *self
                    .default_system
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner) = name.to_string();
            }
        }
    }

    fn system_for(&self, channel: &str) -> String {
        self.rooms
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(channel)
            .cloned()
            .unwrap_or_else(|| self.default_system())
    }

    fn server_urls(&self) -> Vec<String> {
        self.servers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn remove_server(&self, url: &str) -> RelayResult<bool> {
        let mut servers = self.servers.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(pos) = servers.iter().position(|s| s == url) else {
            return Ok(false);
        };
        if servers.len() == 1 {
            return Err(RelayError::Usage(
                "cannot remove the last dice server".to_string(),
            ));
        }
        servers.remove(pos);
        Ok(true)
    }

    fn set_server(&self, url: &str) {
        let mut servers = self.servers.lock().unwrap_or_else(PoisonError::into_inner);
        servers.retain(|s| s != url);
        servers.insert(0, url.to_string());
    }

    fn room_systems(&self) -> BTreeMap<String, String> {
        self.rooms
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn is_dice_command(&self, text: &str) -> bool {
        text.trim()
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit() || c == 'S')
    }

    fn describe(&self, channel: Option<&str>) -> String {
        let system = match channel {
            Some(channel) => self.system_for(channel),
            None => self.default_system(),
        };
        format!("{} {system}", self.server_urls().first().cloned().unwrap_or_default())
    }
}
