//! HTTP client for BCDice-API v1 with ordered server failover.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use dr_core::{Evaluator, RelayError, RelayResult, RollResult, SystemInfo, VersionInfo};

use crate::detect::{compile_prefixes, is_generic_dice, matches_prefix};
use crate::wire::{RollBody, SystemInfoBody, SystemsBody, VersionBody};

/// BCDice-API client.
///
/// Requests go to the first server; on a transport failure the remaining
/// servers are tried in order. Channel-to-system bindings live here too.
pub struct BcdiceClient {
    http: Client,
    servers: RwLock<Vec<String>>,
    default_system: RwLock<String>,
    rooms: RwLock<BTreeMap<String, String>>,
    prefixes: Mutex<HashMap<String, Arc<Vec<Regex>>>>,
    error_sensitive: bool,
}

fn transport(e: reqwest::Error) -> RelayError {
    RelayError::Transport(e.to_string())
}

impl BcdiceClient {
    /// Create a client. `servers` is in priority order.
    pub fn new(
        servers: Vec<String>,
        default_system: impl Into<String>,
        error_sensitive: bool,
    ) -> Self {
        Self {
            http: Client::new(),
            servers: RwLock::new(servers),
            default_system: RwLock::new(default_system.into()),
            rooms: RwLock::new(BTreeMap::new()),
            prefixes: Mutex::new(HashMap::new()),
            error_sensitive,
        }
    }

    /// Currently active server, if any.
    pub fn active_server(&self) -> Option<String> {
        self.servers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .first()
            .cloned()
    }

    /// The system used by channels without a binding.
    pub fn default_system(&self) -> String {
        self.default_system
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Roll a normalized command with an explicit system.
    pub async fn roll_with_system(&self, command: &str, system: &str) -> RelayResult<RollResult> {
        let path = format!(
            "/v1/diceroll?system={}&command={command}",
            urlencoding::encode(system)
        );
        let body: RollBody = self.get(&path).await?;
        if body.ok {
            return Ok(RollResult::rolled(body.result, system).with_secret(body.secret));
        }
        let reason = body.reason.unwrap_or_else(|| "the dice server rejected the command".to_string());
        debug!(%command, system, %reason, "command rejected");
        if self.error_sensitive {
            Ok(RollResult::failed(reason))
        } else {
            Ok(RollResult::not_rolled())
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> RelayResult<T> {
        let servers = self.server_urls();
        let mut last = RelayError::Transport("no dice server is configured".to_string());
        for base in &servers {
            let url = format!("{}{path}", base.trim_end_matches('/'));
            match self.fetch_json(&url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    warn!(server = %base, error = %e, "dice server request failed");
                    last = e;
                }
            }
        }
        Err(last)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> RelayResult<T> {
        debug!(%url, "GET");
        // Rejections arrive as 400 with a JSON body, so the status is not checked.
        let text = self
            .http
            .get(url)
            .send()
            .await
            .map_err(transport)?
            .text()
            .await
            .map_err(transport)?;
        serde_json::from_str(&text)
            .map_err(|e| RelayError::Transport(format!("unexpected response from {url}: {e}")))
    }

    async fn system_prefixes(&self, system: &str) -> Arc<Vec<Regex>> {
        let cached = self
            .prefixes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(system)
            .cloned();
        if let Some(cached) = cached {
            return cached;
        }
        match self.system_info(system).await {
            Ok(info) => {
                let compiled = Arc::new(compile_prefixes(&info.prefixes));
                self.prefixes
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(system.to_string(), Arc::clone(&compiled));
                compiled
            }
            Err(e) => {
                debug!(system, error = %e, "no command prefixes available");
                Arc::new(Vec::new())
            }
        }
    }
}

#[async_trait]
impl Evaluator for BcdiceClient {
    async fn roll(&self, command: &str) -> RelayResult<RollResult> {
        let system = self.default_system();
        self.roll_with_system(command, &system).await
    }

    async fn roll_in_channel(&self, command: &str, channel: &str) -> RelayResult<RollResult> {
        let system = self.system_for(channel);
        self.roll_with_system(command, &system).await
    }

    async fn system_info(&self, name: &str) -> RelayResult<SystemInfo> {
        let path = format!("/v1/systeminfo?system={}", urlencoding::encode(name));
        let body: SystemInfoBody = self.get(&path).await?;
        match body.systeminfo {
            Some(entry) if body.ok => Ok(entry.into()),
            _ => Err(RelayError::NotFound(
                body.reason
                    .unwrap_or_else(|| format!("unknown game system: {name}")),
            )),
        }
    }

    async fn systems(&self) -> RelayResult<Vec<String>> {
        let body: SystemsBody = self.get("/v1/systems").await?;
        Ok(body.systems)
    }

    async fn version(&self) -> RelayResult<VersionInfo> {
        let body: VersionBody = self.get("/v1/version").await?;
        Ok(body.into())
    }

    fn set_system(&self, name: &str, channel: Option<&str>) {
        match channel {
            Some(channel) => {
                self.rooms
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(channel.to_string(), name.to_string());
            }
            None => {
                *self
                    .default_system
                    .write()
                    .unwrap_or_else(PoisonError::into_inner) = name.to_string();
            }
        }
    }

    fn system_for(&self, channel: &str) -> String {
        self.rooms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(channel)
            .cloned()
            .unwrap_or_else(|| self.default_system())
    }

    fn server_urls(&self) -> Vec<String> {
        self.servers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn remove_server(&self, url: &str) -> RelayResult<bool> {
        let mut servers = self.servers.write().unwrap_or_else(PoisonError::into_inner);
        let Some(pos) = servers.iter().position(|s| s == url) else {
            return Ok(false);
        };
        if servers.len() == 1 {
            return Err(RelayError::Usage(
                "Cannot remove the last dice server.".to_string(),
            ));
        }
        servers.remove(pos);
        Ok(true)
    }

    fn set_server(&self, url: &str) {
        let mut servers = self.servers.write().unwrap_or_else(PoisonError::into_inner);
        servers.retain(|s| s != url);
        servers.insert(0, url.to_string());
    }

    fn room_systems(&self) -> BTreeMap<String, String> {
        self.rooms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn is_dice_command(&self, text: &str) -> bool {
        if is_generic_dice(text) {
            return true;
        }
        let system = self.default_system();
        matches_prefix(text, &self.system_prefixes(&system).await)
    }

    fn describe(&self, channel: Option<&str>) -> String {
        let system = match channel {
            Some(channel) => self.system_for(channel),
            None => self.default_system(),
        };
        let server = self.active_server().unwrap_or_else(|| "(no server)".to_string());
        format!("Server: {server} / System: {system} ")
    }
}
