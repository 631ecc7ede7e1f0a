//! Response bodies of the BCDice-API v1 endpoints.

use serde::Deserialize;

use dr_core::{SystemInfo, VersionInfo};

#[derive(Debug, Deserialize)]
pub(crate) struct VersionBody {
    pub api: String,
    pub bcdice: String,
}

impl From<VersionBody> for VersionInfo {
    fn from(body: VersionBody) -> Self {
        Self {
            api: body.api,
            dice: body.bcdice,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SystemsBody {
    #[serde(default)]
    pub systems: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SystemInfoBody {
    pub ok: bool,
    #[serde(default)]
    pub systeminfo: Option<SystemInfoEntry>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SystemInfoEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub game_type: String,
    #[serde(default, rename = "prefixs")]
    pub prefixes: Vec<String>,
    #[serde(default)]
    pub info: String,
}

impl From<SystemInfoEntry> for SystemInfo {
    fn from(entry: SystemInfoEntry) -> Self {
        Self {
            name: entry.name,
            game_type: entry.game_type,
            prefixes: entry.prefixes,
            info: entry.info,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RollBody {
    pub ok: bool,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub secret: bool,
    #[serde(default)]
    pub reason: Option<String>,
}
