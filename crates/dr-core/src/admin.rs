//! Password-protected maintenance commands.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, warn};

use crate::evaluator::{Attachment, Evaluator};
use crate::help::ADMIN_HELP;
use crate::policy::SuppressMode;
use crate::session::Session;
use crate::split::chunk_lines;

static ROOM_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]*):(.*)").expect("room pattern is valid"));

/// An admin subcommand with its argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    /// `listServer`
    ListServer,
    /// `setServer URL`
    SetServer(Option<String>),
    /// `removeServer URL`
    RemoveServer(Option<String>),
    /// `export`
    Export,
    /// `import`, with `ROOM:SYSTEM` lines following the command line.
    Import,
    /// `suppressroll [disable|/PREFIX]`
    SuppressRoll(SuppressMode),
    /// `addDiceBot [NAME]`
    AddTable(Option<String>),
    /// `removeDiceBot NAME`
    RemoveTable(Option<String>),
    /// `listDiceBot`
    ListTables,
    /// Anything else.
    Help,
}

impl AdminCommand {
    /// Parse the tokens following the password.
    pub fn parse(args: &[&str]) -> Self {
        let arg = args.get(1).map(|s| s.to_string());
        match args.first().copied() {
            Some("listServer") => Self::ListServer,
            Some("setServer") => Self::SetServer(arg),
            Some("removeServer") => Self::RemoveServer(arg),
            Some("export") => Self::Export,
            Some("import") => Self::Import,
            Some("suppressroll") => Self::SuppressRoll(SuppressMode::parse(args.get(1).copied())),
            Some("addDiceBot") => Self::AddTable(arg),
            Some("removeDiceBot") => Self::RemoveTable(arg),
            Some("listDiceBot") => Self::ListTables,
            _ => Self::Help,
        }
    }
}

/// Runs admin commands against the evaluator and the session.
pub struct AdminProcessor<'a> {
    evaluator: &'a dyn Evaluator,
    session: &'a Session,
    fragment_limit: usize,
}

impl<'a> AdminProcessor<'a> {
    /// Create a processor.
    pub fn new(evaluator: &'a dyn Evaluator, session: &'a Session, fragment_limit: usize) -> Self {
        Self {
            evaluator,
            session,
            fragment_limit,
        }
    }

    /// Handle `bcdice admin PASSWORD SUBCOMMAND ...`.
    ///
    /// `tokens` is the space-split first line, `raw` the whole message.
    /// Every failure is rendered into the reply.
    pub async fn handle(&self, tokens: &[&str], raw: &str, attachments: &[Attachment]) -> Vec<String> {
        let Some(password) = tokens.get(2) else {
            return vec![ADMIN_HELP.to_string()];
        };
        if *password == "help" {
            return vec![ADMIN_HELP.to_string()];
        }
        if let Err(e) = self.session.check_password(password) {
            warn!("admin command with a wrong password");
            return vec![e.to_string()];
        }

        match AdminCommand::parse(tokens.get(3..).unwrap_or_default()) {
            AdminCommand::ListServer => self.evaluator.server_urls(),
            AdminCommand::SetServer(Some(url)) => self.set_server(&url).await,
            AdminCommand::RemoveServer(Some(url)) => vec![self.remove_server(&url)],
            AdminCommand::SetServer(None) | AdminCommand::RemoveServer(None) => {
                vec!["URL is missing.".to_string(), ADMIN_HELP.to_string()]
            }
            AdminCommand::Export => self.export(),
            AdminCommand::Import => self.import(raw),
            AdminCommand::SuppressRoll(mode) => vec![self.suppress(mode)],
            AdminCommand::AddTable(name) => vec![self.add_table(name, attachments).await],
            AdminCommand::RemoveTable(Some(name)) => vec![self.remove_table(&name)],
            AdminCommand::RemoveTable(None) => {
                vec!["Specify the name of the dice table to remove.".to_string()]
            }
            AdminCommand::ListTables => self.list_tables(),
            AdminCommand::Help => vec![ADMIN_HELP.to_string()],
        }
    }

    async fn set_server(&self, url: &str) -> Vec<String> {
        self.evaluator.set_server(url);
        info!(url, "dice server switched");
        match self.evaluator.version().await {
            Ok(v) => {
                let status = format!(
                    "{}(API v.{} / BCDice v.{})",
                    self.evaluator.describe(None),
                    v.api,
                    v.dice
                );
                if status.contains(url) {
                    vec!["Dice server changed.".to_string(), status]
                } else {
                    vec!["Could not switch the dice server. Using:".to_string(), status]
                }
            }
            Err(e) => {
                warn!(url, error = %e, "dice server did not answer");
                vec![format!(
                    "{}(could not fetch server information)",
                    self.evaluator.describe(None)
                )]
            }
        }
    }

    fn remove_server(&self, url: &str) -> String {
        match self.evaluator.remove_server(url) {
            Ok(true) => {
                info!(url, "dice server removed");
                format!("Removed {url} from the dice server list.")
            }
            Ok(false) => format!("{url} is not in the dice server list."),
            Err(e) => e.to_string(),
        }
    }

    fn export(&self) -> Vec<String> {
        let lines = self
            .evaluator
            .room_systems()
            .into_iter()
            .map(|(room, system)| format!("{room}:{system}"));
        chunk_lines("Room-System List", lines, self.fragment_limit)
    }

    fn import(&self, raw: &str) -> Vec<String> {
        let mut imported = Vec::new();
        for line in raw.lines().skip(1) {
            let Some(caps) = ROOM_LINE.captures(line) else {
                continue;
            };
            let (room, system) = (&caps[1], &caps[2]);
            self.evaluator.set_system(system, Some(room));
            imported.push(format!("Room{room} -> {system}"));
        }
        info!(count = imported.len(), "room bindings imported");
        if imported.is_empty() {
            return vec!["No ROOM_ID:SYSTEM_NAME lines found.".to_string()];
        }
        chunk_lines("Imported room settings", imported, self.fragment_limit)
    }

    fn suppress(&self, mode: SuppressMode) -> String {
        self.session.set_policy(mode.policy());
        info!(?mode, "roll suppression changed");
        match mode {
            SuppressMode::Disabled => "Every message is sent to the dice server.".to_string(),
            SuppressMode::Heuristic => {
                "Only messages that look like dice commands are sent to the dice server.".to_string()
            }
            SuppressMode::Prefix(marker) => {
                format!("Only messages starting with {marker} are sent to the dice server.")
            }
        }
    }

    async fn add_table(&self, name: Option<String>, attachments: &[Attachment]) -> String {
        let Some(file) = attachments.first() else {
            return "Attach the dice table file to the command.".to_string();
        };
        let name = name.unwrap_or_else(|| file.stem().to_string());
        match self.session.tables().register(&file.url, &name).await {
            Ok(()) => {
                info!(table = %name, url = %file.url, "dice table registered");
                format!("Registered dice table [{name}].")
            }
            Err(e) => {
                warn!(table = %name, url = %file.url, error = %e, "dice table rejected");
                e.to_string()
            }
        }
    }

    fn remove_table(&self, name: &str) -> String {
        match self.session.tables().unregister(name) {
            Ok(()) => {
                info!(table = name, "dice table removed");
                format!("Removed dice table [{name}].")
            }
            Err(e) => e.to_string(),
        }
    }

    fn list_tables(&self) -> Vec<String> {
        let names = self.session.tables().list();
        if names.is_empty() {
            return vec!["No dice tables registered.".to_string()];
        }
        chunk_lines("[Dice Tables]", names, self.fragment_limit)
    }
}
