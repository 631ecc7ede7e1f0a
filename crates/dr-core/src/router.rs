//! Dispatch of `bcdice ...` keyword commands.

use tracing::info;

use crate::admin::AdminProcessor;
use crate::evaluator::{Attachment, Evaluator};
use crate::help::{ADMIN_HELP, GENERAL_HELP, SET_USAGE};
use crate::session::Session;
use crate::split::chunk_lines;

/// A parsed keyword command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// General usage.
    Help,
    /// `help TOPIC`: a custom table or a game system.
    Topic(String),
    /// `set [SYSTEM]`
    Set(Option<String>),
    /// `list`
    List,
    /// `load INDEX`
    Load(String),
    /// `save TEXT`
    Save,
    /// `status`
    Status,
    /// `admin PASSWORD SUBCOMMAND ...`
    Admin,
    /// `admin` with too few arguments.
    AdminHelp,
}

impl Command {
    /// Parse the space-split first line of a keyword message.
    pub fn parse(tokens: &[&str]) -> Self {
        let rest = || tokens.get(2..).map(|t| t.join(" ")).filter(|t| !t.is_empty());
        match tokens.get(1).copied() {
            None => Self::Help,
            Some("help") => rest().map_or(Self::Help, Self::Topic),
            Some("set") => Self::Set(rest()),
            Some("list") => Self::List,
            Some("load") if tokens.len() == 3 => Self::Load(tokens[2].to_string()),
            Some("save") => Self::Save,
            Some("status") => Self::Status,
            Some("admin") if tokens.len() < 4 => Self::AdminHelp,
            Some("admin") => Self::Admin,
            Some(_) => Self::Help,
        }
    }
}

/// Split the first line of `raw` on single spaces, dropping trailing empties.
pub fn tokenize(raw: &str) -> Vec<&str> {
    let first = raw.lines().next().unwrap_or_default();
    let mut tokens: Vec<&str> = first.split(' ').collect();
    while tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }
    tokens
}

/// Answers keyword commands for one message.
pub struct CommandRouter<'a> {
    evaluator: &'a dyn Evaluator,
    session: &'a Session,
    fragment_limit: usize,
}

impl<'a> CommandRouter<'a> {
    /// Create a router.
    pub fn new(evaluator: &'a dyn Evaluator, session: &'a Session, fragment_limit: usize) -> Self {
        Self {
            evaluator,
            session,
            fragment_limit,
        }
    }

    /// Answer a keyword message with zero or more reply texts.
    pub async fn route(
        &self,
        raw: &str,
        user: &str,
        channel: &str,
        attachments: &[Attachment],
    ) -> Vec<String> {
        let tokens = tokenize(raw);
        match Command::parse(&tokens) {
            Command::Help => vec![GENERAL_HELP.to_string()],
            Command::Topic(topic) => vec![self.topic_help(&topic).await],
            Command::Set(None) => vec![SET_USAGE.to_string()],
            Command::Set(Some(system)) => {
                self.evaluator.set_system(&system, Some(channel));
                info!(%system, channel, "game system changed");
                vec![format!("BCDice system is changed: {system}")]
            }
            Command::List => match self.evaluator.systems().await {
                Ok(systems) => chunk_lines("[DiceBot List]", systems, self.fragment_limit),
                Err(e) => vec![e.to_string()],
            },
            Command::Load(index) => self.load(user, &index),
            Command::Save => {
                let head = format!("{} {}", tokens[0], tokens[1]);
                let memo = raw.strip_prefix(head.as_str()).unwrap_or_default().trim();
                let index = self.session.secrets().save(user, vec![memo.to_string()]);
                vec![index.to_string()]
            }
            Command::Status => vec![self.status(channel).await],
            Command::AdminHelp => vec![ADMIN_HELP.to_string()],
            Command::Admin => {
                AdminProcessor::new(self.evaluator, self.session, self.fragment_limit)
                    .handle(&tokens, raw, attachments)
                    .await
            }
        }
    }

    async fn topic_help(&self, topic: &str) -> String {
        let tables = self.session.tables();
        if let Some(name) = tables.find_by_prefix(topic) {
            return match tables.get(&name) {
                Ok(table) => table.help(),
                Err(e) => format!("[{topic}]\n{e}"),
            };
        }
        match self.evaluator.system_info(topic).await {
            Ok(info) => format!("[{topic}]\n{}", info.info),
            Err(e) => format!("[{topic}]\n{e}"),
        }
    }

    fn load(&self, user: &str, index: &str) -> Vec<String> {
        index
            .parse::<usize>()
            .ok()
            .and_then(|i| self.session.secrets().load(user, i).ok())
            .unwrap_or_else(|| vec![format!("Not found (index = {index})")])
    }

    async fn status(&self, channel: &str) -> String {
        let description = self.evaluator.describe(Some(channel));
        match self.evaluator.version().await {
            Ok(v) => format!("{description}(API v.{} / BCDice v.{})", v.api, v.dice),
            Err(_) => format!("{description}(could not fetch version information)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryFetcher, ScriptedEvaluator, table};
    use std::sync::Arc;

    fn session() -> Session {
        Session::new("pw", Arc::new(MemoryFetcher::new()))
    }

    async fn route(eval: &ScriptedEvaluator, s: &Session, raw: &str) -> Vec<String> {
        CommandRouter::new(eval, s, 1000).route(raw, "u1", "room", &[]).await
    }

    #[test]
    fn parse_commands() {
        assert_eq!(Command::parse(&["bcdice"]), Command::Help);
        assert_eq!(Command::parse(&["bcdice", "help"]), Command::Help);
        assert_eq!(
            Command::parse(&["bcdice", "help", "Sword", "World"]),
            Command::Topic("Sword World".to_string())
        );
        assert_eq!(Command::parse(&["bcdice", "set"]), Command::Set(None));
        assert_eq!(Command::parse(&["bcdice", "load", "1", "2"]), Command::Help);
        assert_eq!(Command::parse(&["bcdice", "admin", "pw"]), Command::AdminHelp);
        assert_eq!(Command::parse(&["bcdice", "admin", "pw", "export"]), Command::Admin);
        assert_eq!(Command::parse(&["bcdice", "dance"]), Command::Help);
    }

    #[test]
    fn tokenize_uses_first_line_only() {
        assert_eq!(tokenize("bcdice save a\nsecond line"), vec!["bcdice", "save", "a"]);
        assert_eq!(tokenize("bcdice "), vec!["bcdice"]);
        assert_eq!(tokenize("bcdice  help"), vec!["bcdice", "", "help"]);
    }

    #[tokio::test]
    async fn bare_keyword_shows_help() {
        let (eval, s) = (ScriptedEvaluator::new(), session());
        assert_eq!(route(&eval, &s, "bcdice").await, vec![GENERAL_HELP]);
        assert_eq!(route(&eval, &s, "bcdice unknown").await, vec![GENERAL_HELP]);
    }

    #[tokio::test]
    async fn help_prefers_tables_over_systems() {
        let (eval, s) = (ScriptedEvaluator::new(), session());
        s.tables().insert(table("DiceBotTable"));
        let reply = route(&eval, &s, "bcdice help DiceBotTable").await;
        assert!(reply[0].starts_with("[DiceBotTable]\n1D3"));

        let reply = route(&eval, &s, "bcdice help Cthulhu").await;
        assert_eq!(reply, vec!["[Cthulhu]\nHow to play Cthulhu"]);
    }

    #[tokio::test]
    async fn help_unknown_system_reports_error() {
        let (eval, s) = (ScriptedEvaluator::new(), session());
        let reply = route(&eval, &s, "bcdice help Nope").await;
        assert_eq!(reply, vec!["[Nope]\nUnknown system: Nope"]);
    }

    #[tokio::test]
    async fn set_binds_channel() {
        let (eval, s) = (ScriptedEvaluator::new(), session());
        assert_eq!(
            route(&eval, &s, "bcdice set Cthulhu").await,
            vec!["BCDice system is changed: Cthulhu"]
        );
        assert_eq!(eval.system_for("room"), "Cthulhu");
        assert_eq!(eval.system_for("elsewhere"), "DiceBot");
        assert_eq!(route(&eval, &s, "bcdice set").await, vec![SET_USAGE]);
    }

    #[tokio::test]
    async fn list_chunks_systems() {
        let names: Vec<String> = (0..500).map(|i| format!("System{i:03}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let eval = ScriptedEvaluator::new().with_systems(&refs);
        let s = session();
        let reply = route(&eval, &s, "bcdice list").await;
        assert!(reply.len() > 1);
        assert!(reply.iter().all(|m| m.chars().count() <= 1000));
        assert!(reply[0].starts_with("[DiceBot List]\nSystem000"));
    }

    #[tokio::test]
    async fn list_failure_is_reported() {
        let eval = ScriptedEvaluator::new().failing("server down");
        let s = session();
        assert_eq!(route(&eval, &s, "bcdice list").await, vec!["server down"]);
    }

    #[tokio::test]
    async fn save_and_load_memo() {
        let (eval, s) = (ScriptedEvaluator::new(), session());
        assert_eq!(route(&eval, &s, "bcdice save  remember the orc ").await, vec!["1"]);
        assert_eq!(route(&eval, &s, "bcdice load 1").await, vec!["remember the orc"]);
        assert_eq!(
            route(&eval, &s, "bcdice load 2").await,
            vec!["Not found (index = 2)"]
        );
        assert_eq!(
            route(&eval, &s, "bcdice load x").await,
            vec!["Not found (index = x)"]
        );
    }

    #[tokio::test]
    async fn status_includes_versions() {
        let (eval, s) = (ScriptedEvaluator::new(), session());
        assert_eq!(
            route(&eval, &s, "bcdice status").await,
            vec!["http://primary DiceBot(API v.2.0.0 / BCDice v.3.1.0)"]
        );
        let eval = ScriptedEvaluator::new().without_version();
        assert_eq!(
            route(&eval, &s, "bcdice status").await,
            vec!["http://primary DiceBot(could not fetch version information)"]
        );
    }

    #[tokio::test]
    async fn admin_routing() {
        let (eval, s) = (ScriptedEvaluator::new(), session());
        assert_eq!(route(&eval, &s, "bcdice admin").await, vec![ADMIN_HELP]);
        assert_eq!(
            route(&eval, &s, "bcdice admin wrong listServer").await,
            vec!["Incorrect password."]
        );
        assert_eq!(
            route(&eval, &s, "bcdice admin pw listServer").await,
            vec!["http://primary"]
        );
    }
}
