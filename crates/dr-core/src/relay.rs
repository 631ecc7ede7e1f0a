//! The bot facade: one inbound chat message in, outbound messages out.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::RelayConfig;
use crate::evaluator::{Attachment, Evaluator, TableFetcher};
use crate::orchestrator::RollOrchestrator;
use crate::roll::RollResult;
use crate::router::CommandRouter;
use crate::session::Session;
use crate::split::split_with_limit;

/// Word that starts a keyword command.
pub const KEYWORD: &str = "bcdice";

/// A chat message as delivered by the platform adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Message text, possibly several lines.
    pub text: String,
    /// Stable id of the author.
    pub author_id: String,
    /// Display name of the author.
    pub author_name: String,
    /// Channel the message was posted in.
    pub channel_id: String,
    /// Uploaded files.
    pub attachments: Vec<Attachment>,
}

/// Where an outbound message goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Destination {
    /// A channel, by id.
    Channel(String),
    /// A direct message to a user, by id.
    User(String),
}

/// One message to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outbound {
    /// Recipient.
    pub destination: Destination,
    /// Text, never longer than the configured fragment limit.
    pub text: String,
}

impl Outbound {
    fn channel(id: &str, text: impl Into<String>) -> Self {
        Self {
            destination: Destination::Channel(id.to_string()),
            text: text.into(),
        }
    }

    fn user(id: &str, text: impl Into<String>) -> Self {
        Self {
            destination: Destination::User(id.to_string()),
            text: text.into(),
        }
    }
}

/// Whether `text` is a keyword command rather than a roll.
pub fn is_invocation(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower == KEYWORD || lower.starts_with(&format!("{KEYWORD} "))
}

/// `"{system}{text}"`, the way every roll is shown.
pub fn format_result(result: &RollResult) -> String {
    format!("{}{}", result.system, result.text)
}

/// A running bot: configuration, the evaluator and all session state.
pub struct DiceRelay {
    config: RelayConfig,
    evaluator: Arc<dyn Evaluator>,
    session: Session,
}

impl DiceRelay {
    /// Build a relay around an evaluator and a table downloader.
    pub fn new(
        config: RelayConfig,
        evaluator: Arc<dyn Evaluator>,
        fetcher: Arc<dyn TableFetcher>,
    ) -> Self {
        let session = Session::new(config.password.clone(), fetcher);
        Self {
            config,
            evaluator,
            session,
        }
    }

    /// The configuration this relay was built with.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The evaluator.
    pub fn evaluator(&self) -> &dyn Evaluator {
        self.evaluator.as_ref()
    }

    /// A keyword router for one message.
    pub fn router(&self) -> CommandRouter<'_> {
        CommandRouter::new(
            self.evaluator.as_ref(),
            &self.session,
            self.config.fragment_limit,
        )
    }

    /// A roll planner holding the current policy.
    pub fn orchestrator(&self) -> RollOrchestrator<'_> {
        RollOrchestrator::new(
            self.evaluator.as_ref(),
            self.session.tables(),
            self.session.policy(),
            self.config.max_targets,
        )
    }

    /// Handle one inbound message. Failures become messages, never errors.
    pub async fn handle(&self, msg: &InboundMessage) -> Vec<Outbound> {
        let limit = self.config.fragment_limit;
        if is_invocation(&msg.text) {
            debug!(author = %msg.author_id, channel = %msg.channel_id, "keyword command");
            return self
                .router()
                .route(&msg.text, &msg.author_id, &msg.channel_id, &msg.attachments)
                .await
                .iter()
                .flat_map(|reply| split_with_limit(reply, limit))
                .map(|fragment| Outbound::channel(&msg.channel_id, fragment))
                .collect();
        }

        match self.orchestrator().rolls(&msg.text, &msg.channel_id).await {
            Ok(results) => self.deliver(msg, &results),
            Err(e) => {
                warn!(author = %msg.author_id, text = %msg.text, error = %e, "roll rejected");
                vec![Outbound::channel(
                    &msg.channel_id,
                    format!("＞{}\n[ERROR]{e}", msg.author_name),
                )]
            }
        }
    }

    fn deliver(&self, msg: &InboundMessage, results: &[RollResult]) -> Vec<Outbound> {
        let Some(first) = results.first() else {
            return Vec::new();
        };
        if let Some(failed) = results.iter().find(|r| r.error) {
            warn!(author = %msg.author_id, text = %msg.text, error = %failed.text, "roll failed");
            return vec![Outbound::channel(
                &msg.channel_id,
                format!("＞{}\n[ERROR]{}", msg.author_name, failed.text),
            )];
        }
        let shown: Vec<String> = results
            .iter()
            .filter(|r| r.rolled)
            .map(format_result)
            .collect();
        if shown.is_empty() {
            return Vec::new();
        }
        let fragments = split_with_limit(
            &format!("＞{}\n{}", msg.author_name, shown.join("\n\n")),
            self.config.fragment_limit,
        );
        if !first.secret {
            return fragments
                .into_iter()
                .map(|f| Outbound::channel(&msg.channel_id, f))
                .collect();
        }

        let index = self.session.secrets().save(&msg.author_id, fragments.clone());
        debug!(author = %msg.author_id, index, "secret result stored");
        let notice = RollResult::rolled(format!(": [Secret Dice] Key: {index}"), first.system.clone());
        let mut out = vec![Outbound::channel(
            &msg.channel_id,
            format!("＞{}\n{}", msg.author_name, format_result(&notice)),
        )];
        out.extend(fragments.into_iter().map(|f| Outbound::user(&msg.author_id, f)));
        out.push(Outbound::user(
            &msg.author_id,
            format!(
                "Recall this result in a channel with `{KEYWORD} load {index}`. \
                 Keys are meant to be used within 72 hours."
            ),
        ));
        out
    }
}
