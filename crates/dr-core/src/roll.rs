//! Roll results and the three-way roll outcome.

use serde::{Deserialize, Serialize};

/// The result of one dice roll, as reported by the evaluator or a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    /// Result text, conventionally starting with `": "`.
    pub text: String,
    /// Label of the game system (or table) that produced the result.
    pub system: String,
    /// Whether the result must be withheld from the channel.
    pub secret: bool,
    /// Whether anything was actually rolled.
    pub rolled: bool,
    /// Whether the text describes a failure instead of a result.
    pub error: bool,
}

impl RollResult {
    /// A public, successful result.
    pub fn rolled(text: impl Into<String>, system: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            system: system.into(),
            secret: false,
            rolled: true,
            error: false,
        }
    }

    /// The "nothing happened" sentinel.
    pub fn not_rolled() -> Self {
        Self {
            text: String::new(),
            system: String::new(),
            secret: false,
            rolled: false,
            error: false,
        }
    }

    /// An error-flagged result carrying `message` as its text.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            text: message.into(),
            system: String::new(),
            secret: false,
            rolled: false,
            error: true,
        }
    }

    /// Mark this result as secret.
    pub fn with_secret(mut self, secret: bool) -> Self {
        self.secret = secret;
        self
    }

    /// Relabel the system as `"{label}: {system}"`, keeping every flag.
    pub fn labeled(self, label: &str) -> Self {
        Self {
            system: format!("{label}: {}", self.system),
            ..self
        }
    }
}

/// What became of a single roll request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollOutcome {
    /// The evaluator or a table produced a result.
    Rolled(RollResult),
    /// The input was not forwarded, or the table output was ambiguous.
    NotRolled,
    /// The roll failed. The error-flagged result is kept as reported, so
    /// its system label and secret flag survive.
    Errored(RollResult),
}

impl RollOutcome {
    /// A failure with `message` as its text and no system label.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Errored(RollResult::failed(message))
    }

    /// Wrap an evaluator result, routing error-flagged ones to `Errored`.
    pub fn from_result(result: RollResult) -> Self {
        if result.error {
            Self::Errored(result)
        } else if result.rolled {
            Self::Rolled(result)
        } else {
            Self::NotRolled
        }
    }

    /// Flatten into a [`RollResult`] carrying the matching flags.
    pub fn into_result(self) -> RollResult {
        match self {
            Self::Rolled(result) | Self::Errored(result) => result,
            Self::NotRolled => RollResult::not_rolled(),
        }
    }
}
