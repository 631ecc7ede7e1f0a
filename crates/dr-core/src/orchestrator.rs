//! Turns one line of chat into zero or more roll results.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{RelayError, RelayResult};
use crate::evaluator::Evaluator;
use crate::normalize::normalize;
use crate::policy::SessionPolicy;
use crate::roll::{RollOutcome, RollResult};
use crate::table::TableRegistry;

static REPEAT_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+) ").expect("repeat pattern is valid"));
static TARGET_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(.+)\] ").expect("target pattern is valid"));

/// Roll planner for a single message.
///
/// Holds a policy snapshot so one message sees one consistent policy even if
/// an admin changes it concurrently.
pub struct RollOrchestrator<'a> {
    evaluator: &'a dyn Evaluator,
    tables: &'a TableRegistry,
    policy: SessionPolicy,
    max_targets: usize,
}

impl<'a> RollOrchestrator<'a> {
    /// Create a planner over the given collaborators.
    pub fn new(
        evaluator: &'a dyn Evaluator,
        tables: &'a TableRegistry,
        policy: SessionPolicy,
        max_targets: usize,
    ) -> Self {
        Self {
            evaluator,
            tables,
            policy,
            max_targets,
        }
    }

    /// Plan and run every roll requested by `raw`.
    ///
    /// Handles the `N command` repeat form (as a table repeat or a
    /// `repeatN` evaluator command), the `[a,b] command` per-target form,
    /// and plain single rolls. The only error is a target list longer than
    /// the configured limit on a line that would otherwise roll.
    pub async fn rolls(&self, raw: &str, channel: &str) -> RelayResult<Vec<RollResult>> {
        if !self.policy.accepts(raw.trim()) {
            return Ok(Vec::new());
        }
        let input = self.policy.strip(raw);
        let mut command = raw.to_string();

        if let Some(caps) = REPEAT_COUNT.captures(input) {
            let rest = input[caps[0].len()..].trim();
            if let Some(name) = self.tables.find_by_prefix(rest)
                && let Ok(times) = caps[1].parse::<usize>()
            {
                return Ok(self.repeat_table(&name, times).await);
            }
            command = format!("{}repeat{input}", self.policy.roll_prefix);
        }

        if let Some(caps) = TARGET_LIST.captures(input) {
            let mut targets: Vec<&str> = caps
                .get(1)
                .map_or("", |m| m.as_str())
                .split(',')
                .collect();
            while targets.last().is_some_and(|t| t.is_empty()) {
                targets.pop();
            }
            let required = format!("{}{}", self.policy.roll_prefix, input[caps[0].len()..].trim());
            if targets.len() > self.max_targets {
                if self.table_for(&required).is_none() && !self.should_roll(&required).await {
                    return Ok(Vec::new());
                }
                return Err(RelayError::TooManyTargets {
                    attempted: targets.len(),
                    limit: self.max_targets,
                });
            }
            let mut results = Vec::with_capacity(targets.len());
            for target in targets {
                let result = self.roll(&required, channel).await.into_result();
                results.push(result.labeled(target));
            }
            return Ok(results);
        }

        let result = self.roll(&command, channel).await.into_result();
        if result.rolled || result.error {
            Ok(vec![result])
        } else {
            Ok(Vec::new())
        }
    }

    /// Roll `raw` once, as a custom table if one matches, else on the
    /// evaluator with the channel's system.
    pub async fn roll(&self, raw: &str, channel: &str) -> RollOutcome {
        if let Some(name) = self.table_for(raw) {
            return self.tables.roll(&name, self.evaluator).await;
        }
        if !self.should_roll(raw).await {
            return RollOutcome::NotRolled;
        }
        let command = normalize(self.policy.strip(raw));
        debug!(%command, channel, "forwarding to evaluator");
        match self.evaluator.roll_in_channel(&command, channel).await {
            Ok(result) => RollOutcome::from_result(result),
            Err(e) => RollOutcome::failed(e.to_string()),
        }
    }

    /// Whether `input` passes the suppression policy.
    pub async fn should_roll(&self, input: &str) -> bool {
        if !self.policy.suppressed {
            return true;
        }
        if self.policy.roll_prefix.is_empty() {
            self.evaluator.is_dice_command(input).await
        } else {
            input.starts_with(self.policy.roll_prefix.as_str())
        }
    }

    fn table_for(&self, raw: &str) -> Option<String> {
        if !self.policy.accepts(raw) {
            return None;
        }
        self.tables.find_by_prefix(self.policy.strip(raw))
    }

    async fn repeat_table(&self, name: &str, times: usize) -> Vec<RollResult> {
        let mut results = Vec::new();
        for _ in 0..times {
            match self.tables.roll(name, self.evaluator).await {
                RollOutcome::Rolled(result) => results.push(result),
                RollOutcome::NotRolled => {}
                RollOutcome::Errored(result) => {
                    results.push(result);
                    break;
                }
            }
        }
        results
    }
}
