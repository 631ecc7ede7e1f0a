//! Registry of custom tables, resolved by prefix match.

use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use regex::Regex;
use tracing::debug;

use super::file::DiceTable;
use crate::error::{RelayError, RelayResult};
use crate::evaluator::{Evaluator, TableFetcher};
use crate::normalize::normalize;
use crate::roll::{RollOutcome, RollResult};

static TRAILING_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)$").expect("trailing value pattern is valid"));

/// Named custom tables, kept in registration order.
///
/// Prefix lookup returns the first registered name the input starts with,
/// so registration order decides between overlapping names such as `Fate`
/// and `FateCore`. Re-registering a name replaces the table in place.
pub struct TableRegistry {
    tables: Mutex<IndexMap<String, Arc<DiceTable>>>,
    fetcher: Arc<dyn TableFetcher>,
}

impl TableRegistry {
    /// Create an empty registry that downloads files through `fetcher`.
    pub fn new(fetcher: Arc<dyn TableFetcher>) -> Self {
        Self {
            tables: Mutex::new(IndexMap::new()),
            fetcher,
        }
    }

    fn tables(&self) -> MutexGuard<'_, IndexMap<String, Arc<DiceTable>>> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Download the file at `url` and register it as `name`.
    pub async fn register(&self, url: &str, name: &str) -> RelayResult<()> {
        if name.trim().is_empty() {
            return Err(RelayError::Usage("a dice table needs a name".to_string()));
        }
        let text = self.fetcher.fetch(url).await?;
        let table = DiceTable::parse(name, &text)?;
        self.insert(table);
        Ok(())
    }

    /// Register an already-parsed table.
    pub fn insert(&self, table: DiceTable) {
        self.tables().insert(table.name.clone(), Arc::new(table));
    }

    /// Remove the table called `name`.
    pub fn unregister(&self, name: &str) -> RelayResult<()> {
        self.tables()
            .shift_remove(name)
            .map(|_| ())
            .ok_or_else(|| RelayError::NotFound(format!("Dice table [{name}] is not registered")))
    }

    /// Registered names in registration order.
    pub fn list(&self) -> Vec<String> {
        self.tables().keys().cloned().collect()
    }

    /// First registered name that the trimmed input starts with.
    pub fn find_by_prefix(&self, input: &str) -> Option<String> {
        let input = input.trim();
        self.tables()
            .keys()
            .find(|name| input.starts_with(name.as_str()))
            .cloned()
    }

    /// Look up a table by exact name.
    pub fn get(&self, name: &str) -> RelayResult<Arc<DiceTable>> {
        self.tables()
            .get(name)
            .cloned()
            .ok_or_else(|| RelayError::NotFound(format!("Dice table [{name}] is not registered")))
    }

    /// Roll the table called `name` once.
    ///
    /// Evaluator output without a trailing number counts as not rolled;
    /// a transport failure is an error.
    pub async fn roll(&self, name: &str, evaluator: &dyn Evaluator) -> RollOutcome {
        let table = match self.get(name) {
            Ok(table) => table,
            Err(e) => return RollOutcome::failed(e.to_string()),
        };
        debug!(table = name, command = %table.command, "rolling dice table");
        match evaluator.roll(&normalize(&table.command)).await {
            Ok(raw) => match trailing_value(&raw.text) {
                Some(value) => RollOutcome::Rolled(RollResult::rolled(table.display(value), name)),
                None => RollOutcome::NotRolled,
            },
            Err(e) => RollOutcome::failed(format!("Failed to roll dice table [{name}]: {e}")),
        }
    }
}

/// Last run of ASCII digits at the very end of `text`.
pub(crate) fn trailing_value(text: &str) -> Option<&str> {
    TRAILING_VALUE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryFetcher, ScriptedEvaluator, table};

    fn registry() -> TableRegistry {
        TableRegistry::new(Arc::new(MemoryFetcher::new()))
    }

    #[test]
    fn first_registered_prefix_wins() {
        let reg = registry();
        reg.insert(table("Fate"));
        reg.insert(table("FateCore"));
        assert_eq!(reg.find_by_prefix("FateCoreRoll"), Some("Fate".to_string()));
    }

    #[test]
    fn registration_order_is_significant() {
        let reg = registry();
        reg.insert(table("FateCore"));
        reg.insert(table("Fate"));
        assert_eq!(reg.find_by_prefix("FateCoreRoll"), Some("FateCore".to_string()));
        assert_eq!(reg.find_by_prefix("FateRoll"), Some("Fate".to_string()));
    }

    #[test]
    fn prefix_lookup_trims_input() {
        let reg = registry();
        reg.insert(table("Goblins"));
        assert_eq!(reg.find_by_prefix("  Goblins please"), Some("Goblins".to_string()));
        assert_eq!(reg.find_by_prefix("2d6"), None);
    }

    #[test]
    fn reregistering_keeps_position() {
        let reg = registry();
        reg.insert(table("A"));
        reg.insert(table("B"));
        reg.insert(table("A"));
        assert_eq!(reg.list(), vec!["A", "B"]);
    }

    #[test]
    fn unregister_preserves_order_of_the_rest() {
        let reg = registry();
        reg.insert(table("A"));
        reg.insert(table("B"));
        reg.insert(table("C"));
        reg.unregister("B").unwrap();
        assert_eq!(reg.list(), vec!["A", "C"]);
        assert!(matches!(reg.unregister("B"), Err(RelayError::NotFound(_))));
    }

    #[test]
    fn get_unknown_is_not_found() {
        assert!(matches!(registry().get("nope"), Err(RelayError::NotFound(_))));
    }

    #[tokio::test]
    async fn register_downloads_and_parses() {
        let fetcher = MemoryFetcher::new().with_file("https://files/goblins.txt", "1D2\n1:Goblin\n2:Orc");
        let reg = TableRegistry::new(Arc::new(fetcher));
        reg.register("https://files/goblins.txt", "Goblins").await.unwrap();
        assert_eq!(reg.get("Goblins").unwrap().results.len(), 2);
    }

    #[tokio::test]
    async fn register_missing_file_fails() {
        let reg = registry();
        assert!(reg.register("https://files/none.txt", "X").await.is_err());
        assert!(reg.list().is_empty());
    }

    #[tokio::test]
    async fn register_requires_name() {
        let fetcher = MemoryFetcher::new().with_file("u", "1D2\n1:a");
        let reg = TableRegistry::new(Arc::new(fetcher));
        assert!(matches!(reg.register("u", " ").await, Err(RelayError::Usage(_))));
    }

    #[tokio::test]
    async fn roll_maps_trailing_value() {
        let reg = registry();
        reg.insert(table("Fate"));
        let eval = ScriptedEvaluator::new().with_roll_text(": (1D3) ＞ 2");
        let outcome = reg.roll("Fate", &eval).await;
        let RollOutcome::Rolled(result) = outcome else {
            panic!("expected a rolled outcome");
        };
        assert_eq!(result.system, "Fate");
        assert_eq!(result.text, ": (1D3) ＞ 2 ＞ Fate result 2");
        assert_eq!(eval.calls(), vec!["1D3".to_string()]);
    }

    #[tokio::test]
    async fn roll_without_trailing_digits_is_not_rolled() {
        let reg = registry();
        reg.insert(table("Fate"));
        let eval = ScriptedEvaluator::new().with_roll_text("miss");
        assert_eq!(reg.roll("Fate", &eval).await, RollOutcome::NotRolled);
    }

    #[tokio::test]
    async fn roll_transport_failure_is_error() {
        let reg = registry();
        reg.insert(table("Fate"));
        let eval = ScriptedEvaluator::new().failing("connection refused");
        let RollOutcome::Errored(result) = reg.roll("Fate", &eval).await else {
            panic!("expected an error outcome");
        };
        assert!(result.error);
        assert!(result.text.contains("[Fate]"));
    }

    #[test]
    fn trailing_value_takes_last_digits() {
        assert_eq!(trailing_value(": (2D6) ＞ 3[1,2] ＞ 12"), Some("12"));
        assert_eq!(trailing_value("7 then nothing"), None);
        assert_eq!(trailing_value(""), None);
    }

    #[test]
    fn trailing_value_ignores_full_width_digits() {
        assert_eq!(trailing_value(": (1D3) ＞ ３"), None);
        assert_eq!(trailing_value("＞ ３2"), Some("2"));
    }

    #[tokio::test]
    async fn roll_with_oversized_value_still_rolls() {
        let reg = registry();
        reg.insert(table("Fate"));
        let eval = ScriptedEvaluator::new().with_roll_text(": ＞ 99999999999999999999999");
        let RollOutcome::Rolled(result) = reg.roll("Fate", &eval).await else {
            panic!("expected a rolled outcome");
        };
        assert_eq!(result.text, ": (1D3) ＞ 99999999999999999999999");
    }
}
