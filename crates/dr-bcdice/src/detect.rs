//! Local guess at whether a line is a dice command.
//!
//! Lines that look like generic dice notation pass without asking the
//! server. Otherwise the line must start with one of the active system's
//! command prefixes, which BCDice publishes as regular expressions.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

static GENERIC_DICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^S?(?:[0-9]*D[0-9]+|[0-9]+[BRU][0-9]+|C\(|CHOICE\[)").expect("dice pattern is valid")
});
static REPEAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^repeat[0-9]+\s+").expect("repeat pattern is valid"));

/// `text` without a leading `repeatN ` marker, trimmed.
pub fn strip_repeat(text: &str) -> &str {
    let text = text.trim();
    match REPEAT.find(text) {
        Some(m) => text[m.end()..].trim(),
        None => text,
    }
}

/// Whether `text` matches the grammar every system understands.
pub fn is_generic_dice(text: &str) -> bool {
    GENERIC_DICE.is_match(strip_repeat(text))
}

/// Compile system prefixes into anchored, case-insensitive patterns.
///
/// Prefixes that are not valid patterns are skipped.
pub fn compile_prefixes(prefixes: &[String]) -> Vec<Regex> {
    prefixes
        .iter()
        .filter_map(|p| match Regex::new(&format!("(?i)^S?(?:{p})")) {
            Ok(re) => Some(re),
            Err(e) => {
                debug!(prefix = %p, error = %e, "skipping unusable command prefix");
                None
            }
        })
        .collect()
}

/// Whether `text` starts with any compiled prefix.
pub fn matches_prefix(text: &str, prefixes: &[Regex]) -> bool {
    let text = strip_repeat(text);
    prefixes.iter().any(|re| re.is_match(text))
}
