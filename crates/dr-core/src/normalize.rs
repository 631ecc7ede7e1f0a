//! Canonicalizes roll commands before they are sent to the evaluator.
//!
//! The evaluator matches some operators (`<`, `>`, `=`) token-for-token, so
//! whitespace around them is removed. The result is then percent-encoded for
//! use as a query value.

use std::sync::LazyLock;

use regex::Regex;

/// Operators that must sit tight against their operands. Runs of the same
/// operator also collapse to one.
static TIGHT_OPERATORS: LazyLock<[(Regex, &'static str); 3]> = LazyLock::new(|| {
    [
        (tight("<"), "<"),
        (tight(">"), ">"),
        (tight("="), "="),
    ]
});

fn tight(op: &str) -> Regex {
    Regex::new(&format!(r"\s*[{op}]+\s*")).expect("operator pattern is valid")
}

/// Normalize a raw roll command into evaluator-safe text.
///
/// Spaces become `%20` before encoding so they survive as a single encoded
/// token instead of `+`.
pub fn normalize(raw: &str) -> String {
    let mut command = raw.to_string();
    for (pattern, op) in TIGHT_OPERATORS.iter() {
        command = pattern.replace_all(&command, *op).into_owned();
    }
    let encoded = urlencoding::encode(&command.replace(' ', "%20")).into_owned();
    encoded.replace("%2520", "%20").replace("%7E", "~")
}
