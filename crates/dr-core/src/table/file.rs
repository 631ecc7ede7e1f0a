//! Parsing of uploaded table files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{RelayError, RelayResult};

/// A parsed custom table.
///
/// File format: the first non-blank line is the command template rolled by
/// the evaluator (e.g. `2D6`). Every following `<number>:<text>` line maps a
/// rolled value to display text. A full-width colon is accepted too; any
/// other line is ignored.
///
/// ```text
/// 1D6
/// 1:A goblin jumps out
/// 2:Nothing happens
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceTable {
    /// Registered name; also the chat command that rolls the table.
    pub name: String,
    /// Command template sent to the evaluator.
    pub command: String,
    /// Rolled value → display text.
    pub results: BTreeMap<u64, String>,
}

impl DiceTable {
    /// Parse a table file.
    pub fn parse(name: &str, text: &str) -> RelayResult<Self> {
        let mut lines = text
            .lines()
            .map(|l| l.trim().trim_start_matches('\u{feff}'))
            .filter(|l| !l.is_empty());
        let command = lines
            .next()
            .ok_or_else(|| RelayError::InvalidTable(format!("[{name}] is empty")))?
            .to_string();

        let results: BTreeMap<u64, String> = lines.filter_map(parse_result_line).collect();
        if results.is_empty() {
            return Err(RelayError::InvalidTable(format!(
                "[{name}] has no \"<number>:<text>\" lines"
            )));
        }

        Ok(Self {
            name: name.to_string(),
            command,
            results,
        })
    }

    /// Display text for a rolled value given as its digit string.
    pub fn display(&self, value: &str) -> String {
        match value.parse().ok().and_then(|v: u64| self.results.get(&v)) {
            Some(text) => format!(": ({}) ＞ {value} ＞ {text}", self.command),
            None => format!(": ({}) ＞ {value}", self.command),
        }
    }

    /// Help text listing the template and every entry.
    pub fn help(&self) -> String {
        let mut out = format!("[{}]\n{}", self.name, self.command);
        for (value, text) in &self.results {
            out.push_str(&format!("\n{value}:{text}"));
        }
        out
    }
}

fn parse_result_line(line: &str) -> Option<(u64, String)> {
    let (key, text) = line.split_once(':').or_else(|| line.split_once('：'))?;
    let value = key.trim().parse().ok()?;
    Some((value, text.trim().to_string()))
}
