//! Suppression policy: which chat lines are forwarded to the evaluator.

/// How eagerly ordinary chat is forwarded to the evaluator.
///
/// When `suppressed` is false every line is forwarded and `roll_prefix` is
/// ignored. When it is true and `roll_prefix` is empty, the evaluator's own
/// heuristic decides; otherwise only lines starting with `roll_prefix` are
/// forwarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPolicy {
    /// Whether forwarding is restricted at all.
    pub suppressed: bool,
    /// Marker a line must start with, e.g. `/r`.
    pub roll_prefix: String,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            suppressed: true,
            roll_prefix: String::new(),
        }
    }
}

impl SessionPolicy {
    /// Whether `input` passes the prefix gate (always true without a prefix).
    pub fn accepts(&self, input: &str) -> bool {
        self.roll_prefix.is_empty() || input.starts_with(self.roll_prefix.as_str())
    }

    /// `input` with the roll prefix (if present) removed, trimmed.
    pub fn strip<'a>(&self, input: &'a str) -> &'a str {
        let trimmed = input.trim();
        trimmed
            .strip_prefix(self.roll_prefix.as_str())
            .unwrap_or(trimmed)
            .trim()
    }
}

/// Argument of the `suppressroll` admin command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuppressMode {
    /// Forward every line.
    Disabled,
    /// Let the evaluator guess which lines are dice commands.
    Heuristic,
    /// Forward only lines starting with the given marker.
    Prefix(String),
}

impl SuppressMode {
    /// Parse the optional mode argument.
    ///
    /// `disable` turns suppression off, a `/`-prefixed word becomes the
    /// marker, and anything else (including nothing) selects the heuristic.
    pub fn parse(arg: Option<&str>) -> Self {
        match arg {
            Some("disable") => Self::Disabled,
            Some(marker) if marker.starts_with('/') => Self::Prefix(marker.to_string()),
            _ => Self::Heuristic,
        }
    }

    /// The policy this mode installs.
    pub fn policy(&self) -> SessionPolicy {
        match self {
            Self::Disabled => SessionPolicy {
                suppressed: false,
                roll_prefix: String::new(),
            },
            Self::Heuristic => SessionPolicy::default(),
            Self::Prefix(marker) => SessionPolicy {
                suppressed: true,
                roll_prefix: marker.clone(),
            },
        }
    }
}
