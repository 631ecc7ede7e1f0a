//! Configuration for a relay instance.

use rand::Rng;

/// Environment variable holding the admin password.
pub const PASSWORD_VAR: &str = "BCDICE_PASSWORD";
/// Environment variable holding a fallback evaluator URL.
pub const SECONDARY_SERVER_VAR: &str = "BCDICE_API_SECONDARY";
/// Environment variable holding the default game system.
pub const DEFAULT_SYSTEM_VAR: &str = "BCDICE_DEFAULT_SYSTEM";

/// Configuration for a relay instance.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Admin password; immutable once the relay is built.
    pub password: String,
    /// Whether `password` was generated because none was configured.
    pub generated_password: bool,
    /// Game system used by channels without a binding.
    pub default_system: String,
    /// Evaluator URLs, primary first.
    pub servers: Vec<String>,
    /// Report evaluator rejections as errors instead of staying silent.
    pub error_sensitive: bool,
    /// Largest accepted bracketed target list.
    pub max_targets: usize,
    /// Maximum characters per outbound fragment.
    pub fragment_limit: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            password: generate_password(),
            generated_password: true,
            default_system: "DiceBot".to_string(),
            servers: Vec::new(),
            error_sensitive: true,
            max_targets: 20,
            fragment_limit: 1000,
        }
    }
}

impl RelayConfig {
    /// Build a config for `primary` from the process environment.
    pub fn from_env(primary: &str) -> Self {
        Self::from_lookup(primary, |key| std::env::var(key).ok())
    }

    /// Build a config for `primary`, reading variables through `lookup`.
    pub fn from_lookup(primary: &str, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default().with_server(primary);
        if let Some(password) = lookup(PASSWORD_VAR).filter(|p| !p.is_empty()) {
            config = config.with_password(password);
        }
        if let Some(secondary) = lookup(SECONDARY_SERVER_VAR).filter(|s| !s.is_empty()) {
            config = config.with_server(secondary);
        }
        if let Some(system) = lookup(DEFAULT_SYSTEM_VAR).filter(|s| !s.is_empty()) {
            config = config.with_default_system(system);
        }
        config
    }

    /// Set the admin password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self.generated_password = false;
        self
    }

    /// Set the default game system.
    pub fn with_default_system(mut self, system: impl Into<String>) -> Self {
        self.default_system = system.into();
        self
    }

    /// Append an evaluator URL.
    pub fn with_server(mut self, url: impl Into<String>) -> Self {
        self.servers.push(url.into());
        self
    }

    /// Set error sensitivity.
    pub fn with_error_sensitive(mut self, sensitive: bool) -> Self {
        self.error_sensitive = sensitive;
        self
    }

    /// Set the target list limit (at least 1).
    pub fn with_max_targets(mut self, max: usize) -> Self {
        self.max_targets = max.max(1);
        self
    }

    /// Set the fragment length limit (at least 1).
    pub fn with_fragment_limit(mut self, limit: usize) -> Self {
        self.fragment_limit = limit.max(1);
        self
    }
}

/// Sixteen random printable ASCII characters, never a space.
pub fn generate_password() -> String {
    let mut rng = rand::rng();
    (0..16)
        .map(|_| char::from(rng.random_range(b'!'..=b'~')))
        .collect()
}
