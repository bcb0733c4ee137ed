//! Bugzilla connection settings.

use serde::{Deserialize, Serialize};

fn default_server() -> String {
    "https://bugzilla.redhat.com".to_string()
}

/// Default HTTP request timeout in seconds.
const fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BugzillaConfig {
    /// Base URL of the Bugzilla instance (e.g., `https://bugzilla.redhat.com`).
    #[serde(default = "default_server")]
    pub server: String,

    /// Login sent with every call.
    #[serde(default)]
    pub user: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BugzillaConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            user: String::new(),
            password: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BugzillaConfig {
    /// The JSON-RPC endpoint under [`Self::server`].
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/jsonrpc.cgi", self.server.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = BugzillaConfig::default();
        assert_eq!(config.server, "https://bugzilla.redhat.com");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.user.is_empty() && config.password.is_empty());
    }

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let config = BugzillaConfig {
            server: "https://bugzilla.example.org/".to_string(),
            ..BugzillaConfig::default()
        };
        assert_eq!(config.endpoint(), "https://bugzilla.example.org/jsonrpc.cgi");
    }
}
