//! Gerrit SSH settings.

use serde::{Deserialize, Serialize};

/// Gerrit's standard SSH port.
const fn default_port() -> u16 {
    29418
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GerritConfig {
    /// SSH destination, optionally with a user (`hooks@gerrit.ovirt.org`).
    #[serde(default)]
    pub server: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GerritConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            port: default_port(),
        }
    }
}

impl GerritConfig {
    pub fn is_configured(&self) -> bool {
        !self.server.is_empty()
    }
}
