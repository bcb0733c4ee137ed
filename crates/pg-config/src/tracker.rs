//! External tracker settings.

use serde::{Deserialize, Serialize};

fn default_description() -> String {
    "oVirt gerrit".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackerConfig {
    /// Bugzilla's external tracker type id for this Gerrit (`0` = unset).
    #[serde(default)]
    pub id: u32,

    /// The tracker type's description in Bugzilla, for log output.
    #[serde(default = "default_description")]
    pub description: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            id: 0,
            description: default_description(),
        }
    }
}

impl TrackerConfig {
    pub const fn is_configured(&self) -> bool {
        self.id != 0
    }
}
