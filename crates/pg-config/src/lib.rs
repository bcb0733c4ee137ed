//! # pg-config
//!
//! Layered configuration loading for patchgate using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`PATCHGATE_*` prefix, `__` as separator)
//! 2. An explicit file passed with `--config`
//! 3. Repository-level `$GIT_DIR/hooks/patchgate.toml`
//! 4. User-level `~/.config/patchgate/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `PATCHGATE_BUGZILLA__USER` -> `bugzilla.user`,
//! `PATCHGATE_TRACKER__ID` -> `tracker.id`, etc. List values such as
//! `PATCHGATE_RELEVANCE__CLASSIFICATIONS` may be given comma-separated.
//!
//! # Usage
//!
//! ```no_run
//! use pg_config::PatchgateConfig;
//! use std::path::Path;
//!
//! let config = PatchgateConfig::load(Some(Path::new("/srv/git/ovirt-engine.git")), None)
//!     .expect("config");
//! config.ensure_complete().expect("complete config");
//! println!("Bugzilla: {}", config.bugzilla.endpoint());
//! ```

mod bugzilla;
mod error;
mod gerrit;
mod relevance;
mod tracker;

pub use bugzilla::BugzillaConfig;
pub use error::ConfigError;
pub use gerrit::GerritConfig;
pub use relevance::RelevanceConfig;
pub use tracker::TrackerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix of every environment variable read as configuration.
pub const ENV_PREFIX: &str = "PATCHGATE_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PatchgateConfig {
    #[serde(default)]
    pub bugzilla: BugzillaConfig,
    #[serde(default)]
    pub gerrit: GerritConfig,
    #[serde(default)]
    pub relevance: RelevanceConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
}

impl PatchgateConfig {
    /// Load configuration from all sources.
    ///
    /// `git_dir` is the repository the hook runs for; `explicit` is a file
    /// given on the command line, which must exist.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] if `explicit` does not exist,
    /// [`ConfigError::Figment`] if a source cannot be parsed.
    pub fn load(git_dir: Option<&Path>, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit
            && !path.exists()
        {
            return Err(ConfigError::InvalidValue {
                field: "config".to_string(),
                reason: format!("file not found: {}", path.display()),
            });
        }
        Self::figment(git_dir, explicit)
            .extract()
            .map_err(ConfigError::from)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment(git_dir: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Repository hooks directory
        if let Some(repo_path) = git_dir.map(Self::repo_config_path)
            && repo_path.exists()
        {
            figment = figment.merge(Toml::file(repo_path));
        }

        // Layer 3: --config
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        // Layer 4: Environment variables (highest priority)
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Check that every value a hook run needs is present, reporting all
    /// missing keys at once.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotConfigured`] listing the missing keys.
    pub fn ensure_complete(&self) -> Result<(), ConfigError> {
        let checks = [
            ("bugzilla.server", !self.bugzilla.server.is_empty()),
            ("bugzilla.user", !self.bugzilla.user.is_empty()),
            ("bugzilla.password", !self.bugzilla.password.is_empty()),
            ("gerrit.server", self.gerrit.is_configured()),
            (
                "relevance.classifications|relevance.products",
                self.relevance.is_configured(),
            ),
            ("tracker.id", self.tracker.is_configured()),
        ];
        let missing = checks
            .into_iter()
            .filter(|(_, present)| !present)
            .map(|(key, _)| key.to_string())
            .collect::<Vec<_>>();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::NotConfigured { missing })
        }
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("patchgate").join("config.toml"))
    }

    /// Path to the per-repository config file.
    #[must_use]
    pub fn repo_config_path(git_dir: &Path) -> PathBuf {
        git_dir.join("hooks").join("patchgate.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_incomplete() {
        let config = PatchgateConfig::default();
        assert_eq!(config.gerrit.port, 29418);
        assert_eq!(config.tracker.description, "oVirt gerrit");
        assert!(!config.gerrit.is_configured());
        assert!(!config.tracker.is_configured());
    }

    #[test]
    fn figment_builds_without_files() {
        let figment = PatchgateConfig::figment(None, None);
        let config: PatchgateConfig = figment.extract().expect("should extract defaults");
        assert_eq!(config.bugzilla.server, "https://bugzilla.redhat.com");
        assert!(config.relevance.classifications.is_empty());
    }

    #[test]
    fn every_missing_key_is_reported() {
        let err = PatchgateConfig::default().ensure_complete().unwrap_err();
        let ConfigError::NotConfigured { missing } = err else {
            panic!("expected NotConfigured, got {err:?}");
        };
        assert_eq!(
            missing,
            [
                "bugzilla.user",
                "bugzilla.password",
                "gerrit.server",
                "relevance.classifications|relevance.products",
                "tracker.id",
            ]
        );
    }
}
