//! # pg-bugzilla
//!
//! Bugzilla client for patchgate over the JSON-RPC endpoint (`jsonrpc.cgi`).
//!
//! Implements [`pg_core::BugTracker`]:
//! - `Bug.get` with `external_bugs` for bug lookups
//! - `Bug.update` for status changes
//! - `ExternalBugs.add_external_bug` / `ExternalBugs.update_external_bug` for
//!   tracker records
//!
//! Every call is a single blocking request; nothing is retried.

mod error;
mod rpc;

pub use error::BugzillaError;

use std::time::Duration;

use pg_core::{Bug, BugStatus, BugTracker, ExternalTracker, TransportError};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::rpc::{Request, check_response, decode};

#[derive(Debug, Deserialize)]
struct BugsResult {
    #[serde(default)]
    bugs: Vec<Bug>,
}

/// The writable fields of a tracker record, as `ExternalBugs.*` expect them.
#[derive(Debug, Serialize, PartialEq, Eq)]
struct ExternalBugFields<'a> {
    ext_type_id: u32,
    ext_bz_bug_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    ext_description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ext_status: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ext_priority: Option<&'a str>,
}

impl<'a> From<&'a ExternalTracker> for ExternalBugFields<'a> {
    fn from(record: &'a ExternalTracker) -> Self {
        Self {
            ext_type_id: record.ext_type_id,
            ext_bz_bug_id: &record.ext_bz_bug_id,
            ext_description: record.ext_description.as_deref(),
            ext_status: record.ext_status.as_deref(),
            ext_priority: record.ext_priority.as_deref(),
        }
    }
}

// ── Client ─────────────────────────────────────────────────────────

pub struct BugzillaClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    user: Option<String>,
    password: Option<String>,
}

impl BugzillaClient {
    /// Create a client for `endpoint` (`https://bugzilla.example.org/jsonrpc.cgi`).
    ///
    /// # Errors
    ///
    /// [`BugzillaError::Http`] if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, BugzillaError> {
        Ok(Self {
            http: reqwest::blocking::Client::builder()
                .user_agent(concat!("patchgate/", env!("CARGO_PKG_VERSION")))
                .timeout(timeout)
                .build()?,
            endpoint: endpoint.into(),
            user: None,
            password: None,
        })
    }

    /// Send `user` / `password` with every call.
    #[must_use]
    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = Some(user.into()).filter(|u| !u.is_empty());
        self.password = Some(password.into()).filter(|p| !p.is_empty());
        self
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Add `Bugzilla_login` / `Bugzilla_password` to a params object.
    fn authenticated(&self, mut params: Value) -> Value {
        if let Value::Object(map) = &mut params {
            if let Some(user) = &self.user {
                map.insert("Bugzilla_login".to_string(), json!(user));
            }
            if let Some(password) = &self.password {
                map.insert("Bugzilla_password".to_string(), json!(password));
            }
        }
        params
    }

    /// Invoke `method` with `params` and decode its result.
    ///
    /// # Errors
    ///
    /// Returns [`BugzillaError`] if the HTTP request fails, Bugzilla returns
    /// a non-success status or a fault, or the response cannot be parsed.
    pub fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, BugzillaError> {
        debug!(method, endpoint = %self.endpoint, "bugzilla call");
        let request = Request {
            method,
            params: [self.authenticated(params)],
            id: 1,
        };
        let body = check_response(self.http.post(&self.endpoint).json(&request).send()?)?;
        decode(&body)
    }

    /// Fetch a bug with its external trackers. `Ok(None)` if the bug does
    /// not exist or is not visible to the configured user.
    ///
    /// # Errors
    ///
    /// Any [`BugzillaError`] other than the missing-bug faults.
    pub fn fetch_bug(&self, bug_id: u64) -> Result<Option<Bug>, BugzillaError> {
        let params = json!({ "ids": [bug_id], "extra_fields": ["external_bugs"] });
        match self.call::<BugsResult>("Bug.get", params) {
            Ok(result) => Ok(result.bugs.into_iter().next()),
            Err(error) if error.is_missing_bug() => {
                debug!(bug_id, %error, "bug not visible");
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    /// Set the status of `bug_id`.
    ///
    /// # Errors
    ///
    /// Returns [`BugzillaError`] if the call fails.
    pub fn set_status(&self, bug_id: u64, status: &BugStatus) -> Result<(), BugzillaError> {
        let params = json!({ "ids": [bug_id], "status": status.as_str() });
        self.call::<Value>("Bug.update", params).map(drop)
    }

    /// Attach a tracker record to `bug_id`.
    ///
    /// # Errors
    ///
    /// Returns [`BugzillaError`] if the call fails.
    pub fn add_external(&self, bug_id: u64, record: &ExternalTracker) -> Result<(), BugzillaError> {
        let params = json!({
            "bug_ids": [bug_id],
            "external_bugs": [ExternalBugFields::from(record)],
        });
        self.call::<Value>("ExternalBugs.add_external_bug", params)
            .map(drop)
    }

    /// Rewrite the tracker record `(ext_type_id, ext_bz_bug_id)` on `bug_id`.
    ///
    /// # Errors
    ///
    /// Returns [`BugzillaError`] if the call fails.
    pub fn update_external(
        &self,
        bug_id: u64,
        record: &ExternalTracker,
    ) -> Result<(), BugzillaError> {
        let mut params = serde_json::to_value(ExternalBugFields::from(record))
            .map_err(|e| BugzillaError::Parse(e.to_string()))?;
        if let Value::Object(map) = &mut params {
            map.insert("bug_ids".to_string(), json!([bug_id]));
        }
        self.call::<Value>("ExternalBugs.update_external_bug", params)
            .map(drop)
    }
}

impl BugTracker for BugzillaClient {
    fn get_bug(&self, bug_id: u64) -> Result<Option<Bug>, TransportError> {
        Ok(self.fetch_bug(bug_id)?)
    }

    fn update_bug_status(&self, bug_id: u64, status: &BugStatus) -> Result<(), TransportError> {
        Ok(self.set_status(bug_id, status)?)
    }

    fn add_external_tracker(
        &self,
        bug_id: u64,
        record: &ExternalTracker,
    ) -> Result<(), TransportError> {
        Ok(self.add_external(bug_id, record)?)
    }

    fn update_external_tracker(
        &self,
        bug_id: u64,
        record: &ExternalTracker,
    ) -> Result<(), TransportError> {
        Ok(self.update_external(bug_id, record)?)
    }
}
