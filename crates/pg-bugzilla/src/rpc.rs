//! JSON-RPC envelope handling.
//!
//! Bugzilla's `jsonrpc.cgi` takes `{"method", "params": [ {...} ], "id"}` and
//! answers `{"result", "error", "id"}`. Exactly one of `result` and `error` is
//! non-null.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::BugzillaError;

#[derive(Debug, Serialize)]
pub struct Request<'a, P: Serialize> {
    pub method: &'a str,
    pub params: [P; 1],
    pub id: u32,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    result: Option<T>,
    error: Option<Fault>,
}

#[derive(Debug, Deserialize)]
struct Fault {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// Check the HTTP status of a response and return its body.
pub fn check_response(resp: reqwest::blocking::Response) -> Result<String, BugzillaError> {
    let status = resp.status();
    let body = resp.text()?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(BugzillaError::Api {
            status: status.as_u16(),
            message: body,
        })
    }
}

/// Unwrap the `result` of a JSON-RPC response body.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, BugzillaError> {
    let envelope: Envelope<T> =
        serde_json::from_str(body).map_err(|e| BugzillaError::Parse(e.to_string()))?;
    if let Some(fault) = envelope.error {
        return Err(BugzillaError::Fault {
            code: fault.code,
            message: fault.message,
        });
    }
    envelope
        .result
        .ok_or_else(|| BugzillaError::Parse("response has neither result nor error".to_string()))
}
