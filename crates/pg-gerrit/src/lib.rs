//! # pg-gerrit
//!
//! Gerrit client for patchgate over the SSH command interface.
//!
//! - `gerrit query --format=json` for change lookups ([`pg_core::ChangeSource`])
//! - `gerrit review` for posting a hook report back to a patch set
//!
//! Commands run through the `ssh` binary, so authentication is whatever the
//! hook user's ssh configuration provides.

mod error;

pub use error::GerritError;

use std::process::Command;

use pg_core::{Change, ChangeSource, ReviewScores, TransportError};
use serde_json::Value;
use tracing::debug;

pub const DEFAULT_PORT: u16 = 29418;

/// A review to post on one patch set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRequest<'a> {
    pub commit: &'a str,
    pub project: &'a str,
    pub message: &'a str,
    pub scores: ReviewScores,
}

// ── Client ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct GerritClient {
    program: String,
    server: String,
    port: u16,
}

impl GerritClient {
    /// `server` is an ssh destination (`user@gerrit.example.org` or a host
    /// alias from `~/.ssh/config`).
    pub fn new(server: impl Into<String>, port: u16) -> Self {
        Self {
            program: "ssh".to_string(),
            server: server.into(),
            port,
        }
    }

    /// Run commands through `program` instead of `ssh`.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    #[must_use]
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Arguments passed to ssh for `gerrit <action> <options...>`.
    #[must_use]
    pub fn command_args(&self, action: &str, options: &[String]) -> Vec<String> {
        let mut args: Vec<String> = [
            "-o",
            "UserKnownHostsFile=/dev/null",
            "-o",
            "StrictHostKeyChecking=no",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        args.push(self.server.clone());
        args.push("-p".to_string());
        args.push(self.port.to_string());
        args.push("gerrit".to_string());
        args.push(action.to_string());
        args.extend(options.iter().cloned());
        args
    }

    fn run(&self, action: &str, options: &[String]) -> Result<String, GerritError> {
        let args = self.command_args(action, options);
        debug!(server = %self.server, action, "gerrit command");
        let output = Command::new(&self.program).args(&args).output()?;
        if !output.status.success() {
            return Err(GerritError::CommandFailed {
                command: format!("gerrit {action}"),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Changes matching `query`, with their commit messages.
    ///
    /// # Errors
    ///
    /// Returns [`GerritError`] if ssh fails or the output cannot be parsed.
    pub fn query(&self, query: &str) -> Result<Vec<Change>, GerritError> {
        let options = [
            "--format=json".to_string(),
            "--start=0".to_string(),
            "--commit-message".to_string(),
            "--".to_string(),
            query.to_string(),
        ];
        let changes = parse_query_output(&self.run("query", &options)?)?;
        debug!(query, found = changes.len(), "gerrit query");
        Ok(changes)
    }

    /// Post `review.message` and scores on a patch set.
    ///
    /// # Errors
    ///
    /// Returns [`GerritError`] if ssh fails or Gerrit rejects the review.
    pub fn review(&self, review: &ReviewRequest<'_>) -> Result<(), GerritError> {
        let options = [
            review.commit.to_string(),
            format!("--message={}", quote(review.message)),
            format!("--project={}", review.project),
            format!("--verified={}", review.scores.verified),
            format!("--code-review={}", review.scores.code_review),
        ];
        self.run("review", &options).map(drop)
    }
}

impl ChangeSource for GerritClient {
    fn query_changes(&self, query: &str) -> Result<Vec<Change>, TransportError> {
        Ok(self.query(query)?)
    }
}

/// Parse `gerrit query --format=json` output: one JSON object per line,
/// ending with a `{"type":"stats"}` row.
///
/// # Errors
///
/// [`GerritError::Query`] for an error row, [`GerritError::Json`] for a row
/// that is not a change.
pub fn parse_query_output(stdout: &str) -> Result<Vec<Change>, GerritError> {
    let mut changes = Vec::new();
    for line in stdout.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let row: Value = serde_json::from_str(line)?;
        match row.get("type").and_then(Value::as_str) {
            Some("stats") => {}
            Some("error") => {
                let message = row
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error");
                return Err(GerritError::Query(message.to_string()));
            }
            _ => changes.push(serde_json::from_value(row)?),
        }
    }
    Ok(changes)
}

/// Double-quote a value for Gerrit's ssh argument splitter.
fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

#[cfg(test)]
mod tests {
    use pg_core::ChangeStatus;
    use pretty_assertions::assert_eq;

    use super::*;

    const QUERY_OUTPUT: &str = r#"{"project":"ovirt-engine","branch":"ovirt-engine-4.1","id":"I0123456789abcdef","number":"74242","subject":"core: keep snapshot disks","owner":{"name":"Dev"},"url":"https://gerrit.ovirt.org/74242","commitMessage":"core: keep snapshot disks\n\nBug-Url: https://bugzilla.redhat.com/1418311\nChange-Id: I0123456789abcdef\n","createdOn":1490000000,"open":true,"status":"NEW"}
{"project":"ovirt-engine","branch":"master","id":"I0123456789abcdef","number":"74100","subject":"core: keep snapshot disks","url":"https://gerrit.ovirt.org/74100","open":false,"status":"MERGED"}
{"type":"stats","rowCount":2,"runTimeMilliseconds":12,"moreChanges":false}
"#;

    #[test]
    fn parses_rows_and_skips_stats() {
        let changes = parse_query_output(QUERY_OUTPUT).unwrap();
        assert_eq!(changes.len(), 2);

        assert_eq!(changes[0].number, 74242);
        assert_eq!(changes[0].branch, "ovirt-engine-4.1");
        assert_eq!(changes[0].status, ChangeStatus::New);
        assert!(
            changes[0]
                .commit_message
                .as_deref()
                .unwrap()
                .contains("Bug-Url: https://bugzilla.redhat.com/1418311")
        );

        assert_eq!(changes[1].branch, "master");
        assert!(changes[1].status.is_merged());
    }

    #[test]
    fn empty_result_is_only_stats() {
        let changes =
            parse_query_output("{\"type\":\"stats\",\"rowCount\":0}\n").unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn error_row_is_reported() {
        let err = parse_query_output(
            "{\"type\":\"error\",\"message\":\"Unsupported query:bogus\"}\n",
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "query error: Unsupported query:bogus");
    }

    #[test]
    fn garbage_is_a_json_error() {
        let err = parse_query_output("fatal: not a Gerrit project\n").unwrap_err();
        assert!(matches!(err, GerritError::Json(_)));
    }

    #[test]
    fn query_command_line() {
        let client = GerritClient::new("hooks@gerrit.example.org", DEFAULT_PORT);
        let args = client.command_args(
            "query",
            &["--format=json".to_string(), "I0123 project:vdsm".to_string()],
        );
        assert_eq!(
            args,
            [
                "-o",
                "UserKnownHostsFile=/dev/null",
                "-o",
                "StrictHostKeyChecking=no",
                "hooks@gerrit.example.org",
                "-p",
                "29418",
                "gerrit",
                "query",
                "--format=json",
                "I0123 project:vdsm",
            ]
        );
    }

    #[test]
    fn review_message_is_quoted() {
        assert_eq!(quote("* Check Bug-Url::OK"), "\"* Check Bug-Url::OK\"");
        assert_eq!(quote(r#"say "hi" \o/"#), r#""say \"hi\" \\o/""#);
    }

    #[test]
    fn failing_command_is_a_transport_error() {
        let client = GerritClient::new("gerrit.example.org", DEFAULT_PORT).with_program("false");
        let err = client.query_changes("c0ffee").unwrap_err();
        assert_eq!(err.service, "gerrit");
        assert!(err.message.contains("gerrit query"));
    }

    #[test]
    fn missing_program_is_an_io_error() {
        let client = GerritClient::new("gerrit.example.org", DEFAULT_PORT)
            .with_program("/nonexistent/patchgate-ssh");
        assert!(matches!(client.query("c0ffee"), Err(GerritError::Io(_))));
    }
}
