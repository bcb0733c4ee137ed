//! Verdicts and reports, the uniform output of every check.

use serde::Serialize;
use std::fmt;

use crate::hook::HookContext;

/// Severity of a single verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Ok,
    Ignore,
    Warn,
    Error,
}

impl Level {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Ignore => "IGNORE",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of one check for one subject (a bug, a branch, or the change).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub level: Level,
    /// `#1234` for a bug, `None` for change-wide verdicts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub detail: String,
}

impl Verdict {
    pub fn new(level: Level, detail: impl Into<String>) -> Self {
        Self {
            level,
            subject: None,
            detail: detail.into(),
        }
    }

    pub fn ok(detail: impl Into<String>) -> Self {
        Self::new(Level::Ok, detail)
    }

    pub fn ignore(detail: impl Into<String>) -> Self {
        Self::new(Level::Ignore, detail)
    }

    pub fn warn(detail: impl Into<String>) -> Self {
        Self::new(Level::Warn, detail)
    }

    pub fn error(detail: impl Into<String>) -> Self {
        Self::new(Level::Error, detail)
    }

    #[must_use]
    pub fn for_bug(self, bug_id: u64) -> Self {
        self.with_subject(format!("#{bug_id}"))
    }

    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// `"<LEVEL>, <detail>"`.
    #[must_use]
    pub fn message(&self) -> String {
        format!("{}, {}", self.level, self.detail)
    }

    /// Whether this verdict forces a negative verify score.
    #[must_use]
    pub fn is_warn(&self) -> bool {
        self.level == Level::Warn
    }
}

/// Review scores derived from a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReviewScores {
    pub code_review: i8,
    pub verified: i8,
}

/// All verdicts one hook run produced, tagged with the hook header.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub context: HookContext,
    pub verdicts: Vec<Verdict>,
}

impl Report {
    #[must_use]
    pub const fn new(context: HookContext) -> Self {
        Self {
            context,
            verdicts: Vec::new(),
        }
    }

    #[must_use]
    pub fn single(context: HookContext, verdict: Verdict) -> Self {
        Self {
            context,
            verdicts: vec![verdict],
        }
    }

    pub fn push(&mut self, verdict: Verdict) {
        self.verdicts.push(verdict);
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.verdicts.iter().any(Verdict::is_warn)
    }

    #[must_use]
    pub fn scores(&self) -> ReviewScores {
        ReviewScores {
            code_review: 0,
            verified: if self.has_warnings() { -1 } else { 0 },
        }
    }

    /// One `"<header>::<subject>::<LEVEL>, <detail>"` line per verdict.
    #[must_use]
    pub fn render(&self) -> String {
        self.verdicts
            .iter()
            .map(|verdict| match &verdict.subject {
                Some(subject) => {
                    format!("{}::{}::{}", self.context.header, subject, verdict.message())
                }
                None => format!("{}::{}", self.context.header, verdict.message()),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::hook::HookKind;

    #[test]
    fn renders_header_subject_and_level() {
        let mut report = Report::new(HookContext::new(HookKind::CheckProduct));
        report.push(Verdict::ok("product: ovirt-engine").for_bug(1234));
        report.push(Verdict::ignore("not relevant for 'Fedora' classification").for_bug(99));

        assert_eq!(
            report.render(),
            "* Check Product::#1234::OK, product: ovirt-engine\n\
             * Check Product::#99::IGNORE, not relevant for 'Fedora' classification"
        );
        assert_eq!(
            report.scores(),
            ReviewScores {
                code_review: 0,
                verified: 0
            }
        );
    }

    #[test]
    fn any_warning_forces_negative_verify() {
        let mut report = Report::new(HookContext::new(HookKind::CheckBackport));
        report.push(Verdict::ok("fine"));
        report.push(Verdict::warn("not backported"));
        assert!(report.has_warnings());
        assert_eq!(report.scores().verified, -1);
        assert_eq!(report.render().lines().nth(1), Some("* Check Backport::WARN, not backported"));
    }

    #[test]
    fn errors_do_not_force_negative_verify() {
        let report = Report::single(
            HookContext::new(HookKind::SetPost),
            Verdict::error("failed to change bug status").for_bug(1),
        );
        assert!(!report.has_warnings());
        assert_eq!(report.scores().verified, 0);
    }
}
