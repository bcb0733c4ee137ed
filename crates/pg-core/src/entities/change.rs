use serde::{Deserialize, Serialize};

use crate::enums::ChangeStatus;
use crate::serde_ext::number_or_string;

/// A Gerrit change, keyed by `(id, branch, project)`.
///
/// The same logical change (one Change-Id) appears once per branch it was
/// cherry-picked to; each of those is a separate `Change` with its own number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    #[serde(deserialize_with = "number_or_string")]
    pub number: u64,
    /// The `Change-Id` trailer value (`I...`).
    pub id: String,
    pub project: String,
    pub branch: String,
    #[serde(default)]
    pub subject: String,
    pub status: ChangeStatus,
    #[serde(default)]
    pub open: bool,
    /// Patch set kind, e.g. `NO_CODE_CHANGE`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
