use serde::{Deserialize, Serialize};

use crate::serde_ext::string_or_number;

/// The tracker type metadata Bugzilla attaches to each external bug record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackerType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A mirror of a Gerrit change stored inside a bug.
///
/// A bug holds at most one record per `(ext_type_id, ext_bz_bug_id)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExternalTracker {
    pub ext_type_id: u32,
    /// The change number on the external system.
    #[serde(deserialize_with = "string_or_number")]
    pub ext_bz_bug_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext_status: Option<String>,
    /// Holds the branch name for gerrit trackers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext_priority: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ext_type: Option<TrackerType>,
}

/// A partial update for a tracker record. `None` fields keep the stored value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackerUpdate {
    pub ext_type_id: u32,
    pub ext_bz_bug_id: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
}

impl ExternalTracker {
    /// Apply `update` on top of `existing`.
    ///
    /// Supplied fields overwrite, omitted fields keep the stored value, and a
    /// missing record is created from the supplied fields alone. Applying the
    /// same update to its own result yields the same record.
    #[must_use]
    pub fn merged(existing: Option<&Self>, update: &TrackerUpdate) -> Self {
        Self {
            ext_type_id: update.ext_type_id,
            ext_bz_bug_id: update.ext_bz_bug_id.clone(),
            ext_description: pick(
                &update.description,
                existing.and_then(|e| e.ext_description.as_ref()),
            ),
            ext_status: pick(&update.status, existing.and_then(|e| e.ext_status.as_ref())),
            ext_priority: pick(
                &update.priority,
                existing.and_then(|e| e.ext_priority.as_ref()),
            ),
            ext_type: existing.and_then(|e| e.ext_type.clone()),
        }
    }
}

fn pick(supplied: &Option<String>, stored: Option<&String>) -> Option<String> {
    supplied.clone().or_else(|| stored.cloned())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn stored() -> ExternalTracker {
        ExternalTracker {
            ext_type_id: 81,
            ext_bz_bug_id: "74242".into(),
            ext_description: Some("foo".into()),
            ext_status: Some("POST".into()),
            ext_priority: Some("ovirt-engine-4.1".into()),
            ext_type: None,
        }
    }

    fn status_only(status: &str) -> TrackerUpdate {
        TrackerUpdate {
            ext_type_id: 81,
            ext_bz_bug_id: "74242".into(),
            description: None,
            status: Some(status.into()),
            priority: None,
        }
    }

    #[test]
    fn omitted_fields_keep_stored_values() {
        let merged = ExternalTracker::merged(Some(&stored()), &status_only("MODIFIED"));
        assert_eq!(
            merged,
            ExternalTracker {
                ext_status: Some("MODIFIED".into()),
                ..stored()
            }
        );
    }

    #[test]
    fn merge_is_idempotent() {
        let update = status_only("MODIFIED");
        let once = ExternalTracker::merged(Some(&stored()), &update);
        let twice = ExternalTracker::merged(Some(&once), &update);
        assert_eq!(once, twice);
    }

    #[test]
    fn creates_from_supplied_fields_when_absent() {
        let merged = ExternalTracker::merged(None, &status_only("POST"));
        assert_eq!(merged.ext_status.as_deref(), Some("POST"));
        assert_eq!(merged.ext_description, None);
        assert_eq!(merged.ext_priority, None);
    }
}
