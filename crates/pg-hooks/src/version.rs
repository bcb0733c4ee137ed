//! Ordering of release branch names.
//!
//! ```text
//! master > (X+1).Y > X.(Y+1) > X.Y > X.Y.Z
//! ```
//!
//! Branch names carry a product prefix (`ovirt-engine-4.1`) that is dropped
//! before comparing. The numeric part is walked segment by segment and each
//! segment is parsed only when it is reached, so `foo-5.x` still compares as
//! newer than `foo-4.2`.

use crate::error::HookError;

pub const MASTER: &str = "master";

/// Returns `true` if `candidate` is a newer release line than `reference`.
///
/// # Errors
///
/// [`HookError::NotComparable`] when a segment that has to be compared is not
/// an integer.
pub fn is_newer(candidate: &str, reference: &str) -> Result<bool, HookError> {
    if candidate == MASTER && reference != MASTER {
        return Ok(true);
    }
    if reference == MASTER && candidate != MASTER {
        return Ok(false);
    }
    if candidate == reference {
        return Ok(false);
    }

    let not_comparable = || HookError::NotComparable {
        left: candidate.to_string(),
        right: reference.to_string(),
    };

    let mut left = numeric_part(candidate).split('.');
    let mut right = numeric_part(reference).split('.');
    loop {
        match (left.next(), right.next()) {
            (Some(l), Some(r)) => {
                let l: u64 = l.parse().map_err(|_| not_comparable())?;
                let r: u64 = r.parse().map_err(|_| not_comparable())?;
                if l != r {
                    return Ok(l > r);
                }
            }
            // X.Y is newer than its own point releases X.Y.Z
            (None, Some(_)) => return Ok(true),
            (Some(_), None) | (None, None) => return Ok(false),
        }
    }
}

/// Everything after the last `-`, without trailing dots.
fn numeric_part(name: &str) -> &str {
    name.rsplit_once('-')
        .map_or(name, |(_, version)| version)
        .trim_end_matches('.')
}
