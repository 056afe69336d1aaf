use std::collections::HashSet;

use shared::domain::{BlacklistedCreator, CreatorId};

use crate::error::CoreError;

/// Parses a user-supplied creator reference. Non-numeric or non-positive
/// input fails here, before any network round trip is attempted.
pub fn parse_reference(raw: &str) -> Result<CreatorId, CoreError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(CreatorId(id)),
        _ => Err(CoreError::InvalidReference {
            raw: raw.to_string(),
        }),
    }
}

/// A blacklist entry must reference a creator present in the current
/// creator set. Invoked before every blacklist create/update verb.
pub fn validate_blacklist_entry(
    creator_id: CreatorId,
    known_creator_ids: &HashSet<CreatorId>,
) -> Result<(), CoreError> {
    if creator_id.0 <= 0 {
        return Err(CoreError::InvalidReference {
            raw: creator_id.0.to_string(),
        });
    }
    if !known_creator_ids.contains(&creator_id) {
        return Err(CoreError::DanglingReference {
            creator_id: creator_id.0,
        });
    }
    Ok(())
}

/// Deletion policy: a creator with dependent blacklist entries cannot be
/// deleted until those entries are removed first.
pub fn ensure_no_dependents(
    creator_id: CreatorId,
    entries: &[BlacklistedCreator],
) -> Result<(), CoreError> {
    let count = entries
        .iter()
        .filter(|entry| entry.creator_id == creator_id)
        .count();
    if count > 0 {
        return Err(CoreError::DependentEntries {
            creator_id: creator_id.0,
            count,
        });
    }
    Ok(())
}
