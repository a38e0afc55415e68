//! Error taxonomy (§7). Only structurally inconsistent input is fatal; every
//! other condition named in §7 is recovered locally by the algorithm that
//! encounters it.

use thiserror::Error;

use crate::model::RoleType;

/// Fatal precondition failures surfaced to the caller of [`crate::layout::Layout::compute`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    /// §7 "Malformed input (missing reaction, ...)".
    #[error("layout has no reaction to compute around")]
    MissingReaction,

    /// §7 "Malformed input (..., empty participant list)".
    #[error("reaction has no participating entities")]
    NoParticipants,

    /// §7 "a role with stoichiometry < 1" — the only fatal geometric defect.
    #[error("entity {entity_id} has invalid stoichiometry {value} for role {role_type:?}")]
    InvalidStoichiometry {
        entity_id: String,
        role_type: RoleType,
        value: u32,
    },
}
