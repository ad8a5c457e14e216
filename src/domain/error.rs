//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::ItemId;

/// Structural precondition violations of a tree.
///
/// Edits never produce these: invalid input, unknown ids and degenerate
/// arithmetic are defined no-ops or non-finite results, not errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("line item '{label}' has an empty id")]
    EmptyId { label: String },

    #[error("duplicate line item id: {0}")]
    DuplicateId(ItemId),
}
