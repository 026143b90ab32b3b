//! Domain-level error type shared across the workspace.

use crate::types::DbId;

/// Error raised by domain logic and surfaced to the HTTP layer.
///
/// The API crate maps each variant to a status code; see its `AppError`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity lookup by id came back empty.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Input failed a domain validation rule.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operation conflicts with existing state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The caller is authenticated but not permitted.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// An invariant was violated; not the caller's fault.
    #[error("Internal error: {0}")]
    Internal(String),
}
