//! Error types shared by the model, the backend boundary and the coordinators.

use thiserror::Error;

/// Violations of the entity model invariants.
///
/// Raised at the validation boundary when backend data enters the system, and by
/// local model mutations that would break an invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ModelError {
    #[error("could not decode backend data: {0}")]
    Decode(String),

    #[error("identifier is empty")]
    EmptyId,

    #[error("identifier '{0}' contains control characters")]
    InvalidId(String),

    #[error("duplicate category '{0}'")]
    DuplicateCategory(String),

    #[error("mod '{0}' appears more than once in the tree")]
    DuplicateMod(String),

    #[error("default category '{0}' is missing")]
    MissingDefaultCategory(String),

    #[error("unknown category '{0}'")]
    UnknownCategory(String),

    #[error("unknown mod '{0}'")]
    UnknownMod(String),

    #[error("category order does not match the known categories: {0}")]
    CategoryOrderMismatch(String),

    #[error("load order is not dense: {0}")]
    NonDenseOrder(String),

    #[error("load order entry '{0}' appears more than once")]
    DuplicateEntry(String),

    #[error("the default category cannot be {0}")]
    DefaultCategoryProtected(&'static str),
}

/// Failures of a backend round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BackendError {
    /// The backend refused the operation (duplicate name, protected category...).
    #[error("{0}")]
    Rejected(String),

    /// The backend could not be reached or its worker died mid-request.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The backend answered with data that failed validation.
    #[error("malformed backend response: {0}")]
    Malformed(#[from] ModelError),
}

impl BackendError {
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }
}

pub type BackendResult<T> = Result<T, BackendError>;
