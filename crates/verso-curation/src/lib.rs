//! # verso-curation
//!
//! Curation for the Verso platform: assembling what a curator can choose
//! from for a period, and persisting what they chose.
//!
//! This crate implements:
//!
//! - [`selection`] - Saving a curator's selection set (replace semantics,
//!   per-category partial failure), the random-sampling selection mode, and
//!   consent-checked communications
//! - [`aggregate`] - The read-only curation bundle: creators, sponsors,
//!   collaborations, communications, and prior selections, each sub-fetch
//!   degrading independently

pub mod aggregate;
pub mod selection;

use verso_db::DbError;

/// Error types for curation operations.
#[derive(Debug, thiserror::Error)]
pub enum CurationError {
    /// A required field is missing or malformed.
    #[error("validation error: {0}")]
    Validation(String),

    /// The actor lacks the right to perform the operation.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Database failure.
    #[error("database error: {0}")]
    Db(#[from] DbError),
}

/// Convenience result type for curation operations.
pub type Result<T> = std::result::Result<T, CurationError>;
