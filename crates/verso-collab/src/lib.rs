//! # verso-collab
//!
//! The collaboration lifecycle engine for the Verso platform.
//!
//! This crate implements:
//!
//! - [`lifecycle`] - Joining and leaving collaborations, with idempotent
//!   rejoin semantics and local-mode location resolution
//! - [`listing`] - The caller's active memberships bucketed by
//!   participation mode
//! - [`catalog`] - Which templates the caller may still instantiate in the
//!   current period
//!
//! ## Join Flow
//!
//! 1. Resolve the template; the participation mode is the single source of
//!    truth for privacy.
//! 2. If the actor already created a collaboration from this template and
//!    any membership evidence survives, reuse that instance (append a fresh
//!    active membership) instead of creating a duplicate.
//! 3. Otherwise instantiate a new collaboration from the template and insert
//!    the actor's own active membership.
//! 4. For private collaborations, insert invited-status rows for invitees;
//!    invite failures are reported but never roll back the join.

pub mod catalog;
pub mod lifecycle;
pub mod listing;

use verso_db::DbError;

/// Error types for collaboration lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum CollabError {
    /// The requested template does not exist.
    #[error("template {0} not found")]
    TemplateNotFound(i64),

    /// The actor holds no active membership in the collaboration.
    #[error("profile {profile_id} is not a participant of collab {collab_id}")]
    NotAParticipant { profile_id: i64, collab_id: i64 },

    /// Database failure.
    #[error("database error: {0}")]
    Db(#[from] DbError),
}

/// Convenience result type for collaboration operations.
pub type Result<T> = std::result::Result<T, CollabError>;
