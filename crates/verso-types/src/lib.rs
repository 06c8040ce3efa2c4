//! # verso-types
//!
//! Shared domain types used across the Verso workspace: periods, templates,
//! collaborations, memberships, and curator selections.

pub mod collab;
pub mod curation;
pub mod period;
pub mod template;

/// Common id aliases. All ids are SQLite rowids.
pub type ProfileId = i64;
pub type PeriodId = i64;
pub type TemplateId = i64;
pub type CollabId = i64;
pub type SponsorId = i64;
pub type CommunicationId = i64;

/// Default cap for the random-sampling selection mode.
pub const DEFAULT_RANDOM_SELECTION_CAP: usize = 10;

/// Phase number every new collaboration starts at.
pub const INITIAL_PHASE: u32 = 1;
