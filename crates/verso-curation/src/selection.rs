//! Persisting a curator's selections.

use rand::seq::SliceRandom;
use rusqlite::Connection;
use serde::Serialize;

use verso_db::queries::{collabs, communications, memberships, profiles, selections};
use verso_db::DbError;
use verso_types::curation::{RandomPool, SelectionCategory, SelectionSet};
use verso_types::{PeriodId, ProfileId};

use crate::{CurationError, Result};

/// Outcome of a selection save.
///
/// Categories are persisted independently; a failed category is left empty
/// for the period (its delete stood, its inserts did not) and is reported
/// here rather than rolling back the categories that succeeded.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SaveOutcome {
    pub failed: Vec<SelectionCategory>,
}

impl SaveOutcome {
    /// True when at least one category failed to persist.
    pub fn is_partial(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Replace the curator's selections for a period with the given set.
///
/// Each of the four categories is a delete-then-insert replace executed on
/// its own; there is deliberately no cross-category transaction. Failures
/// are logged, surfaced in the outcome, and never undo other categories.
pub fn save_selections(
    conn: &Connection,
    curator: ProfileId,
    period: PeriodId,
    set: &SelectionSet,
    now: u64,
) -> Result<SaveOutcome> {
    let mut outcome = SaveOutcome::default();

    let results = [
        (
            SelectionCategory::Creators,
            selections::replace_creators(conn, curator, period, &set.creator_ids, now),
        ),
        (
            SelectionCategory::Sponsors,
            selections::replace_sponsors(conn, curator, period, &set.sponsor_ids, now),
        ),
        (
            SelectionCategory::Collabs,
            selections::replace_collabs(conn, curator, period, &set.collab_ids, now),
        ),
        (
            SelectionCategory::Communications,
            selections::set_include_communications(
                conn,
                curator,
                period,
                set.include_communications,
            ),
        ),
    ];

    for (category, result) in results {
        if let Err(e) = result {
            tracing::warn!(
                curator,
                period,
                category = category.as_str(),
                error = %e,
                "selection category failed to persist"
            );
            outcome.failed.push(category);
        }
    }

    if outcome.is_partial() {
        tracing::warn!(curator, period, failed = outcome.failed.len(), "partial selection save");
    } else {
        tracing::info!(curator, period, "selections saved");
    }

    Ok(outcome)
}

/// The curator's persisted selections for a period.
pub fn load_selections(
    conn: &Connection,
    curator: ProfileId,
    period: PeriodId,
) -> Result<SelectionSet> {
    Ok(SelectionSet {
        creator_ids: selections::creators(conn, curator, period)?,
        sponsor_ids: selections::sponsors(conn, curator, period)?,
        collab_ids: selections::collabs(conn, curator, period)?,
        include_communications: selections::include_communications(conn, curator, period)?,
    })
}

/// Draw a random sample of eligible ids for the curator.
///
/// Shuffles the eligible candidate set and takes the first `cap`. Not
/// deterministic and not meant to be: every explicit re-trigger produces a
/// different sample, so callers must never re-run it implicitly.
pub fn random_selection(
    conn: &Connection,
    curator: ProfileId,
    period: PeriodId,
    pool: RandomPool,
    cap: usize,
) -> Result<Vec<i64>> {
    let mut eligible = match pool {
        RandomPool::Collabs => eligible_collab_ids(conn, curator, period)?,
        RandomPool::Communications => communications::submitted_for_recipient(conn, curator, period)?
            .into_iter()
            .map(|c| c.id)
            .collect(),
    };

    eligible.shuffle(&mut rand::thread_rng());
    eligible.truncate(cap);
    Ok(eligible)
}

/// Community/local collaborations for the period the curator has not joined.
pub(crate) fn eligible_collab_ids(
    conn: &Connection,
    curator: ProfileId,
    period: PeriodId,
) -> Result<Vec<i64>> {
    let joined: std::collections::HashSet<i64> = memberships::active_collab_ids(conn, curator)?
        .into_iter()
        .collect();

    Ok(collabs::open_for_period(conn, period)?
        .into_iter()
        .filter(|c| !joined.contains(&c.id))
        .map(|c| c.id)
        .collect())
}

/// Send a communication to a curator for a period.
///
/// The recipient's consent is checked before anything is written: curators
/// opt in or out of communications wholesale, and writing to a
/// non-consenting recipient is a permission error, not a validation one.
pub fn send_communication(
    conn: &Connection,
    sender: ProfileId,
    recipient: ProfileId,
    period: PeriodId,
    subject: &str,
    body: Option<&str>,
    now: u64,
) -> Result<i64> {
    if subject.trim().is_empty() {
        return Err(CurationError::Validation("subject is required".to_string()));
    }

    let profile = match profiles::get(conn, recipient) {
        Ok(p) => p,
        Err(DbError::NotFound(_)) => {
            return Err(CurationError::Validation(format!(
                "recipient {recipient} not found"
            )))
        }
        Err(e) => return Err(e.into()),
    };
    if !profile.accepts_communications {
        return Err(CurationError::PermissionDenied(format!(
            "recipient {recipient} does not accept communications"
        )));
    }

    let id = communications::insert(conn, period, sender, recipient, subject, body, now)?;
    tracing::info!(communication_id = id, sender, recipient, "communication submitted");
    Ok(id)
}
