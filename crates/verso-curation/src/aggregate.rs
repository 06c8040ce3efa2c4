//! The read-only curation bundle.
//!
//! One call assembles everything a curator needs to make their selections
//! for a period. Each sub-fetch degrades independently: a failed section
//! logs and comes back empty so the rest of the bundle still renders.

use std::collections::{BTreeSet, HashMap, HashSet};

use rusqlite::Connection;
use serde::Serialize;

use verso_collab::listing;
use verso_db::queries::{collabs, communications, memberships, profiles, sponsors, submissions};
use verso_types::collab::MembershipView;
use verso_types::curation::{
    AvailableCollabView, CommunicationView, CreatorGroup, SelectionSet, SponsorView,
};
use verso_types::{PeriodId, ProfileId};

use crate::selection;
use crate::Result;

/// Everything a curator can select from for a period, plus what they have
/// already selected.
#[derive(Clone, Debug, Default, Serialize)]
pub struct CurationBundle {
    pub creators: Vec<CreatorGroup>,
    pub sponsors: Vec<SponsorView>,
    pub joined: Vec<MembershipView>,
    pub available: Vec<AvailableCollabView>,
    pub communications: Vec<CommunicationView>,
    pub prior: SelectionSet,
}

/// Assemble the curation bundle for a curator and period.
///
/// Never fails outright: any section whose fetch errors is logged and
/// replaced with its empty value.
pub fn curation_bundle(
    conn: &Connection,
    curator: ProfileId,
    period: PeriodId,
) -> CurationBundle {
    CurationBundle {
        creators: fetch("creators", || creator_groups(conn, period)),
        sponsors: fetch("sponsors", || sponsor_views(conn, period)),
        joined: fetch("joined", || joined_collabs(conn, curator)),
        available: fetch("available", || available_collabs(conn, curator, period)),
        communications: fetch("communications", || {
            communication_views(conn, curator, period)
        }),
        prior: fetch("prior", || {
            selection::load_selections(conn, curator, period)
        }),
    }
}

fn fetch<T: Default>(section: &str, f: impl FnOnce() -> Result<T>) -> T {
    f().unwrap_or_else(|e| {
        tracing::warn!(section, error = %e, "bundle section failed; returning empty");
        T::default()
    })
}

/// Published work for the period grouped by creator, tags de-duplicated.
fn creator_groups(conn: &Connection, period: PeriodId) -> Result<Vec<CreatorGroup>> {
    let rows = submissions::published_for_period(conn, period)?;

    // Rows arrive ordered by creator, so groups form in a single pass.
    let mut groups: Vec<CreatorGroup> = Vec::new();
    let mut tags: BTreeSet<String> = BTreeSet::new();

    for row in rows {
        let starts_new_group = groups
            .last()
            .map(|g| g.creator_id != row.creator_id)
            .unwrap_or(true);
        if starts_new_group {
            if let Some(last) = groups.last_mut() {
                last.tags = std::mem::take(&mut tags).into_iter().collect();
            }
            groups.push(CreatorGroup {
                creator_id: row.creator_id,
                creator_name: profiles::get(conn, row.creator_id)
                    .ok()
                    .map(|p| p.display_name),
                titles: Vec::new(),
                tags: Vec::new(),
            });
        }

        if let Some(group) = groups.last_mut() {
            group.titles.push(row.title);
        }
        if let Some(raw) = row.tags {
            for tag in raw.split(',') {
                let tag = tag.trim();
                if !tag.is_empty() {
                    tags.insert(tag.to_string());
                }
            }
        }
    }
    if let Some(last) = groups.last_mut() {
        last.tags = tags.into_iter().collect();
    }

    Ok(groups)
}

fn sponsor_views(conn: &Connection, period: PeriodId) -> Result<Vec<SponsorView>> {
    Ok(sponsors::active_for_period(conn, period)?
        .into_iter()
        .map(|row| SponsorView {
            sponsor_id: row.id,
            name: row.name,
            blurb: row.blurb,
        })
        .collect())
}

/// The curator's own active collaborations, flattened across modes.
fn joined_collabs(conn: &Connection, curator: ProfileId) -> Result<Vec<MembershipView>> {
    let groups = listing::list_memberships(conn, curator).map_err(|e| match e {
        verso_collab::CollabError::Db(db) => crate::CurationError::Db(db),
        other => crate::CurationError::Validation(other.to_string()),
    })?;

    let mut joined = groups.private;
    joined.extend(groups.community);
    joined.extend(groups.local);
    joined.sort_by_key(|v| v.collab_id);
    Ok(joined)
}

/// Community/local collaborations for the period the curator has not joined.
fn available_collabs(
    conn: &Connection,
    curator: ProfileId,
    period: PeriodId,
) -> Result<Vec<AvailableCollabView>> {
    let joined: HashSet<i64> = memberships::active_collab_ids(conn, curator)?
        .into_iter()
        .collect();

    let open: Vec<_> = collabs::open_for_period(conn, period)?
        .into_iter()
        .filter(|c| !joined.contains(&c.id))
        .collect();

    let ids: Vec<i64> = open.iter().map(|c| c.id).collect();
    let counts: HashMap<i64, u32> = memberships::active_counts(conn, &ids)?
        .into_iter()
        .collect();

    Ok(open
        .into_iter()
        .map(|c| AvailableCollabView {
            participant_count: counts.get(&c.id).copied().unwrap_or(0),
            collab_id: c.id,
            title: c.title,
            mode: c.participation_mode,
            location: c.location,
        })
        .collect())
}

fn communication_views(
    conn: &Connection,
    curator: ProfileId,
    period: PeriodId,
) -> Result<Vec<CommunicationView>> {
    Ok(communications::submitted_for_recipient(conn, curator, period)?
        .into_iter()
        .map(|row| CommunicationView {
            communication_id: row.id,
            sender_id: row.sender_id,
            subject: row.subject,
            body: row.body,
            sent_at: row.sent_at,
        })
        .collect())
}
