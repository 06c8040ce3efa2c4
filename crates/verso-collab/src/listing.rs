//! Membership listings for the caller.

use std::collections::HashMap;

use rusqlite::Connection;

use verso_db::queries::{collabs, memberships};
use verso_db::DbError;
use verso_types::collab::{
    MemberRole, MembershipGroups, MembershipView, Participant, ParticipationMode,
};
use verso_types::ProfileId;

use crate::Result;

/// The caller's active memberships bucketed by participation mode.
///
/// Private collaborations never expose their roster here: the participant
/// list is synthesized to contain only the caller. Community and local
/// entries carry a live participant count instead.
pub fn list_memberships(conn: &Connection, actor: ProfileId) -> Result<MembershipGroups> {
    let rows = memberships::active_for_profile(conn, actor)?;
    if rows.is_empty() {
        return Ok(MembershipGroups::default());
    }

    let collab_ids: Vec<i64> = rows.iter().map(|r| r.collab_id).collect();
    let counts: HashMap<i64, u32> = memberships::active_counts(conn, &collab_ids)?
        .into_iter()
        .collect();

    let mut groups = MembershipGroups::default();
    for row in rows {
        let collab = match collabs::get(conn, row.collab_id) {
            Ok(c) => c,
            Err(DbError::NotFound(_)) => {
                // Orphaned ledger row; skip rather than failing the listing.
                tracing::warn!(collab_id = row.collab_id, "membership without collab row");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let mode = collab.mode();
        let role = MemberRole::parse(&row.role).unwrap_or(MemberRole::Member);

        let (participants, participant_count) = if mode.is_private() {
            (
                vec![Participant {
                    name: "You".to_string(),
                    role,
                }],
                1,
            )
        } else {
            (Vec::new(), counts.get(&collab.id).copied().unwrap_or(0))
        };

        let view = MembershipView {
            collab_id: collab.id,
            title: collab.title,
            description: collab.description,
            template_id: collab.template_id,
            mode: mode.clone(),
            role,
            current_phase: collab.current_phase,
            total_phases: collab.total_phases,
            participant_count,
            participants,
        };

        match mode {
            ParticipationMode::Private => groups.private.push(view),
            ParticipationMode::Local { .. } => groups.local.push(view),
            ParticipationMode::Community => groups.community.push(view),
        }
    }

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::{join, leave, JoinMode, JoinRequest};
    use verso_db::queries::{profiles, templates};

    const DEFAULT_LOCATION: &str = "Community Hall";

    fn test_db() -> Connection {
        verso_db::open_memory().expect("open test db")
    }

    fn join_mode(conn: &Connection, actor: i64, template: i64, mode: JoinMode) -> i64 {
        join(
            conn,
            actor,
            &JoinRequest {
                template_id: template,
                mode,
                invitees: Vec::new(),
            },
            DEFAULT_LOCATION,
            100,
        )
        .expect("join")
        .collab_id
    }

    #[test]
    fn test_empty_for_new_profile() {
        let conn = test_db();
        let actor = profiles::insert(&conn, "Ada", None, true).expect("profile");
        let groups = list_memberships(&conn, actor).expect("list");
        assert!(groups.is_empty());
    }

    #[test]
    fn test_buckets_by_mode() {
        let conn = test_db();
        let actor = profiles::insert(&conn, "Ada", Some("Austin"), true).expect("profile");
        let t1 = templates::insert(&conn, "Urban Chains", None, Some("chain"), None, None)
            .expect("t1");
        let t2 = templates::insert(&conn, "Story Relay", None, None, None, None).expect("t2");
        let t3 = templates::insert(&conn, "Night Walk", None, Some("theme"), None, None)
            .expect("t3");

        join_mode(&conn, actor, t1, JoinMode::Community);
        let local = join_mode(&conn, actor, t2, JoinMode::Local);
        join_mode(&conn, actor, t3, JoinMode::Private);

        let groups = list_memberships(&conn, actor).expect("list");
        assert_eq!(groups.community.len(), 1);
        assert_eq!(groups.local.len(), 1);
        assert_eq!(groups.private.len(), 1);
        assert_eq!(groups.local[0].collab_id, local);
        assert_eq!(groups.local[0].mode.location(), Some("Austin"));
    }

    #[test]
    fn test_private_roster_is_caller_only() {
        let conn = test_db();
        let actor = profiles::insert(&conn, "Ada", None, true).expect("profile");
        let guest = profiles::insert(&conn, "Grace", None, true).expect("profile");
        let template = templates::insert(&conn, "Night Walk", None, Some("theme"), None, None)
            .expect("template");

        let collab_id = join(
            &conn,
            actor,
            &JoinRequest {
                template_id: template,
                mode: JoinMode::Private,
                invitees: vec![guest],
            },
            DEFAULT_LOCATION,
            100,
        )
        .expect("join")
        .collab_id;
        let _ = collab_id;

        let groups = list_memberships(&conn, actor).expect("list");
        assert_eq!(groups.private.len(), 1);
        let view = &groups.private[0];
        assert_eq!(view.participants.len(), 1);
        assert_eq!(view.participants[0].name, "You");
        assert_eq!(view.participants[0].role, MemberRole::Organizer);
    }

    #[test]
    fn test_community_counts_are_live() {
        let conn = test_db();
        let ada = profiles::insert(&conn, "Ada", None, true).expect("profile");
        let grace = profiles::insert(&conn, "Grace", None, true).expect("profile");
        let template = templates::insert(&conn, "Urban Chains", None, Some("chain"), None, None)
            .expect("template");

        let collab_id = join_mode(&conn, ada, template, JoinMode::Community);
        // Grace joins the same collaboration directly.
        verso_db::queries::memberships::insert(
            &conn,
            grace,
            collab_id,
            verso_types::collab::MemberRole::Member,
            verso_types::collab::MemberStatus::Active,
            &ParticipationMode::Community,
            200,
        )
        .expect("insert");

        let groups = list_memberships(&conn, ada).expect("list");
        assert_eq!(groups.community[0].participant_count, 2);
        assert!(groups.community[0].participants.is_empty());
    }

    #[test]
    fn test_empty_after_leave() {
        let conn = test_db();
        let actor = profiles::insert(&conn, "Ada", None, true).expect("profile");
        let template = templates::insert(&conn, "Urban Chains", None, Some("chain"), None, None)
            .expect("template");

        let collab_id = join_mode(&conn, actor, template, JoinMode::Community);
        leave(&conn, actor, collab_id).expect("leave");

        let groups = list_memberships(&conn, actor).expect("list");
        assert!(groups.is_empty());
    }
}
