//! Joining and leaving collaborations.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use verso_db::queries::{collabs, memberships, profiles, templates};
use verso_db::DbError;
use verso_types::collab::{MemberRole, MemberStatus, ParticipationMode};
use verso_types::template::TemplateKind;
use verso_types::{CollabId, ProfileId, TemplateId};

use crate::{CollabError, Result};

/// The participation mode requested by the caller.
///
/// Local-mode location is resolved server-side, so the request form carries
/// no location and no privacy flag; privacy is derived from the mode alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinMode {
    Community,
    Local,
    Private,
}

impl JoinMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "community" => Some(JoinMode::Community),
            "local" => Some(JoinMode::Local),
            "private" => Some(JoinMode::Private),
            _ => None,
        }
    }
}

/// A join request.
#[derive(Clone, Debug)]
pub struct JoinRequest {
    pub template_id: TemplateId,
    pub mode: JoinMode,
    /// Only honored for private collaborations.
    pub invitees: Vec<ProfileId>,
}

/// Outcome of a join.
#[derive(Clone, Debug, Serialize)]
pub struct JoinOutcome {
    pub collab_id: CollabId,
    /// True when a prior collaboration instance was reused instead of a new
    /// one being created.
    pub reactivated: bool,
    /// Invitees whose invite row could not be written. The join itself is
    /// durable regardless.
    pub failed_invites: Vec<ProfileId>,
}

/// Join a collaboration instantiated from a template.
///
/// If the actor previously created a collaboration from this template and
/// any membership row for it survives, that instance is reused: an already
/// active membership makes the call a no-op, otherwise a fresh active row is
/// appended. Only when no membership evidence survives is a new
/// collaboration created. Invite failures for private collaborations are
/// reported via [`JoinOutcome::failed_invites`] and never undo the join.
pub fn join(
    conn: &Connection,
    actor: ProfileId,
    request: &JoinRequest,
    default_location: &str,
    now: u64,
) -> Result<JoinOutcome> {
    let template = match templates::get(conn, request.template_id) {
        Ok(t) => t,
        Err(DbError::NotFound(_)) => {
            return Err(CollabError::TemplateNotFound(request.template_id))
        }
        Err(e) => return Err(e.into()),
    };

    let mode = resolve_mode(conn, actor, request.mode, default_location)?;
    let role = if mode.is_private() {
        MemberRole::Organizer
    } else {
        MemberRole::Member
    };

    // Reuse the earliest prior instance with surviving membership evidence.
    let prior = collabs::by_creator_and_template(conn, actor, template.id)?;
    for collab in &prior {
        if memberships::active_for(conn, actor, collab.id)?.is_some() {
            tracing::debug!(
                collab_id = collab.id,
                actor,
                "join no-op: membership already active"
            );
            return Ok(JoinOutcome {
                collab_id: collab.id,
                reactivated: true,
                failed_invites: Vec::new(),
            });
        }
        if memberships::any_exists(conn, actor, collab.id)? {
            memberships::insert(conn, actor, collab.id, role, MemberStatus::Active, &mode, now)?;
            tracing::info!(
                collab_id = collab.id,
                actor,
                mode = mode.as_str(),
                "membership reactivated in prior collaboration"
            );
            return Ok(JoinOutcome {
                collab_id: collab.id,
                reactivated: true,
                failed_invites: Vec::new(),
            });
        }
    }

    // Instantiate from the template, carrying its guidance fields so display
    // needs no second template lookup.
    let kind = template
        .kind
        .as_deref()
        .and_then(TemplateKind::parse)
        .unwrap_or_else(|| TemplateKind::infer(&template.name));

    let collab_id = collabs::insert(
        conn,
        &collabs::NewCollab {
            title: &template.name,
            description: template.display_text.as_deref(),
            kind: kind.as_str(),
            created_by: actor,
            total_phases: template.phases,
            template_id: Some(template.id),
            mode: &mode,
            requirements: template.requirements.as_deref(),
            connection_rules: template.connection_rules.as_deref(),
            internal_reference: template.internal_reference.as_deref(),
            created_at: now,
        },
    )?;

    memberships::insert(conn, actor, collab_id, role, MemberStatus::Active, &mode, now)?;

    let mut failed_invites = Vec::new();
    if mode.is_private() {
        for &invitee in &request.invitees {
            let inserted = memberships::insert(
                conn,
                invitee,
                collab_id,
                MemberRole::Member,
                MemberStatus::Invited,
                &mode,
                now,
            );
            if let Err(e) = inserted {
                tracing::warn!(collab_id, invitee, error = %e, "invite insert failed");
                failed_invites.push(invitee);
            }
        }
    }

    tracing::info!(collab_id, actor, mode = mode.as_str(), "collaboration created");
    Ok(JoinOutcome {
        collab_id,
        reactivated: false,
        failed_invites,
    })
}

/// Leave a collaboration.
///
/// Removes the actor's active membership row outright. With nothing left in
/// the ledger, a later join for the same template creates a brand-new
/// collaboration rather than reusing this one.
pub fn leave(conn: &Connection, actor: ProfileId, collab_id: CollabId) -> Result<()> {
    let membership = memberships::active_for(conn, actor, collab_id)?.ok_or(
        CollabError::NotAParticipant {
            profile_id: actor,
            collab_id,
        },
    )?;

    memberships::delete(conn, membership.id)?;
    tracing::info!(collab_id, actor, "left collaboration");
    Ok(())
}

/// Resolve the caller's join mode into a full participation mode.
fn resolve_mode(
    conn: &Connection,
    actor: ProfileId,
    mode: JoinMode,
    default_location: &str,
) -> Result<ParticipationMode> {
    Ok(match mode {
        JoinMode::Community => ParticipationMode::Community,
        JoinMode::Private => ParticipationMode::Private,
        JoinMode::Local => ParticipationMode::Local {
            location: resolve_location(conn, actor, default_location)?,
        },
    })
}

/// Resolve a local collaboration's location: the actor's profile city when
/// set, otherwise the configured default. The default is one stable string;
/// it feeds a public "near you" grouping and must not vary between calls.
pub fn resolve_location(
    conn: &Connection,
    actor: ProfileId,
    default_location: &str,
) -> Result<String> {
    match profiles::city(conn, actor)? {
        Some(city) => Ok(city),
        None => Ok(default_location.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verso_db::queries::profiles as profile_queries;

    const DEFAULT_LOCATION: &str = "Community Hall";

    fn test_db() -> Connection {
        verso_db::open_memory().expect("open test db")
    }

    fn setup_template(conn: &Connection) -> i64 {
        templates::insert(conn, "Urban Chains", Some("Pass it on"), Some("chain"), Some(5), None)
            .expect("template")
    }

    fn request(template_id: i64, mode: JoinMode) -> JoinRequest {
        JoinRequest {
            template_id,
            mode,
            invitees: Vec::new(),
        }
    }

    #[test]
    fn test_join_unknown_template() {
        let conn = test_db();
        let actor = profile_queries::insert(&conn, "Ada", None, true).expect("profile");
        let result = join(&conn, actor, &request(42, JoinMode::Community), DEFAULT_LOCATION, 100);
        assert!(matches!(result, Err(CollabError::TemplateNotFound(42))));
    }

    #[test]
    fn test_join_creates_collab_from_template() {
        let conn = test_db();
        let actor = profile_queries::insert(&conn, "Ada", None, true).expect("profile");
        let template = setup_template(&conn);

        let outcome = join(&conn, actor, &request(template, JoinMode::Community), DEFAULT_LOCATION, 100)
            .expect("join");
        assert!(!outcome.reactivated);

        let collab = collabs::get(&conn, outcome.collab_id).expect("collab");
        assert_eq!(collab.title, "Urban Chains");
        assert_eq!(collab.description.as_deref(), Some("Pass it on"));
        assert_eq!(collab.kind, "chain");
        assert_eq!(collab.current_phase, 1);
        assert_eq!(collab.total_phases, Some(5));
        assert_eq!(collab.template_id, Some(template));
        assert!(!collab.is_private);

        let membership = memberships::active_for(&conn, actor, outcome.collab_id)
            .expect("query")
            .expect("membership");
        assert_eq!(membership.role, "member");
    }

    #[test]
    fn test_private_join_organizer_with_invites() {
        let conn = test_db();
        let actor = profile_queries::insert(&conn, "Ada", None, true).expect("profile");
        let guest = profile_queries::insert(&conn, "Grace", None, true).expect("profile");
        let template = setup_template(&conn);

        let req = JoinRequest {
            template_id: template,
            mode: JoinMode::Private,
            invitees: vec![guest],
        };
        let outcome = join(&conn, actor, &req, DEFAULT_LOCATION, 100).expect("join");
        assert!(outcome.failed_invites.is_empty());

        let collab = collabs::get(&conn, outcome.collab_id).expect("collab");
        assert!(collab.is_private);
        assert_eq!(collab.participation_mode, "private");

        let membership = memberships::active_for(&conn, actor, outcome.collab_id)
            .expect("query")
            .expect("membership");
        assert_eq!(membership.role, "organizer");

        // Guest got an invited row, not an active one.
        assert!(memberships::active_for(&conn, guest, outcome.collab_id)
            .expect("query")
            .is_none());
        assert!(memberships::any_exists(&conn, guest, outcome.collab_id).expect("query"));
    }

    #[test]
    fn test_invite_failure_is_nonfatal() {
        let conn = test_db();
        let actor = profile_queries::insert(&conn, "Ada", None, true).expect("profile");
        let template = setup_template(&conn);

        // Profile 999 does not exist; the invite insert hits the FK.
        let req = JoinRequest {
            template_id: template,
            mode: JoinMode::Private,
            invitees: vec![999],
        };
        let outcome = join(&conn, actor, &req, DEFAULT_LOCATION, 100).expect("join");

        assert_eq!(outcome.failed_invites, vec![999]);
        // The collaboration and the actor's own membership are durable.
        assert!(memberships::active_for(&conn, actor, outcome.collab_id)
            .expect("query")
            .is_some());
    }

    #[test]
    fn test_local_mode_uses_profile_city() {
        let conn = test_db();
        let actor = profile_queries::insert(&conn, "Ada", Some("Austin"), true).expect("profile");
        let template = setup_template(&conn);

        let outcome = join(&conn, actor, &request(template, JoinMode::Local), DEFAULT_LOCATION, 100)
            .expect("join");
        let collab = collabs::get(&conn, outcome.collab_id).expect("collab");
        assert_eq!(collab.location.as_deref(), Some("Austin"));
        assert!(!collab.is_private);
    }

    #[test]
    fn test_local_mode_falls_back_to_default() {
        let conn = test_db();
        let actor = profile_queries::insert(&conn, "Ada", None, true).expect("profile");
        let template = setup_template(&conn);

        let outcome = join(&conn, actor, &request(template, JoinMode::Local), DEFAULT_LOCATION, 100)
            .expect("join");
        let collab = collabs::get(&conn, outcome.collab_id).expect("collab");
        assert_eq!(collab.location.as_deref(), Some(DEFAULT_LOCATION));
    }

    #[test]
    fn test_double_join_does_not_duplicate() {
        let conn = test_db();
        let actor = profile_queries::insert(&conn, "Ada", None, true).expect("profile");
        let template = setup_template(&conn);

        let first = join(&conn, actor, &request(template, JoinMode::Community), DEFAULT_LOCATION, 100)
            .expect("first join");
        let second = join(&conn, actor, &request(template, JoinMode::Community), DEFAULT_LOCATION, 200)
            .expect("second join");

        assert_eq!(first.collab_id, second.collab_id);
        assert!(second.reactivated);
        assert_eq!(
            collabs::by_creator_and_template(&conn, actor, template)
                .expect("query")
                .len(),
            1
        );
        // Still exactly one active membership.
        assert_eq!(memberships::active_for_profile(&conn, actor).expect("query").len(), 1);
    }

    #[test]
    fn test_rejoin_after_leave_creates_fresh_collab() {
        let conn = test_db();
        let actor = profile_queries::insert(&conn, "Ada", None, true).expect("profile");
        let template = setup_template(&conn);

        let first = join(&conn, actor, &request(template, JoinMode::Community), DEFAULT_LOCATION, 100)
            .expect("join");
        leave(&conn, actor, first.collab_id).expect("leave");

        // Hard delete removed all membership evidence, so the rejoin
        // instantiates a new collaboration.
        let second = join(&conn, actor, &request(template, JoinMode::Community), DEFAULT_LOCATION, 200)
            .expect("rejoin");
        assert!(!second.reactivated);
        assert_ne!(first.collab_id, second.collab_id);
    }

    #[test]
    fn test_surviving_row_reactivates_prior_collab() {
        let conn = test_db();
        let actor = profile_queries::insert(&conn, "Ada", None, true).expect("profile");
        let template = setup_template(&conn);

        let first = join(&conn, actor, &request(template, JoinMode::Community), DEFAULT_LOCATION, 100)
            .expect("join");

        // Simulate legacy data: the active row is gone but an invited row
        // for the creator survives.
        let active = memberships::active_for(&conn, actor, first.collab_id)
            .expect("query")
            .expect("membership");
        memberships::delete(&conn, active.id).expect("delete");
        memberships::insert(
            &conn,
            actor,
            first.collab_id,
            MemberRole::Member,
            MemberStatus::Invited,
            &ParticipationMode::Community,
            150,
        )
        .expect("insert");

        let second = join(&conn, actor, &request(template, JoinMode::Community), DEFAULT_LOCATION, 200)
            .expect("rejoin");
        assert!(second.reactivated);
        assert_eq!(second.collab_id, first.collab_id);
        assert!(memberships::active_for(&conn, actor, first.collab_id)
            .expect("query")
            .is_some());
    }

    #[test]
    fn test_leave_not_a_participant() {
        let conn = test_db();
        let actor = profile_queries::insert(&conn, "Ada", None, true).expect("profile");
        let other = profile_queries::insert(&conn, "Grace", None, true).expect("profile");
        let template = setup_template(&conn);

        let outcome = join(&conn, actor, &request(template, JoinMode::Community), DEFAULT_LOCATION, 100)
            .expect("join");

        let result = leave(&conn, other, outcome.collab_id);
        assert!(matches!(result, Err(CollabError::NotAParticipant { .. })));
    }

    #[test]
    fn test_join_mode_parse() {
        assert_eq!(JoinMode::parse("community"), Some(JoinMode::Community));
        assert_eq!(JoinMode::parse("local"), Some(JoinMode::Local));
        assert_eq!(JoinMode::parse("private"), Some(JoinMode::Private));
        assert_eq!(JoinMode::parse("secret"), None);
    }
}
