//! Collaboration and membership structures.

use serde::{Deserialize, Serialize};

use crate::{CollabId, TemplateId};

/// How participants join a collaboration.
///
/// `Local` carries the resolved location so that privacy (and everything
/// else mode-dependent) is derived from the variant rather than kept in a
/// separate flag that could drift out of sync.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ParticipationMode {
    /// Open to the whole community.
    Community,
    /// Geographically scoped.
    Local { location: String },
    /// Invite-only.
    Private,
}

impl ParticipationMode {
    /// Stable string form used in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipationMode::Community => "community",
            ParticipationMode::Local { .. } => "local",
            ParticipationMode::Private => "private",
        }
    }

    /// Privacy is strictly derived from the mode; there is no separate
    /// caller-controlled flag.
    pub fn is_private(&self) -> bool {
        matches!(self, ParticipationMode::Private)
    }

    /// The location for local collaborations, if any.
    pub fn location(&self) -> Option<&str> {
        match self {
            ParticipationMode::Local { location } => Some(location),
            _ => None,
        }
    }

    /// Reassemble from the database columns. Unknown or absent mode strings
    /// default to community.
    pub fn from_columns(mode: Option<&str>, location: Option<String>) -> Self {
        match mode {
            Some("private") => ParticipationMode::Private,
            Some("local") => ParticipationMode::Local {
                location: location.unwrap_or_default(),
            },
            _ => ParticipationMode::Community,
        }
    }
}

/// Role of a member within a collaboration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Member,
    Organizer,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Member => "member",
            MemberRole::Organizer => "organizer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "member" => Some(MemberRole::Member),
            "organizer" => Some(MemberRole::Organizer),
            _ => None,
        }
    }
}

/// Status of a membership row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    Active,
    Invited,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "active",
            MemberStatus::Invited => "invited",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(MemberStatus::Active),
            "invited" => Some(MemberStatus::Invited),
            _ => None,
        }
    }
}

/// A participant entry in a membership listing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub role: MemberRole,
}

/// One of the caller's collaborations, as shown in membership listings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MembershipView {
    pub collab_id: CollabId,
    pub title: String,
    pub description: Option<String>,
    pub template_id: Option<TemplateId>,
    pub mode: ParticipationMode,
    pub role: MemberRole,
    pub current_phase: u32,
    pub total_phases: Option<u32>,
    /// Live participant count for community/local collaborations.
    pub participant_count: u32,
    /// Private rosters are not exposed; for private collaborations this
    /// holds only the caller.
    pub participants: Vec<Participant>,
}

/// The caller's active memberships bucketed by participation mode.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MembershipGroups {
    pub private: Vec<MembershipView>,
    pub community: Vec<MembershipView>,
    pub local: Vec<MembershipView>,
}

impl MembershipGroups {
    pub fn is_empty(&self) -> bool {
        self.private.is_empty() && self.community.is_empty() && self.local.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_privacy_derivation() {
        assert!(!ParticipationMode::Community.is_private());
        assert!(!ParticipationMode::Local {
            location: "Austin".to_string()
        }
        .is_private());
        assert!(ParticipationMode::Private.is_private());
    }

    #[test]
    fn test_mode_from_columns_default_community() {
        let mode = ParticipationMode::from_columns(None, None);
        assert_eq!(mode, ParticipationMode::Community);
        let mode = ParticipationMode::from_columns(Some("weird"), None);
        assert_eq!(mode, ParticipationMode::Community);
    }

    #[test]
    fn test_mode_from_columns_local() {
        let mode = ParticipationMode::from_columns(Some("local"), Some("Austin".to_string()));
        assert_eq!(mode.location(), Some("Austin"));
        assert_eq!(mode.as_str(), "local");
    }

    #[test]
    fn test_role_status_roundtrip() {
        assert_eq!(MemberRole::parse("organizer"), Some(MemberRole::Organizer));
        assert_eq!(MemberStatus::parse("invited"), Some(MemberStatus::Invited));
        assert_eq!(MemberRole::parse("host"), None);
    }
}
