//! Curator selection structures.

use serde::{Deserialize, Serialize};

use crate::{CollabId, CommunicationId, ProfileId, SponsorId};

/// A curator's full selection set for one period.
///
/// Creators, sponsors, and collaborations are per-item sets; communications
/// are a single opt-in flag because they are not individually selectable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionSet {
    pub creator_ids: Vec<ProfileId>,
    pub sponsor_ids: Vec<SponsorId>,
    pub collab_ids: Vec<CollabId>,
    pub include_communications: bool,
}

/// The selection categories persisted independently of one another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionCategory {
    Creators,
    Sponsors,
    Collabs,
    Communications,
}

impl SelectionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionCategory::Creators => "creators",
            SelectionCategory::Sponsors => "sponsors",
            SelectionCategory::Collabs => "collabs",
            SelectionCategory::Communications => "communications",
        }
    }
}

/// Which pool the random-sampling selection mode draws from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RandomPool {
    Collabs,
    Communications,
}

/// Published work by one creator for a period, tags de-duplicated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreatorGroup {
    pub creator_id: ProfileId,
    pub creator_name: Option<String>,
    pub titles: Vec<String>,
    pub tags: Vec<String>,
}

/// An active sponsor campaign for a period.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SponsorView {
    pub sponsor_id: SponsorId,
    pub name: String,
    pub blurb: Option<String>,
}

/// A community/local collaboration the curator could still select.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AvailableCollabView {
    pub collab_id: CollabId,
    pub title: String,
    pub mode: String,
    pub location: Option<String>,
    pub participant_count: u32,
}

/// A communication addressed to the curator for a period.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommunicationView {
    pub communication_id: CommunicationId,
    pub sender_id: ProfileId,
    pub subject: String,
    pub body: Option<String>,
    pub sent_at: u64,
}
