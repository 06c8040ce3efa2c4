//! Period structures.
//!
//! A period is a bounded time window (a season/year issue cycle) gating
//! which content and templates are live. Periods are created and activated
//! by admin tooling; this core only reads them.

use serde::{Deserialize, Serialize};

use crate::PeriodId;

/// A seasonal period.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Period {
    pub id: PeriodId,
    pub name: String,
    pub season: Season,
    pub year: u16,
    /// Unix epoch seconds.
    pub start_date: u64,
    /// Unix epoch seconds.
    pub end_date: u64,
    pub is_active: bool,
}

/// Season of a period.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Stable string form used in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }

    /// Parse the database string form. Unknown values map to `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "spring" => Some(Season::Spring),
            "summer" => Some(Season::Summer),
            "autumn" => Some(Season::Autumn),
            "winter" => Some(Season::Winter),
            _ => None,
        }
    }
}
