use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Roster entry for a participating boat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boat {
    pub uid: String,
    pub boat: String,
    #[serde(rename = "type", default)]
    pub boat_type: String,
    pub image_path: String,
}

/// Classification of a feed event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "Hooked Up")]
    HookedUp,
    Released,
    Boated,
    #[serde(rename = "Pulled Hook")]
    PulledHook,
    #[serde(rename = "Wrong Species")]
    WrongSpecies,
    Other,
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::HookedUp => "Hooked Up",
            EventKind::Released => "Released",
            EventKind::Boated => "Boated",
            EventKind::PulledHook => "Pulled Hook",
            EventKind::WrongSpecies => "Wrong Species",
            EventKind::Other => "Other",
        }
    }
}

/// Single activity-feed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: NaiveDateTime,
    #[serde(rename = "event")]
    pub kind: EventKind,
    pub boat: String,
    pub uid: String,
    pub details: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub hookup_id: Option<String>,
}

impl Event {
    /// Dedup key: no two stored events may share this triple.
    pub fn dedup_key(&self) -> (String, EventKind, NaiveDateTime) {
        (self.uid.clone(), self.kind, self.timestamp)
    }

    /// Whether this event closes an open hook.
    pub fn is_resolution(&self) -> bool {
        match self.kind {
            EventKind::Boated | EventKind::Released => true,
            EventKind::PulledHook | EventKind::WrongSpecies => true,
            _ => {
                let details = self.details.to_lowercase();
                details.contains("pulled hook") || details.contains("wrong species")
            }
        }
    }
}

/// Ranked leaderboard entry within a category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub rank: u32,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub angler: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub boat: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub boat_type: Option<String>,
    pub points: String,
    pub points_num: f64,
    pub uid: String,
    pub image_path: String,
}

impl LeaderboardRow {
    /// Display name used as the stable tie-break within a category.
    pub fn display_name(&self) -> &str {
        self.boat
            .as_deref()
            .or(self.angler.as_deref())
            .unwrap_or("")
    }
}

/// Per-dataset result of a full refresh
#[derive(Debug, Clone, Default, Serialize)]
pub struct RefreshCounts {
    pub participants: usize,
    pub events: usize,
    pub leaderboard: usize,
}

/// Per-tournament page URLs from the remote registry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TournamentPages {
    #[serde(default)]
    pub participants: Option<String>,
    #[serde(default)]
    pub events: Option<String>,
    #[serde(default)]
    pub leaderboard: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
}
