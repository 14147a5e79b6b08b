pub mod models;

pub use models::{Boat, Event, EventKind, LeaderboardRow, RefreshCounts, TournamentPages};
