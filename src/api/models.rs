use serde::Serialize;

use crate::domain::{Boat, Event, LeaderboardRow};

#[derive(Serialize)]
pub struct ParticipantsResponse {
    pub status: &'static str,
    pub count: usize,
    pub participants: Vec<Boat>,
}

#[derive(Serialize)]
pub struct EventsResponse {
    pub status: &'static str,
    pub count: usize,
    pub events: Vec<Event>,
}

#[derive(Serialize)]
pub struct LeaderboardResponse {
    pub status: &'static str,
    pub leaderboard: Vec<LeaderboardRow>,
}

#[derive(Serialize)]
pub struct HookedResponse {
    pub status: &'static str,
    pub count: usize,
    pub hooked: Vec<Event>,
}
