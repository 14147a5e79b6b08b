use serde::Deserialize;

use crate::services::engine::TournamentEngine;

pub mod admin;
pub mod data;

pub struct AppState {
    pub engine: TournamentEngine,
    pub tournament: String,
}

#[derive(Deserialize)]
pub struct DataParams {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    /// Set to "1" to bypass the freshness gate.
    pub force: Option<String>,
}

impl DataParams {
    pub fn force(&self) -> bool {
        self.force.as_deref() == Some("1")
    }
}
