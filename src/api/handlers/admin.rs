use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use super::AppState;

/// Kick off a full refresh in the background and return immediately.
pub async fn trigger_refresh(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    tokio::spawn(async move {
        log::info!("Triggered refresh started for {}", state.tournament);
        match state.engine.refresh_all(&state.tournament).await {
            Ok(counts) => log::info!(
                "Triggered refresh completed: {} participants, {} events, {} leaderboard rows",
                counts.participants,
                counts.events,
                counts.leaderboard
            ),
            Err(e) => log::error!("Triggered refresh failed: {:?}", e),
        }
    });

    (StatusCode::ACCEPTED, "Refresh triggered").into_response()
}
