use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{AppState, DataParams};
use crate::api::models::{
    EventsResponse, HookedResponse, LeaderboardResponse, ParticipantsResponse,
};

const DEFAULT_EVENT_LIMIT: usize = 100;

pub async fn get_participants(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DataParams>,
) -> impl IntoResponse {
    let participants = match state
        .engine
        .participants(&state.tournament, params.force())
        .await
    {
        Ok(boats) => boats,
        Err(e) => return refresh_error(e),
    };

    let count = participants.len();
    let offset = params.offset.unwrap_or(0);
    let limit = params.limit.unwrap_or(DEFAULT_EVENT_LIMIT);
    let participants = participants.into_iter().skip(offset).take(limit).collect();

    Json(ParticipantsResponse {
        status: "ok",
        count,
        participants,
    })
    .into_response()
}

pub async fn get_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DataParams>,
) -> impl IntoResponse {
    let events = match state.engine.events(&state.tournament, params.force()).await {
        Ok(events) => events,
        Err(e) => return refresh_error(e),
    };

    let count = events.len();
    let limit = params.limit.unwrap_or(DEFAULT_EVENT_LIMIT);
    let events = events.into_iter().take(limit).collect();

    Json(EventsResponse {
        status: "ok",
        count,
        events,
    })
    .into_response()
}

pub async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DataParams>,
) -> impl IntoResponse {
    match state
        .engine
        .leaderboard(&state.tournament, params.force())
        .await
    {
        Ok(leaderboard) => Json(LeaderboardResponse {
            status: "ok",
            leaderboard,
        })
        .into_response(),
        Err(e) => refresh_error(e),
    }
}

pub async fn get_hooked(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.engine.active_hooks(&state.tournament).await {
        Ok(hooked) => Json(HookedResponse {
            status: "ok",
            count: hooked.len(),
            hooked,
        })
        .into_response(),
        Err(e) => refresh_error(e),
    }
}

pub async fn get_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.engine.status(&state.tournament))
}

/// Serve the stored boat image behind the `image_path` entries the roster
/// and leaderboard emit.
pub async fn get_boat_image(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> impl IntoResponse {
    let Some(path) = state.engine.boat_image(&uid) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/jpeg")], bytes).into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

fn refresh_error(e: anyhow::Error) -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Refresh error: {e}"),
    )
        .into_response()
}
