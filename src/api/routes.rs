use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{
    admin::trigger_refresh,
    data::{get_boat_image, get_events, get_hooked, get_leaderboard, get_participants, get_status},
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/participants", get(get_participants))
        .route("/api/events", get(get_events))
        .route("/api/leaderboard", get(get_leaderboard))
        .route("/api/hooked", get(get_hooked))
        .route("/api/status", get(get_status))
        .route("/api/refresh", post(trigger_refresh))
        .route("/boat-image/:uid", get(get_boat_image))
        .with_state(state)
}
