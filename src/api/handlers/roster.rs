use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use crate::api::models::RosterResponse;
use crate::domain::models::{Id, Player};

use super::AppState;

pub async fn get_roster(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let players = state.roster.players();

    Json(RosterResponse {
        count: players.len(),
        players,
    })
}

/// Add a player chosen from the search results and re-reconcile
pub async fn add_player(
    State(state): State<Arc<AppState>>,
    Json(player): Json<Player>,
) -> impl IntoResponse {
    match state.roster.add(player) {
        Ok(true) => {
            state.spawn_refresh();
            StatusCode::CREATED.into_response()
        }
        Ok(false) => (StatusCode::CONFLICT, "Player is already on the roster").into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Storage error: {}", e),
        )
            .into_response(),
    }
}

pub async fn remove_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let id = Id::from(id);

    match state.roster.remove(&id) {
        Ok(Some(_)) => {
            state.scheduler.records().remove_player(&id);
            state.spawn_refresh();
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Storage error: {}", e),
        )
            .into_response(),
    }
}
