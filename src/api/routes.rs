use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;

use crate::api::handlers::{
    AppState,
    players::{get_player_summary, search_players},
    records::{get_comparison, get_matrix, get_rankings, refresh},
    roster::{add_player, get_roster, remove_player},
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/roster", get(get_roster).post(add_player))
        .route("/api/roster/:id", delete(remove_player))
        .route("/api/refresh", post(refresh))
        .route("/api/matrix", get(get_matrix))
        .route("/api/rankings", get(get_rankings))
        .route("/api/compare/:subject_id/:opponent_id", get(get_comparison))
        .route("/api/players/search", get(search_players))
        .route("/api/player/:id/summary", get(get_player_summary))
        .with_state(state)
}
