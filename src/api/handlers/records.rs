use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use crate::api::models::{CompareResponse, MatrixCell, MatrixResponse, RankingsResponse, SetSummary};
use crate::domain::models::Id;
use crate::reconcile;

use super::{AppState, WindowParams};

/// Set the recency window and start a scheduling run; the matrix and
/// rankings endpoints pick up the results as pairs settle
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WindowParams>,
) -> impl IntoResponse {
    if let Some(window) = params.window {
        state.set_window(window);
    }
    state.spawn_refresh();

    (StatusCode::ACCEPTED, "Refresh triggered").into_response()
}

pub async fn get_matrix(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut cells: Vec<MatrixCell> = state
        .scheduler
        .records()
        .snapshot()
        .into_iter()
        .map(|(key, pair_state)| MatrixCell {
            subject_id: key.subject.to_string(),
            opponent_id: key.opponent.to_string(),
            state: pair_state,
        })
        .collect();

    cells.sort_by(|a, b| {
        (a.subject_id.as_str(), a.opponent_id.as_str())
            .cmp(&(b.subject_id.as_str(), b.opponent_id.as_str()))
    });

    Json(MatrixResponse {
        window: state.current_window(),
        cells,
    })
}

pub async fn get_rankings(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let roster = state.roster.players();
    let records = state.scheduler.records().snapshot();
    let entries = reconcile::rank(&roster, &records, state.config.reconcile.win_rate_epsilon);

    Json(RankingsResponse {
        window: state.current_window(),
        entries,
    })
}

/// Reconcile two roster members directly, bypassing the stored matrix
pub async fn get_comparison(
    State(state): State<Arc<AppState>>,
    Path((subject_id, opponent_id)): Path<(String, String)>,
    Query(params): Query<WindowParams>,
) -> impl IntoResponse {
    let Some(subject) = state.roster.get(&Id::from(subject_id.clone())) else {
        return (
            StatusCode::NOT_FOUND,
            format!("Player {} is not on the roster", subject_id),
        )
            .into_response();
    };
    let Some(opponent) = state.roster.get(&Id::from(opponent_id.clone())) else {
        return (
            StatusCode::NOT_FOUND,
            format!("Player {} is not on the roster", opponent_id),
        )
            .into_response();
    };

    let window = params.window.unwrap_or_else(|| state.current_window());

    match state.reconciler.reconcile(&subject, &opponent, window).await {
        Ok(outcome) => {
            let recent_sets = outcome
                .shared_sets
                .iter()
                .map(|set| SetSummary::from_set(set, Some(&subject)))
                .collect();

            Json(CompareResponse {
                record: outcome.forward,
                opponent_record: outcome.reverse,
                recent_sets,
                subject,
                opponent,
                window,
            })
            .into_response()
        }
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            format!("Reconciliation failed: {}", e),
        )
            .into_response(),
    }
}
