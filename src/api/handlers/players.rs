use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use crate::api::models::{PlayerSummary, SearchResponse, SetSummary};
use crate::api::startgg_client::PlayerOverview;
use crate::reconcile;

use super::{AppState, SearchParams, SummaryParams};

const RECENT_SETS_SHOWN: usize = 5;

pub async fn search_players(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    match state.finder.find(&params.q).await {
        Ok(players) => Json(SearchResponse {
            query: params.q,
            players,
        })
        .into_response(),
        Err(e) => (StatusCode::BAD_GATEWAY, format!("Search failed: {}", e)).into_response(),
    }
}

/// Recent win/loss summary for one player, independent of the roster
pub async fn get_player_summary(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<String>,
    Query(params): Query<SummaryParams>,
) -> impl IntoResponse {
    let settings = &state.config.reconcile;
    let limit = params
        .limit
        .unwrap_or(settings.summary_fetch_cap)
        .clamp(1, settings.match_fetch_cap);

    match state.client.fetch_player_overview(&player_id, limit).await {
        Ok(overview) => Json(build_summary(overview)).into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            format!("Failed to fetch player {}: {}", player_id, e),
        )
            .into_response(),
    }
}

fn build_summary(overview: PlayerOverview) -> PlayerSummary {
    let player = overview.player;
    let record = reconcile::tally_record(&overview.sets, &player);

    let mut first: Option<i64> = None;
    let mut last: Option<i64> = None;
    for set in &overview.sets {
        if let Some(timestamp) = set.completed_at {
            first = Some(first.map_or(timestamp, |f| f.min(timestamp)));
            last = Some(last.map_or(timestamp, |l| l.max(timestamp)));
        }
    }

    let recent_sets = overview
        .sets
        .iter()
        .take(RECENT_SETS_SHOWN)
        .map(|set| SetSummary::from_set(set, Some(&player)))
        .collect();

    PlayerSummary {
        profile_url: player
            .user_slug
            .as_ref()
            .map(|slug| format!("https://www.start.gg/{}", slug)),
        wins: record.wins,
        losses: record.losses,
        total: record.total,
        win_rate: record.win_rate,
        first_completed_at: format_date(first),
        last_completed_at: format_date(last),
        recent_sets,
        player,
    }
}

fn format_date(timestamp: Option<i64>) -> Option<String> {
    timestamp
        .and_then(|t| chrono::DateTime::from_timestamp(t, 0))
        .map(|d| d.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{EntrantNode, Id, ParticipantNode, Player, SetNode, SlotNode};

    fn set_for(player: &Player, set_id: &str, won: bool, completed_at: Option<i64>) -> SetNode {
        let own_entrant = format!("e-{}", set_id);
        let other_entrant = format!("x-{}", set_id);
        let winner = if won { &own_entrant } else { &other_entrant };

        SetNode {
            id: Id::from(set_id),
            winner_id: Some(Id::from(winner.as_str())),
            completed_at,
            display_score: None,
            full_round_text: None,
            event: None,
            slots: Some(vec![
                SlotNode {
                    entrant: Some(EntrantNode {
                        id: Id::from(own_entrant.as_str()),
                        name: None,
                        participants: Some(vec![ParticipantNode {
                            id: Some(player.id.clone()),
                            gamer_tag: Some(player.gamer_tag.clone()),
                            prefix: None,
                            user: None,
                        }]),
                    }),
                },
                SlotNode {
                    entrant: Some(EntrantNode {
                        id: Id::from(other_entrant.as_str()),
                        name: None,
                        participants: Some(vec![ParticipantNode {
                            id: Some(Id::from("999")),
                            gamer_tag: Some("Opponent".to_string()),
                            prefix: None,
                            user: None,
                        }]),
                    }),
                },
            ]),
        }
    }

    #[test]
    fn test_summary_tallies_and_date_range() {
        let player = Player::new("7", "iBDW");
        let sets = vec![
            set_for(&player, "s1", true, Some(1_700_000_000)),
            set_for(&player, "s2", false, Some(1_690_000_000)),
            set_for(&player, "s3", true, Some(1_710_000_000)),
        ];

        let summary = build_summary(PlayerOverview {
            player: player.clone(),
            sets,
        });

        assert_eq!(summary.wins, 2);
        assert_eq!(summary.losses, 1);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.first_completed_at.as_deref(), Some("2023-07-22"));
        assert_eq!(summary.last_completed_at.as_deref(), Some("2024-03-09"));
        assert_eq!(summary.recent_sets.len(), 3);
        assert_eq!(summary.recent_sets[0].won, Some(true));
    }

    #[test]
    fn test_summary_without_slug_has_no_profile_url() {
        let player = Player::new("7", "iBDW");
        let summary = build_summary(PlayerOverview {
            player,
            sets: Vec::new(),
        });

        assert!(summary.profile_url.is_none());
        assert_eq!(summary.total, 0);
        assert_eq!(summary.win_rate, 0.0);
        assert!(summary.first_completed_at.is_none());
    }
}
