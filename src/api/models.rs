use serde::Serialize;

use crate::domain::models::{Player, RecencyWindow, SetNode};
use crate::identity;
use crate::reconcile::types::{PairRecord, PairState, RankingEntry};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterResponse {
    pub players: Vec<Player>,
    pub count: usize,
}

/// One cell of the head-to-head matrix. The state field keeps loading,
/// ready and failed pairs distinguishable in the payload.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixCell {
    pub subject_id: String,
    pub opponent_id: String,
    #[serde(flatten)]
    pub state: PairState,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixResponse {
    pub window: RecencyWindow,
    pub cells: Vec<MatrixCell>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingsResponse {
    pub window: RecencyWindow,
    pub entries: Vec<RankingEntry>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareResponse {
    pub subject: Player,
    pub opponent: Player,
    pub window: RecencyWindow,
    pub record: PairRecord,
    pub opponent_record: PairRecord,
    pub recent_sets: Vec<SetSummary>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query: String,
    pub players: Vec<Player>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub player: Player,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    pub wins: u32,
    pub losses: u32,
    pub total: u32,
    pub win_rate: f64,
    pub first_completed_at: Option<String>,
    pub last_completed_at: Option<String>,
    pub recent_sets: Vec<SetSummary>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetSummary {
    pub id: String,
    pub completed_at: Option<String>,
    pub display_score: Option<String>,
    pub round: Option<String>,
    pub tournament: Option<String>,
    /// From the viewer's side; None when the set was indeterminate
    pub won: Option<bool>,
}

impl SetSummary {
    pub fn from_set(set: &SetNode, viewer: Option<&Player>) -> Self {
        let won = viewer.and_then(|player| {
            let entrant = identity::find_player_slot(set, player)?.entrant.as_ref()?;
            let winner = set.winner_id.as_ref()?;
            Some(entrant.id == *winner)
        });

        Self {
            id: set.id.to_string(),
            completed_at: set
                .completed_at_utc()
                .map(|d| d.format("%Y-%m-%d").to_string()),
            display_score: set.display_score.clone(),
            round: set.full_round_text.clone(),
            tournament: set
                .event
                .as_ref()
                .and_then(|e| e.tournament.as_ref())
                .map(|t| t.name.clone()),
            won,
        }
    }
}
