use std::cmp::Ordering;
use std::collections::HashMap;

use crate::domain::models::Player;

use super::types::{PairKey, PairRecord, PairState, RankingEntry};

/// Rank a roster by its settled pair records.
///
/// Each player's wins and losses are summed over their ready records;
/// loading and failed pairs contribute nothing. Win rates within
/// `epsilon` count as a tie and fall back to total win count, and fully
/// tied players keep roster order.
pub fn rank(
    roster: &[Player],
    records: &HashMap<PairKey, PairState>,
    epsilon: f64,
) -> Vec<RankingEntry> {
    let mut entries: Vec<RankingEntry> = roster
        .iter()
        .map(|player| build_entry(player, roster, records))
        .collect();

    entries.sort_by(|a, b| compare_entries(a, b, epsilon));

    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = index + 1;
    }

    entries
}

fn build_entry(
    player: &Player,
    roster: &[Player],
    records: &HashMap<PairKey, PairState>,
) -> RankingEntry {
    let mut wins = 0;
    let mut losses = 0;

    for opponent in roster {
        if opponent.id == player.id {
            continue;
        }

        let key = PairKey::new(player.id.clone(), opponent.id.clone());
        if let Some(PairState::Ready { record }) = records.get(&key) {
            wins += record.wins;
            losses += record.losses;
        }
    }

    let record = PairRecord::from_tally(wins, losses);

    RankingEntry {
        player: player.clone(),
        wins,
        losses,
        total: record.total,
        win_rate: record.win_rate,
        rank: 0,
    }
}

fn compare_entries(a: &RankingEntry, b: &RankingEntry, epsilon: f64) -> Ordering {
    if (a.win_rate - b.win_rate).abs() < epsilon {
        b.wins.cmp(&a.wins)
    } else {
        b.win_rate.partial_cmp(&a.win_rate).unwrap_or(Ordering::Equal)
    }
}
