use serde::Serialize;

use crate::domain::models::{Id, Player};

/// Win/loss tally between two players, seen from the subject's side
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairRecord {
    pub wins: u32,
    pub losses: u32,
    pub total: u32,
    pub win_rate: f64,
}

impl PairRecord {
    pub fn from_tally(wins: u32, losses: u32) -> Self {
        let total = wins + losses;
        let win_rate = if total > 0 {
            f64::from(wins) / f64::from(total) * 100.0
        } else {
            0.0
        };

        Self {
            wins,
            losses,
            total,
            win_rate,
        }
    }

    /// The same record seen from the opponent's side
    pub fn mirrored(&self) -> Self {
        Self::from_tally(self.losses, self.wins)
    }
}

/// Lifecycle of a scheduled pair. A pair with no shared history settles
/// as a ready zero/zero record; the three states are never conflated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PairState {
    Loading,
    Ready { record: PairRecord },
    Failed { reason: String },
}

/// Ordered (subject, opponent) key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairKey {
    pub subject: Id,
    pub opponent: Id,
}

impl PairKey {
    pub fn new(subject: Id, opponent: Id) -> Self {
        Self { subject, opponent }
    }

    pub fn reversed(&self) -> Self {
        Self {
            subject: self.opponent.clone(),
            opponent: self.subject.clone(),
        }
    }

    pub fn involves(&self, id: &Id) -> bool {
        self.subject == *id || self.opponent == *id
    }
}

/// One row of the power ranking; recomputed in full, never patched
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub player: Player,
    pub wins: u32,
    pub losses: u32,
    pub total: u32,
    pub win_rate: f64,
    pub rank: usize,
}
