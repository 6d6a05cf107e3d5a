use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use log::debug;

use crate::api::MatchSource;
use crate::config::settings::ReconcileSettings;
use crate::domain::models::{Player, RecencyWindow, SetNode};
use crate::identity;

use super::types::PairRecord;

/// Outcome of one reconciliation: the subject-side record, its mirror,
/// and the windowed shared sets the tally was computed from
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub forward: PairRecord,
    pub reverse: PairRecord,
    pub shared_sets: Vec<SetNode>,
}

/// Merges two players' independently fetched match histories into a
/// single symmetric head-to-head record.
///
/// Each player's history endpoint paginates and sorts on its own, so the
/// same set may show up in one fetch and not the other; the merge
/// recovers it and the dedup keeps it counted once.
pub struct Reconciler<S: MatchSource> {
    source: Arc<S>,
    settings: ReconcileSettings,
}

impl<S: MatchSource> Reconciler<S> {
    pub fn new(source: Arc<S>, settings: ReconcileSettings) -> Self {
        Self { source, settings }
    }

    pub async fn reconcile(
        &self,
        subject: &Player,
        opponent: &Player,
        window: RecencyWindow,
    ) -> Result<Reconciliation> {
        let cap = self.settings.match_fetch_cap;

        // The two fetches race freely; dedup is by set id, so their
        // completion order cannot change the merged result.
        let (subject_sets, opponent_sets) = tokio::try_join!(
            self.source.fetch_recent_sets(subject.id.as_str(), cap),
            self.source.fetch_recent_sets(opponent.id.as_str(), cap),
        )?;

        let merged = merge_dedup(subject_sets, opponent_sets);
        debug!(
            "{} vs {}: {} unique sets after merge",
            subject.gamer_tag,
            opponent.gamer_tag,
            merged.len()
        );

        let shared = shared_sets(merged, subject, opponent, window);
        let forward = tally_record(&shared, subject);
        debug!(
            "{} vs {}: {}-{} over {} shared sets",
            subject.gamer_tag, opponent.gamer_tag, forward.wins, forward.losses, forward.total
        );

        Ok(Reconciliation {
            reverse: forward.mirrored(),
            forward,
            shared_sets: shared,
        })
    }
}

/// Combine both fetches, keeping the first occurrence of each set id
fn merge_dedup(first: Vec<SetNode>, second: Vec<SetNode>) -> Vec<SetNode> {
    let mut seen = HashSet::new();
    let mut merged = Vec::with_capacity(first.len() + second.len());

    for set in first.into_iter().chain(second) {
        if seen.insert(set.id.clone()) {
            merged.push(set);
        }
    }

    merged
}

/// Sets involving both players, most recent first, truncated to the
/// window. Sets without a completion timestamp stay in the pool but sort
/// after every dated set, keeping their fetched order among themselves.
fn shared_sets(
    merged: Vec<SetNode>,
    subject: &Player,
    opponent: &Player,
    window: RecencyWindow,
) -> Vec<SetNode> {
    let mut shared: Vec<SetNode> = merged
        .into_iter()
        .filter(|set| identity::set_involves(set, subject) && identity::set_involves(set, opponent))
        .collect();

    shared.sort_by_key(|set| match set.completed_at {
        Some(timestamp) => (0, -timestamp),
        None => (1, 0),
    });

    if let Some(max_sets) = window.max_sets() {
        shared.truncate(max_sets);
    }

    shared
}

/// Count wins and losses from the subject's side. A set whose winner id
/// or whose subject entrant cannot be resolved contributes nothing;
/// indeterminate sets are excluded, not counted as losses.
pub fn tally_record(sets: &[SetNode], subject: &Player) -> PairRecord {
    let mut wins = 0;
    let mut losses = 0;

    for set in sets {
        let entrant_id = identity::find_player_slot(set, subject)
            .and_then(|slot| slot.entrant.as_ref())
            .map(|entrant| &entrant.id);

        match (entrant_id, set.winner_id.as_ref()) {
            (Some(entrant), Some(winner)) if entrant == winner => wins += 1,
            (Some(_), Some(_)) => losses += 1,
            _ => {}
        }
    }

    PairRecord::from_tally(wins, losses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::collections::HashMap;

    use crate::domain::models::{EntrantNode, Id, ParticipantNode, SlotNode};

    fn player(id: &str, tag: &str) -> Player {
        Player::new(id, tag)
    }

    fn set(
        id: &str,
        winner: Option<&str>,
        completed_at: Option<i64>,
        left: (&str, &str, &str),
        right: (&str, &str, &str),
    ) -> SetNode {
        let slot = |(entrant_id, participant_id, tag): (&str, &str, &str)| SlotNode {
            entrant: Some(EntrantNode {
                id: Id::from(entrant_id),
                name: None,
                participants: Some(vec![ParticipantNode {
                    id: Some(Id::from(participant_id)),
                    gamer_tag: Some(tag.to_string()),
                    prefix: None,
                    user: None,
                }]),
            }),
        };

        SetNode {
            id: Id::from(id),
            winner_id: winner.map(Id::from),
            completed_at,
            display_score: None,
            full_round_text: None,
            event: None,
            slots: Some(vec![slot(left), slot(right)]),
        }
    }

    /// A vs B with A in entrant e1 and B in entrant e2
    fn versus(id: &str, winner: Option<&str>, completed_at: Option<i64>) -> SetNode {
        set(
            id,
            winner,
            completed_at,
            ("e1", "1", "PlayerA"),
            ("e2", "2", "PlayerB"),
        )
    }

    struct StubSource {
        by_player: HashMap<String, Vec<SetNode>>,
    }

    impl StubSource {
        fn new(histories: Vec<(&str, Vec<SetNode>)>) -> Self {
            Self {
                by_player: histories
                    .into_iter()
                    .map(|(id, sets)| (id.to_string(), sets))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl MatchSource for StubSource {
        async fn fetch_recent_sets(&self, player_id: &str, _limit: usize) -> Result<Vec<SetNode>> {
            self.by_player
                .get(player_id)
                .cloned()
                .ok_or_else(|| anyhow!("no history for player {}", player_id))
        }
    }

    fn reconciler(histories: Vec<(&str, Vec<SetNode>)>) -> Reconciler<StubSource> {
        Reconciler::new(
            Arc::new(StubSource::new(histories)),
            ReconcileSettings::default(),
        )
    }

    #[test]
    fn test_merge_counts_overlapping_set_once() {
        let merged = merge_dedup(
            vec![versus("s1", Some("e1"), Some(100))],
            vec![versus("s1", Some("e1"), Some(100)), versus("s2", Some("e2"), Some(90))],
        );
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_shared_sets_require_both_players() {
        let a = player("1", "PlayerA");
        let b = player("2", "PlayerB");
        let merged = vec![
            versus("s1", Some("e1"), Some(100)),
            // A against someone else entirely
            set("s2", Some("e1"), Some(99), ("e1", "1", "PlayerA"), ("e9", "9", "Bystander")),
        ];

        let shared = shared_sets(merged, &a, &b, RecencyWindow::All);
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].id, Id::from("s1"));
    }

    #[test]
    fn test_window_keeps_most_recent_sets() {
        let a = player("1", "PlayerA");
        let b = player("2", "PlayerB");
        // Fetched out of order on purpose; recency comes from timestamps
        let merged = vec![
            versus("old", Some("e1"), Some(10)),
            versus("newest", Some("e2"), Some(300)),
            versus("mid", Some("e1"), Some(200)),
        ];

        let shared = shared_sets(merged, &a, &b, RecencyWindow::All);
        let ids: Vec<&str> = shared.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["newest", "mid", "old"]);
    }

    #[test]
    fn test_windowing_boundary() {
        let a = player("1", "PlayerA");
        let b = player("2", "PlayerB");
        let history: Vec<SetNode> = (0..15)
            .map(|i| versus(&format!("s{}", i), Some("e1"), Some(1000 - i64::from(i))))
            .collect();

        let windowed = shared_sets(history.clone(), &a, &b, RecencyWindow::Short);
        assert_eq!(windowed.len(), 10);
        // The 10 most recent survive
        assert!(windowed.iter().all(|s| s.completed_at.unwrap() > 990));

        let unbounded = shared_sets(history, &a, &b, RecencyWindow::All);
        assert_eq!(unbounded.len(), 15);
    }

    #[test]
    fn test_undated_sets_sort_after_dated_ones() {
        let a = player("1", "PlayerA");
        let b = player("2", "PlayerB");
        let merged = vec![
            versus("undated", Some("e1"), None),
            versus("dated", Some("e2"), Some(50)),
        ];

        let shared = shared_sets(merged, &a, &b, RecencyWindow::All);
        assert_eq!(shared[0].id, Id::from("dated"));
        assert_eq!(shared[1].id, Id::from("undated"));
    }

    #[test]
    fn test_tally_excludes_indeterminate_sets() {
        let a = player("1", "PlayerA");
        let sets = vec![
            versus("s1", Some("e1"), Some(100)),
            versus("s2", Some("e2"), Some(90)),
            versus("s3", None, Some(80)),
        ];

        let record = tally_record(&sets, &a);
        assert_eq!(record.wins, 1);
        assert_eq!(record.losses, 1);
        assert_eq!(record.total, 2);
        assert_eq!(record.win_rate, 50.0);
    }

    #[test]
    fn test_tally_is_idempotent() {
        let a = player("1", "PlayerA");
        let sets = vec![
            versus("s1", Some("e1"), Some(100)),
            versus("s2", Some("e2"), Some(90)),
        ];

        assert_eq!(tally_record(&sets, &a), tally_record(&sets, &a));
    }

    #[tokio::test]
    async fn test_reconcile_is_symmetric_by_construction() {
        let a = player("1", "PlayerA");
        let b = player("2", "PlayerB");
        let history = vec![
            versus("s1", Some("e1"), Some(100)),
            versus("s2", Some("e1"), Some(90)),
            versus("s3", Some("e2"), Some(80)),
        ];
        let reconciler = reconciler(vec![("1", history.clone()), ("2", history)]);

        let outcome = reconciler.reconcile(&a, &b, RecencyWindow::All).await.unwrap();
        assert_eq!(outcome.forward.wins, 2);
        assert_eq!(outcome.forward.losses, 1);
        assert_eq!(outcome.reverse.wins, outcome.forward.losses);
        assert_eq!(outcome.reverse.losses, outcome.forward.wins);
        assert_eq!(outcome.reverse.total, outcome.forward.total);
    }

    #[tokio::test]
    async fn test_reconcile_merges_sets_missing_from_one_fetch() {
        let a = player("1", "PlayerA");
        let b = player("2", "PlayerB");
        // Each fetch saw a set the other missed, plus one overlap
        let reconciler = reconciler(vec![
            ("1", vec![versus("s1", Some("e1"), Some(100)), versus("s2", Some("e2"), Some(90))]),
            ("2", vec![versus("s2", Some("e2"), Some(90)), versus("s3", Some("e1"), Some(80))]),
        ]);

        let outcome = reconciler.reconcile(&a, &b, RecencyWindow::All).await.unwrap();
        assert_eq!(outcome.forward.total, 3);
        assert_eq!(outcome.forward.wins, 2);
        assert_eq!(outcome.forward.losses, 1);
    }

    #[tokio::test]
    async fn test_reconcile_fails_when_either_fetch_fails() {
        let a = player("1", "PlayerA");
        let b = player("404", "Ghost");
        let reconciler = reconciler(vec![("1", vec![versus("s1", Some("e1"), Some(100))])]);

        assert!(reconciler.reconcile(&a, &b, RecencyWindow::All).await.is_err());
    }
}
