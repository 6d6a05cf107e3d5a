use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use log::{info, warn};
use tokio::time::sleep;

use crate::api::MatchSource;
use crate::config::settings::ReconcileSettings;
use crate::domain::models::{Player, RecencyWindow};

use super::reconciler::Reconciler;
use super::store::RecordStore;

/// Drives the reconciler across every unordered roster pair in bounded
/// batches, with a delay between batches so an O(n²) fan-out stays under
/// the upstream rate limit.
pub struct PairScheduler<S: MatchSource + 'static> {
    reconciler: Arc<Reconciler<S>>,
    records: RecordStore,
    batch_size: usize,
    batch_delay: Duration,
}

impl<S: MatchSource + 'static> PairScheduler<S> {
    pub fn new(
        reconciler: Arc<Reconciler<S>>,
        records: RecordStore,
        settings: &ReconcileSettings,
    ) -> Self {
        Self {
            reconciler,
            records,
            batch_size: settings.batch_size.max(1),
            batch_delay: Duration::from_millis(settings.batch_delay_ms),
        }
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    /// Reconcile every unordered pair exactly once; both directions of a
    /// pair always land together. Every pair shows as loading the moment
    /// the run starts. Returns once all pairs of this run have settled.
    pub async fn schedule_all(&self, roster: &[Player], window: RecencyWindow) -> Result<()> {
        let pairs = enumerate_pairs(roster);
        let generation = self.records.begin_run();
        if pairs.is_empty() {
            return Ok(());
        }

        for (subject, opponent) in &pairs {
            self.records.mark_loading(&subject.id, &opponent.id, generation);
        }

        info!(
            "Reconciling {} pairs in batches of {} ({})",
            pairs.len(),
            self.batch_size,
            window.label()
        );

        for (batch_index, batch) in pairs.chunks(self.batch_size).enumerate() {
            if batch_index > 0 {
                sleep(self.batch_delay).await;
            }

            let mut handles = Vec::with_capacity(batch.len());
            for (subject, opponent) in batch.iter().cloned() {
                let reconciler = Arc::clone(&self.reconciler);
                let records = self.records.clone();

                handles.push(tokio::spawn(async move {
                    match reconciler.reconcile(&subject, &opponent, window).await {
                        Ok(outcome) => records.complete(
                            &subject.id,
                            &opponent.id,
                            outcome.forward,
                            outcome.reverse,
                            generation,
                        ),
                        Err(e) => {
                            warn!(
                                "Reconciliation failed for {} vs {}: {:?}",
                                subject.gamer_tag, opponent.gamer_tag, e
                            );
                            records.fail(&subject.id, &opponent.id, &e.to_string(), generation);
                        }
                    }
                }));
            }

            for handle in handles {
                handle.await?;
            }
        }

        Ok(())
    }
}

/// All unordered pairs {i, j} with i < j, in roster order
fn enumerate_pairs(roster: &[Player]) -> Vec<(Player, Player)> {
    let mut pairs = Vec::new();

    for i in 0..roster.len() {
        for j in (i + 1)..roster.len() {
            pairs.push((roster[i].clone(), roster[j].clone()));
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::domain::models::{EntrantNode, Id, ParticipantNode, SetNode, SlotNode};
    use crate::reconcile::types::PairState;

    fn player(id: &str, tag: &str) -> Player {
        Player::new(id, tag)
    }

    /// One set between two players; each entrant id is "e<player id>"
    fn versus(set_id: &str, a: &Player, b: &Player, winner: Option<&Player>) -> SetNode {
        let slot = |p: &Player| SlotNode {
            entrant: Some(EntrantNode {
                id: Id::from(format!("e{}", p.id)),
                name: None,
                participants: Some(vec![ParticipantNode {
                    id: Some(p.id.clone()),
                    gamer_tag: Some(p.gamer_tag.clone()),
                    prefix: None,
                    user: None,
                }]),
            }),
        };

        SetNode {
            id: Id::from(set_id),
            winner_id: winner.map(|p| Id::from(format!("e{}", p.id))),
            completed_at: Some(100),
            display_score: None,
            full_round_text: None,
            event: None,
            slots: Some(vec![slot(a), slot(b)]),
        }
    }

    /// Serves every player the same canned history; records each fetch
    struct RecordingSource {
        sets: Vec<SetNode>,
        fail_for: Option<String>,
        fetched: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MatchSource for RecordingSource {
        async fn fetch_recent_sets(&self, player_id: &str, _limit: usize) -> Result<Vec<SetNode>> {
            self.fetched.lock().unwrap().push(player_id.to_string());
            if self.fail_for.as_deref() == Some(player_id) {
                return Err(anyhow!("upstream error for {}", player_id));
            }
            Ok(self.sets.clone())
        }
    }

    fn scheduler(source: RecordingSource) -> (PairScheduler<RecordingSource>, Arc<RecordingSource>) {
        let source = Arc::new(source);
        let settings = ReconcileSettings::default();
        let reconciler = Arc::new(Reconciler::new(Arc::clone(&source), settings.clone()));
        (
            PairScheduler::new(reconciler, RecordStore::new(), &settings),
            source,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_unordered_pair_reconciled_once() {
        let a = player("1", "A");
        let b = player("2", "B");
        let c = player("3", "C");
        let sets = vec![
            versus("ab", &a, &b, Some(&a)),
            versus("ac", &a, &c, Some(&c)),
            versus("bc", &b, &c, Some(&b)),
        ];
        let (scheduler, source) = scheduler(RecordingSource {
            sets,
            fail_for: None,
            fetched: Mutex::new(Vec::new()),
        });

        let roster = vec![a.clone(), b.clone(), c.clone()];
        scheduler.schedule_all(&roster, RecencyWindow::All).await.unwrap();

        // 3 pairs, two fetches each
        assert_eq!(source.fetched.lock().unwrap().len(), 6);

        // Both directions stored for every pair
        let snapshot = scheduler.records().snapshot();
        assert_eq!(snapshot.len(), 6);

        match scheduler.records().get(&a.id, &b.id).unwrap() {
            PairState::Ready { record } => {
                assert_eq!(record.wins, 1);
                assert_eq!(record.losses, 0);
            }
            other => panic!("unexpected state: {:?}", other),
        }
        match scheduler.records().get(&c.id, &a.id).unwrap() {
            PairState::Ready { record } => assert_eq!(record.wins, 1),
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_fetch_fails_only_that_pair() {
        let a = player("1", "A");
        let b = player("2", "B");
        let c = player("3", "C");
        let sets = vec![versus("ab", &a, &b, Some(&a))];
        let (scheduler, _source) = scheduler(RecordingSource {
            sets,
            fail_for: Some("3".to_string()),
            fetched: Mutex::new(Vec::new()),
        });

        let roster = vec![a.clone(), b.clone(), c.clone()];
        scheduler.schedule_all(&roster, RecencyWindow::All).await.unwrap();

        assert!(matches!(
            scheduler.records().get(&a.id, &b.id).unwrap(),
            PairState::Ready { .. }
        ));
        assert!(matches!(
            scheduler.records().get(&a.id, &c.id).unwrap(),
            PairState::Failed { .. }
        ));
        assert!(matches!(
            scheduler.records().get(&c.id, &b.id).unwrap(),
            PairState::Failed { .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_and_single_rosters_schedule_nothing() {
        let (scheduler, source) = scheduler(RecordingSource {
            sets: Vec::new(),
            fail_for: None,
            fetched: Mutex::new(Vec::new()),
        });

        scheduler.schedule_all(&[], RecencyWindow::All).await.unwrap();
        scheduler
            .schedule_all(&[player("1", "A")], RecencyWindow::All)
            .await
            .unwrap();

        assert!(source.fetched.lock().unwrap().is_empty());
        assert!(scheduler.records().snapshot().is_empty());
    }

    #[test]
    fn test_enumerate_pairs_is_i_less_than_j() {
        let roster = vec![player("1", "A"), player("2", "B"), player("3", "C")];
        let pairs = enumerate_pairs(&roster);

        let ids: Vec<(String, String)> = pairs
            .iter()
            .map(|(a, b)| (a.id.to_string(), b.id.to_string()))
            .collect();
        assert_eq!(
            ids,
            vec![
                ("1".to_string(), "2".to_string()),
                ("1".to_string(), "3".to_string()),
                ("2".to_string(), "3".to_string()),
            ]
        );
    }
}
