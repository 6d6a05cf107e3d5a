use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::debug;

use crate::domain::models::Id;

use super::types::{PairKey, PairRecord, PairState};

/// Shared map of pair states, keyed by ordered (subject, opponent).
///
/// Every write replaces a whole pair state and covers both directions of
/// the pair at once. Writes carry the generation of the scheduling run
/// that produced them; a result arriving after a newer run has started is
/// discarded instead of racing it.
#[derive(Clone, Default)]
pub struct RecordStore {
    inner: Arc<Mutex<StoreInner>>,
}

#[derive(Default)]
struct StoreInner {
    generation: u64,
    records: HashMap<PairKey, PairState>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new scheduling run: prior records are dropped wholesale
    /// and the returned generation gates every write of the run.
    pub fn begin_run(&self) -> u64 {
        let mut inner = self.inner.lock().unwrap();
        inner.generation += 1;
        inner.records.clear();
        inner.generation
    }

    pub fn current_generation(&self) -> u64 {
        self.inner.lock().unwrap().generation
    }

    pub fn mark_loading(&self, subject: &Id, opponent: &Id, generation: u64) {
        self.apply(subject, opponent, PairState::Loading, PairState::Loading, generation);
    }

    pub fn complete(
        &self,
        subject: &Id,
        opponent: &Id,
        forward: PairRecord,
        reverse: PairRecord,
        generation: u64,
    ) {
        self.apply(
            subject,
            opponent,
            PairState::Ready { record: forward },
            PairState::Ready { record: reverse },
            generation,
        );
    }

    pub fn fail(&self, subject: &Id, opponent: &Id, reason: &str, generation: u64) {
        let failed = PairState::Failed {
            reason: reason.to_string(),
        };
        self.apply(subject, opponent, failed.clone(), failed, generation);
    }

    /// Drop every record involving a player
    pub fn remove_player(&self, id: &Id) {
        let mut inner = self.inner.lock().unwrap();
        inner.records.retain(|key, _| !key.involves(id));
    }

    pub fn get(&self, subject: &Id, opponent: &Id) -> Option<PairState> {
        let inner = self.inner.lock().unwrap();
        inner
            .records
            .get(&PairKey::new(subject.clone(), opponent.clone()))
            .cloned()
    }

    pub fn snapshot(&self) -> HashMap<PairKey, PairState> {
        self.inner.lock().unwrap().records.clone()
    }

    fn apply(
        &self,
        subject: &Id,
        opponent: &Id,
        forward: PairState,
        reverse: PairState,
        generation: u64,
    ) {
        let mut inner = self.inner.lock().unwrap();
        if generation != inner.generation {
            debug!(
                "Discarding stale result for {} vs {} (generation {} != {})",
                subject, opponent, generation, inner.generation
            );
            return;
        }

        let key = PairKey::new(subject.clone(), opponent.clone());
        inner.records.insert(key.reversed(), reverse);
        inner.records.insert(key, forward);
    }
}
