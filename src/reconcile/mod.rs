pub mod ranking;
pub mod reconciler;
pub mod scheduler;
pub mod store;
pub mod types;

pub use ranking::rank;
pub use reconciler::{Reconciler, Reconciliation, tally_record};
pub use scheduler::PairScheduler;
pub use store::RecordStore;
pub use types::{PairKey, PairRecord, PairState, RankingEntry};
