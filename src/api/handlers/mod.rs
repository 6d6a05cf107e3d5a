use std::sync::{Arc, Mutex};

use serde::Deserialize;

use crate::api::StartGgClient;
use crate::config::settings::AppConfig;
use crate::domain::models::RecencyWindow;
use crate::fetchers::PlayerFinder;
use crate::reconcile::{PairScheduler, Reconciler};
use crate::roster::RosterStore;

pub mod players;
pub mod records;
pub mod roster;

pub struct AppState {
    pub config: AppConfig,
    pub client: Arc<StartGgClient>,
    pub roster: Arc<RosterStore>,
    pub reconciler: Arc<Reconciler<StartGgClient>>,
    pub scheduler: Arc<PairScheduler<StartGgClient>>,
    pub finder: Arc<PlayerFinder>,
    window: Mutex<RecencyWindow>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        client: Arc<StartGgClient>,
        roster: Arc<RosterStore>,
        reconciler: Arc<Reconciler<StartGgClient>>,
        scheduler: Arc<PairScheduler<StartGgClient>>,
        finder: Arc<PlayerFinder>,
    ) -> Self {
        Self {
            config,
            client,
            roster,
            reconciler,
            scheduler,
            finder,
            window: Mutex::new(RecencyWindow::default()),
        }
    }

    pub fn current_window(&self) -> RecencyWindow {
        *self.window.lock().unwrap()
    }

    pub fn set_window(&self, window: RecencyWindow) {
        *self.window.lock().unwrap() = window;
    }

    /// Kick off a scheduling run for the current roster in the background
    pub fn spawn_refresh(self: &Arc<Self>) {
        let state = Arc::clone(self);
        tokio::spawn(async move {
            let roster = state.roster.players();
            let window = state.current_window();
            if let Err(e) = state.scheduler.schedule_all(&roster, window).await {
                log::error!("Scheduling run failed: {:?}", e);
            }
        });
    }
}

#[derive(Deserialize)]
pub struct WindowParams {
    pub window: Option<RecencyWindow>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
}

#[derive(Deserialize)]
pub struct SummaryParams {
    pub limit: Option<usize>,
}
