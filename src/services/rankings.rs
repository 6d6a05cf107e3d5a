use anyhow::Result;
use colored::Colorize;
use log::info;
use std::sync::Arc;

use crate::api::StartGgClient;
use crate::cache::Cache;
use crate::config::MIN_ROSTER_FOR_RANKINGS;
use crate::config::settings::AppConfig;
use crate::domain::models::RecencyWindow;
use crate::reconcile::{self, PairScheduler, PairState, RankingEntry, Reconciler, RecordStore};
use crate::roster::RosterStore;

pub struct RankingsService {
    config: AppConfig,
    roster: RosterStore,
    scheduler: PairScheduler<StartGgClient>,
}

impl RankingsService {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Arc::new(StartGgClient::new(&config.api)?);
        let reconciler = Arc::new(Reconciler::new(
            Arc::clone(&client),
            config.reconcile.clone(),
        ));
        let scheduler = PairScheduler::new(reconciler, RecordStore::new(), &config.reconcile);
        let roster = RosterStore::open(Cache::new("cache")?)?;

        Ok(Self {
            config,
            roster,
            scheduler,
        })
    }

    pub async fn run(&self, window: RecencyWindow) -> Result<()> {
        let players = self.roster.players();
        if players.len() < MIN_ROSTER_FOR_RANKINGS {
            anyhow::bail!(
                "Need at least {} roster players for rankings; add some with `roster add`",
                MIN_ROSTER_FOR_RANKINGS
            );
        }

        info!("Computing rankings for {} players", players.len());
        self.scheduler.schedule_all(&players, window).await?;

        let records = self.scheduler.records().snapshot();
        let failed_pairs = records
            .values()
            .filter(|state| matches!(state, PairState::Failed { .. }))
            .count()
            / 2;

        let entries = reconcile::rank(&players, &records, self.config.reconcile.win_rate_epsilon);
        self.print_table(&entries, window);

        if failed_pairs > 0 {
            println!(
                "{}",
                format!("{} pair(s) failed to reconcile and are not counted", failed_pairs)
                    .yellow()
            );
        }

        Ok(())
    }

    fn print_table(&self, entries: &[RankingEntry], window: RecencyWindow) {
        println!();
        println!("Power rankings ({})", window.label());
        println!("{:<5} {:<24} {:>7} {:>9}", "rank", "player", "w-l", "rate");

        for entry in entries {
            let record = format!("{}-{}", entry.wins, entry.losses);
            let win_rate = format!("{:.1}%", entry.win_rate);
            let win_rate = if entry.win_rate >= 50.0 {
                win_rate.green()
            } else {
                win_rate.red()
            };

            println!(
                "{:<5} {:<24} {:>7} {:>9}",
                format!("#{}", entry.rank),
                entry.player.display_name(),
                record,
                win_rate
            );
        }
    }
}
