use anyhow::Result;
use colored::Colorize;
use log::info;
use std::sync::Arc;

use crate::api::StartGgClient;
use crate::api::models::SetSummary;
use crate::config::settings::AppConfig;
use crate::domain::models::{Player, RecencyWindow};
use crate::fetchers::PlayerFinder;
use crate::reconcile::{Reconciler, Reconciliation};

pub struct CompareService {
    finder: PlayerFinder,
    reconciler: Reconciler<StartGgClient>,
}

impl CompareService {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Arc::new(StartGgClient::new(&config.api)?);

        Ok(Self {
            finder: PlayerFinder::new(Arc::clone(&client))?,
            reconciler: Reconciler::new(client, config.reconcile),
        })
    }

    pub async fn run(&self, first: &str, second: &str, window: RecencyWindow) -> Result<()> {
        info!("Resolving players...");
        let subject = self.finder.find_one(first).await?;
        let opponent = self.finder.find_one(second).await?;

        info!(
            "Reconciling {} vs {} ({})",
            subject.gamer_tag,
            opponent.gamer_tag,
            window.label()
        );
        let outcome = self.reconciler.reconcile(&subject, &opponent, window).await?;

        self.print_record(&subject, &opponent, window, &outcome);
        Ok(())
    }

    fn print_record(
        &self,
        subject: &Player,
        opponent: &Player,
        window: RecencyWindow,
        outcome: &Reconciliation,
    ) {
        let record = &outcome.forward;

        println!();
        println!(
            "{} vs {} ({})",
            subject.display_name().bold(),
            opponent.display_name().bold(),
            window.label()
        );
        println!(
            "  {} wins / {} losses over {} sets",
            record.wins.to_string().green(),
            record.losses.to_string().red(),
            record.total
        );
        println!("  win rate: {}", Self::paint_win_rate(record.win_rate));

        if outcome.shared_sets.is_empty() {
            println!("  no shared sets in this window");
            return;
        }

        println!();
        println!("Recent matchups:");
        for set in &outcome.shared_sets {
            let summary = SetSummary::from_set(set, Some(subject));
            let verdict = match summary.won {
                Some(true) => "W".green(),
                Some(false) => "L".red(),
                None => "-".dimmed(),
            };
            println!(
                "  {} {} {} {}",
                verdict,
                summary.completed_at.as_deref().unwrap_or("unknown date"),
                summary.display_score.as_deref().unwrap_or("(no score)"),
                summary.tournament.as_deref().unwrap_or("")
            );
        }
    }

    fn paint_win_rate(win_rate: f64) -> colored::ColoredString {
        let text = format!("{:.1}%", win_rate);
        if win_rate >= 50.0 {
            text.green()
        } else {
            text.red()
        }
    }
}
