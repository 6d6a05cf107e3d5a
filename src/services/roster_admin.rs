use anyhow::{Result, anyhow};
use colored::Colorize;
use log::warn;
use std::sync::Arc;

use crate::api::StartGgClient;
use crate::cache::Cache;
use crate::config::preset_players;
use crate::config::settings::AppConfig;
use crate::domain::models::Id;
use crate::fetchers::PlayerFinder;
use crate::roster::RosterStore;

/// Roster management for the CLI. The start.gg client is only built for
/// the subcommands that resolve players, so listing and removal work
/// without an API token.
pub struct RosterService {
    config: AppConfig,
    roster: RosterStore,
}

impl RosterService {
    pub fn new(config: AppConfig) -> Result<Self> {
        Ok(Self {
            config,
            roster: RosterStore::open(Cache::new("cache")?)?,
        })
    }

    pub fn show(&self) -> Result<()> {
        let players = self.roster.players();
        if players.is_empty() {
            println!("The roster is empty; add players with `roster add <query>`");
            return Ok(());
        }

        for player in &players {
            println!("{:<12} {}", player.id.to_string(), player.display_name().bold());
        }
        println!("{} player(s)", players.len());
        Ok(())
    }

    pub async fn add(&self, query: &str) -> Result<()> {
        let finder = self.build_finder()?;
        let player = finder
            .find(query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No player found for '{}'", query))?;

        if self.roster.add(player.clone())? {
            println!("Added {} ({})", player.display_name().bold(), player.id);
        } else {
            println!("{} is already on the roster", player.display_name());
        }
        Ok(())
    }

    pub fn remove(&self, id: &str) -> Result<()> {
        match self.roster.remove(&Id::from(id))? {
            Some(player) => println!("Removed {}", player.display_name()),
            None => println!("No roster player with id {}", id),
        }
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.roster.clear()?;
        println!("Roster cleared");
        Ok(())
    }

    /// Seed the roster with the example players
    pub async fn demo(&self) -> Result<()> {
        let finder = self.build_finder()?;

        for preset in preset_players() {
            match finder.find_one(preset.slug).await {
                Ok(player) => {
                    if self.roster.add(player.clone())? {
                        println!("Added {}", player.display_name().bold());
                    }
                }
                Err(e) => warn!("Could not resolve {} ({}): {:?}", preset.name, preset.slug, e),
            }
        }

        println!("Roster now has {} player(s)", self.roster.len());
        Ok(())
    }

    fn build_finder(&self) -> Result<PlayerFinder> {
        let client = Arc::new(StartGgClient::new(&self.config.api)?);
        PlayerFinder::new(client)
    }
}
