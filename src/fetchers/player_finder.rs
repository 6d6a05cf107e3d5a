use anyhow::{Result, anyhow};
use log::{info, warn};
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;

use crate::api::StartGgClient;
use crate::domain::models::Player;

const RECENT_TOURNAMENTS_FETCH: usize = 10;
const RECENT_TOURNAMENTS_TO_SCAN: usize = 3;
const ENTRANTS_PER_TOURNAMENT: usize = 20;
const MAX_RESULTS: usize = 10;

/// Resolves a human-entered query to start.gg players
pub struct PlayerFinder {
    client: Arc<StartGgClient>,
    slug_regex: Regex,
}

impl PlayerFinder {
    pub fn new(client: Arc<StartGgClient>) -> Result<Self> {
        let slug_regex = Self::compile_slug_regex()?;

        Ok(Self { client, slug_regex })
    }

    /// Find players matching a query. Queries that look like a profile
    /// slug resolve directly; anything else searches entrants of recently
    /// listed tournaments by gamer tag.
    pub async fn find(&self, query: &str) -> Result<Vec<Player>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        if self.slug_regex.is_match(&query.to_lowercase()) {
            info!("Resolving '{}' as a user slug", query);
            if let Some(player) = self.resolve_slug(query).await? {
                return Ok(vec![player]);
            }
            info!("No user found for slug '{}', falling back to tournament search", query);
        }

        self.search_tournament_entrants(query).await
    }

    /// The single best match for a query
    pub async fn find_one(&self, query: &str) -> Result<Player> {
        self.find(query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No player found for '{}'", query))
    }

    async fn resolve_slug(&self, query: &str) -> Result<Option<Player>> {
        let slug = Self::normalize_slug(query);
        self.client.fetch_user_by_slug(&slug).await
    }

    async fn search_tournament_entrants(&self, query: &str) -> Result<Vec<Player>> {
        let tournaments = self
            .client
            .fetch_recent_tournaments(RECENT_TOURNAMENTS_FETCH)
            .await?;

        let mut results = Vec::new();
        for tournament in tournaments.iter().take(RECENT_TOURNAMENTS_TO_SCAN) {
            match self
                .client
                .fetch_tournament_entrants(&tournament.slug, query, ENTRANTS_PER_TOURNAMENT)
                .await
            {
                Ok(players) => results.extend(players),
                Err(e) => warn!("Entrant search failed for {}: {:?}", tournament.slug, e),
            }
        }

        Self::dedup_by_tag(&mut results);
        results.truncate(MAX_RESULTS);
        info!("Found {} players for '{}'", results.len(), query);
        Ok(results)
    }

    // --- Helper Methods ---

    fn compile_slug_regex() -> Result<Regex> {
        // Profile slugs are 8-character hex codes, optionally written
        // with their "user/" prefix
        Regex::new(r"^(user/)?[0-9a-f]{8}$").map_err(Into::into)
    }

    fn normalize_slug(query: &str) -> String {
        if query.starts_with("user/") {
            query.to_string()
        } else {
            format!("user/{}", query)
        }
    }

    fn dedup_by_tag(players: &mut Vec<Player>) {
        let mut seen = HashSet::new();
        players.retain(|player| seen.insert(player.gamer_tag.to_lowercase()));
    }
}
