use anyhow::Result;
use log::info;
use std::sync::Mutex;

use crate::cache::Cache;
use crate::domain::models::{Id, Player};

/// Storage key the roster persists under, so it survives restarts
pub const ROSTER_STORAGE_KEY: &str = "power_rankings_roster";

/// Owns the user-curated roster and its persistence: every mutation is
/// written through, and the stored key is removed when the roster empties.
/// Derived state (pair records, rankings) is never persisted.
pub struct RosterStore {
    cache: Cache,
    players: Mutex<Vec<Player>>,
}

impl RosterStore {
    /// Load the persisted roster, or start empty
    pub fn open(cache: Cache) -> Result<Self> {
        let players: Vec<Player> = cache.load(ROSTER_STORAGE_KEY)?.unwrap_or_default();
        if !players.is_empty() {
            info!("Loaded {} roster players", players.len());
        }

        Ok(Self {
            cache,
            players: Mutex::new(players),
        })
    }

    pub fn players(&self) -> Vec<Player> {
        self.players.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.players.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &Id) -> Option<Player> {
        self.players
            .lock()
            .unwrap()
            .iter()
            .find(|player| player.id == *id)
            .cloned()
    }

    /// Add a player; duplicates (by id) are rejected. Returns whether the
    /// roster changed.
    pub fn add(&self, player: Player) -> Result<bool> {
        let mut players = self.players.lock().unwrap();
        if players.iter().any(|existing| existing.id == player.id) {
            return Ok(false);
        }

        info!("Adding {} to the roster", player.gamer_tag);
        players.push(player);
        self.persist(&players)?;
        Ok(true)
    }

    pub fn remove(&self, id: &Id) -> Result<Option<Player>> {
        let mut players = self.players.lock().unwrap();
        let position = players.iter().position(|player| player.id == *id);

        match position {
            Some(index) => {
                let removed = players.remove(index);
                info!("Removed {} from the roster", removed.gamer_tag);
                self.persist(&players)?;
                Ok(Some(removed))
            }
            None => Ok(None),
        }
    }

    pub fn clear(&self) -> Result<()> {
        let mut players = self.players.lock().unwrap();
        players.clear();
        self.cache.remove(ROSTER_STORAGE_KEY)
    }

    fn persist(&self, players: &[Player]) -> Result<()> {
        if players.is_empty() {
            self.cache.remove(ROSTER_STORAGE_KEY)
        } else {
            self.cache.save(ROSTER_STORAGE_KEY, &players)
        }
    }
}
