//! Player registry with per-player game statistics.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::GameError;

/// A registered player and their record.
///
/// Draws count as games played without a win, so `wins` alone says
/// nothing about losses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Player {
    name: String,
    games_played: u32,
    wins: u32,
}

impl Player {
    /// Creates a player with no games recorded.
    #[instrument]
    pub fn new(name: String) -> Self {
        Self::with_stats(name, 0, 0)
    }

    /// Creates a player with an existing record.
    pub fn with_stats(name: String, games_played: u32, wins: u32) -> Self {
        Self {
            name,
            games_played,
            wins,
        }
    }

    pub(crate) fn record_game(&mut self, won: bool) {
        self.games_played += 1;
        if won {
            self.wins += 1;
        }
    }
}

/// Registered players in registration order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerLedger {
    players: Vec<Player>,
}

impl PlayerLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Checks if no players are registered.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Iterates players in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    /// Gets a player by name.
    pub fn get(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.name == name)
    }

    /// Checks if a player with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registers a new player with an empty record.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidName`] or [`GameError::PlayerExists`].
    #[instrument(skip(self))]
    pub fn register(&mut self, name: &str) -> Result<&Player, GameError> {
        self.insert(Player::new(name.to_string()))?;
        info!(name, total = self.players.len(), "Player registered");
        Ok(&self.players[self.players.len() - 1])
    }

    /// Appends a player with an existing record.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidName`] if the name is empty or holds
    /// whitespace, [`GameError::PlayerExists`] if it is taken.
    #[instrument(skip(self, player), fields(name = %player.name))]
    pub fn insert(&mut self, player: Player) -> Result<(), GameError> {
        if player.name.is_empty() || player.name.chars().any(char::is_whitespace) {
            warn!("Name rejected");
            return Err(GameError::InvalidName(player.name));
        }
        if self.contains(&player.name) {
            warn!("Duplicate player name");
            return Err(GameError::PlayerExists(player.name));
        }
        self.players.push(player);
        Ok(())
    }

    /// Removes a player, keeping the order of the others.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownPlayer`] if no such player exists.
    #[instrument(skip(self))]
    pub fn remove(&mut self, name: &str) -> Result<Player, GameError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| GameError::UnknownPlayer(name.to_string()))?;
        let player = self.players.remove(idx);
        info!(name, remaining = self.players.len(), "Player removed");
        Ok(player)
    }

    /// Players sorted by name, ascending.
    #[instrument(skip(self))]
    pub fn sorted(&self) -> Vec<&Player> {
        let mut players: Vec<&Player> = self.players.iter().collect();
        players.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(count = players.len(), "Players sorted");
        players
    }
}
