//! Registry of known players and their pairwise co-occurrence counts.
//!
//! The history is the only mutable state of a seeder. It grows through
//! [`PairingHistory::record_game`] and [`PairingHistory::add_bias`] and is
//! never shrunk or reset; seeding a round only reads it.

use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::hash::Hash;

use crate::error::SeedError;

/// Marker for anything usable as a player identity.
///
/// The crate never creates or destroys players, it only keeps references to
/// identities owned by the caller. Any cheaply clonable, hashable,
/// printable type works: `String`, integers, interned ids...
pub trait PlayerId: Clone + Eq + Hash + Display + Send + Sync {}

impl<T: Clone + Eq + Hash + Display + Send + Sync> PlayerId for T {}

/// How many shared games each pair of registered players is considered to
/// have played, including manual bias adjustments.
///
/// The matrix is symmetric (`count[a][b] == count[b][a]`) and has no self
/// entries. A pristine history (nothing recorded, no bias) changes the
/// seeder's behavior: every seeding is equally good, so no search is run.
#[derive(Debug, Clone)]
pub struct PairingHistory<P: PlayerId> {
    table_size: usize,
    /// Registration order, used to build round pools deterministically.
    players: Vec<P>,
    matrix: HashMap<P, HashMap<P, i32>>,
    has_history: bool,
}

impl<P: PlayerId> PairingHistory<P> {
    /// Creates an empty history for games of `table_size` players.
    pub fn new(table_size: usize) -> Self {
        Self {
            table_size,
            players: Vec::new(),
            matrix: HashMap::new(),
            has_history: false,
        }
    }

    /// Number of players per game.
    pub fn table_size(&self) -> usize {
        self.table_size
    }

    /// All registered players, in registration order.
    pub fn players(&self) -> &[P] {
        &self.players
    }

    /// Whether `player` has been registered.
    pub fn is_registered(&self, player: &P) -> bool {
        self.matrix.contains_key(player)
    }

    /// True once at least one game or bias has been recorded.
    pub fn has_history(&self) -> bool {
        self.has_history
    }

    /// Adds a player with no history.
    ///
    /// Fails with [`SeedError::DuplicatePlayer`] if the player is already
    /// registered.
    pub fn register(&mut self, player: P) -> Result<(), SeedError> {
        if self.is_registered(&player) {
            return Err(SeedError::DuplicatePlayer(player.to_string()));
        }
        self.players.push(player.clone());
        self.matrix.insert(player, HashMap::new());
        Ok(())
    }

    /// Records a finished game: every pair of distinct players in `game`
    /// gains one shared play, in both directions.
    ///
    /// Fails with [`SeedError::InvalidPlayerCount`] if the game does not
    /// have exactly [`table_size`](Self::table_size) players, and with
    /// [`SeedError::UnknownPlayer`] if any member was never registered.
    pub fn record_game(&mut self, game: &HashSet<P>) -> Result<(), SeedError> {
        if game.len() != self.table_size {
            return Err(SeedError::InvalidPlayerCount(format!(
                "recorded game has {} players, expected {}",
                game.len(),
                self.table_size
            )));
        }
        for player in game {
            if !self.is_registered(player) {
                return Err(SeedError::UnknownPlayer(player.to_string()));
            }
        }
        for p in game {
            let row = self.matrix.entry(p.clone()).or_default();
            for q in game {
                if p != q {
                    *row.entry(q.clone()).or_insert(0) += 1;
                }
            }
        }
        self.has_history = true;
        Ok(())
    }

    /// Adds `weight` to both directions of the pair count of `p1`/`p2`.
    ///
    /// A positive weight discourages seeding the two players together (they
    /// are treated as if they had already shared `weight` games); a negative
    /// weight encourages it. Biases count as history: they make fitness
    /// meaningful even before any game is played.
    pub fn add_bias(&mut self, p1: &P, p2: &P, weight: i32) -> Result<(), SeedError> {
        if p1 == p2 {
            return Err(SeedError::SelfPairing(p1.to_string()));
        }
        if weight == 0 {
            return Err(SeedError::ZeroWeight);
        }
        if !self.is_registered(p1) {
            return Err(SeedError::UnknownPlayer(p1.to_string()));
        }
        if !self.is_registered(p2) {
            return Err(SeedError::UnknownPlayer(p2.to_string()));
        }
        for (a, b) in [(p1, p2), (p2, p1)] {
            *self
                .matrix
                .entry(a.clone())
                .or_default()
                .entry(b.clone())
                .or_insert(0) += weight;
        }
        self.has_history = true;
        Ok(())
    }

    /// Current count for a pair, 0 if the two players never met.
    pub fn pair_count(&self, p1: &P, p2: &P) -> i32 {
        self.matrix
            .get(p1)
            .and_then(|row| row.get(p2))
            .copied()
            .unwrap_or(0)
    }
}
