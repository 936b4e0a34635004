//! # Game Seeder
//!
//! Assigns tournament players to multi-player game tables, round after
//! round, while minimising how often the same two people end up at the
//! same table again.
//!
//! It provides:
//! - A [`GameSeeder`](seeder::GameSeeder) holding the tournament's
//!   [`PairingHistory`](history::PairingHistory)
//! - Two search strategies: a multi-start random walk and an exhaustive
//!   enumeration for small pools (see
//!   [`SeedStrategy`](config::SeedStrategy))
//! - Support for players sitting a round out, players taking two tables in
//!   one round, and manual keep-apart / keep-together biases
//! - An optional [`RoleAssigner`](roles::RoleAssigner) that hands out each
//!   game's fixed roles with as few repeats as possible
//!
//! The crate is a pure in-memory computation: no persistence, no I/O. The
//! surrounding application supplies the roster once, calls
//! [`seed_games`](seeder::GameSeeder::seed_games) once per round, and
//! feeds every realized game back through
//! [`add_played_game`](seeder::GameSeeder::add_played_game) before the
//! next round — the seeder never records its own output.
//!
//! # Usage Example
//!
//! ```
//! use std::collections::HashSet;
//! use game_seeder::prelude::*;
//!
//! fn main() -> Result<(), SeedError> {
//!     let config = SeederConfig::new()
//!         .with_table_size(7)
//!         .with_starts(4)
//!         .with_iterations(500);
//!     let mut seeder = GameSeeder::new(config);
//!
//!     for id in 0..14u32 {
//!         seeder.add_player(id)?;
//!     }
//!     // keep players 0 and 1 apart (e.g. family members)
//!     seeder.add_bias(&0, &1, DEFAULT_BIAS_WEIGHT)?;
//!
//!     // round 1
//!     let seeding = seeder.seed_games(&HashSet::new(), &HashSet::new())?;
//!     assert_eq!(seeding.games.len(), 2);
//!     for game in &seeding.games {
//!         seeder.add_played_game(game)?;
//!     }
//!
//!     // round 2: player 3 sits out, player 4 plays twice
//!     let omitting = HashSet::from([3]);
//!     let doubling = HashSet::from([4]);
//!     let seeding = seeder.seed_games(&omitting, &doubling)?;
//!     assert_eq!(seeding.games.len(), 2);
//!     Ok(())
//! }
//! ```
//!
//! # Picking a strategy
//!
//! The random strategy draws a valid seeding at random and walks it
//! through random player swaps, keeping the best seeding it passes
//! through. Swaps are applied even when they make things worse; the walk
//! explores instead of climbing, and several independent `starts` make up
//! for it. This scales to any pool size.
//!
//! The exhaustive strategy tries every possible seeding and returns a true
//! optimum. Cost is combinatorial: two tables of 7 mean a few thousand
//! candidates, three tables mean hundreds of millions. The configured
//! pool limit refuses anything bigger.
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod fitness;
pub mod history;
mod partition;
pub mod roles;
mod search;
pub mod seeder;

/// Commonly used types for quick access.
///
/// ```rust
/// use game_seeder::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{SeedStrategy, SeederConfig};
    pub use crate::error::SeedError;
    pub use crate::history::{PairingHistory, PlayerId};
    pub use crate::roles::{RoleAssigner, RoleAssignment, RoleId};
    pub use crate::seeder::{GameSeeder, Seeding, DEFAULT_BIAS_WEIGHT};
}
