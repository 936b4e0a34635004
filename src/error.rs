//! Error type shared by the whole crate.

use thiserror::Error;

/// Everything that can go wrong while registering players, recording games
/// or seeding a round.
///
/// All variants are raised synchronously at the point of the offending call
/// and carry enough context to correct the round configuration without
/// inspecting crate internals.
#[derive(Debug, Error)]
pub enum SeedError {
    /// A player was registered twice.
    #[error("player {0} is already registered")]
    DuplicatePlayer(String),

    /// A game, bias, omission or doubling-up referenced a player that was
    /// never registered.
    #[error("player {0} was never registered")]
    UnknownPlayer(String),

    /// A recorded game did not have exactly one player per seat, or the
    /// eligible pool for a round is empty or not a multiple of the table
    /// size. The message carries the offending counts.
    #[error("invalid player count: {0}")]
    InvalidPlayerCount(String),

    /// A bias between a player and themselves is meaningless.
    #[error("cannot bias player {0} against themselves")]
    SelfPairing(String),

    /// A bias with a weight of zero is meaningless.
    #[error("a bias weight of zero has no effect")]
    ZeroWeight,

    /// No valid seeding exists for the eligible pool, or none was found
    /// within the configured attempt budget.
    #[error("no valid seeding exists: {0}")]
    Unsolvable(String),

    /// The eligible pool is too large for exhaustive enumeration.
    #[error("pool of {size} players exceeds the exhaustive limit of {limit}")]
    PoolTooLarge {
        /// Size of the eligible pool that was rejected.
        size: usize,
        /// Configured enumeration limit.
        limit: usize,
    },

    /// A role appeared more than once in a recorded role assignment.
    #[error("role {0} appears more than once")]
    DuplicateRole(String),
}
