//! Config for the seeder behaviors.
//!
//! A [`SeederConfig`] is created programmatically with
//! [`SeederConfig::new()`] and adjusted through chained `with_*` calls:
//!
//! ```
//! use game_seeder::prelude::*;
//!
//! let config = SeederConfig::new()
//!     .with_table_size(7)
//!     .with_starts(8)
//!     .with_iterations(2000)
//!     .with_parallel(true);
//! ```

/// Algorithm used to find a round's seeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedStrategy {
    /// Improve a number of random seedings by random swaps and keep the
    /// best one seen. Fast, not guaranteed optimal.
    Random,
    /// Try every possible seeding and keep the true minimum. Only
    /// practical for small pools; guarded by
    /// [`SeederConfig::with_exhaustive_pool_limit`].
    Exhaustive,
}

/// Configuration for a [`GameSeeder`](crate::seeder::GameSeeder).
#[derive(Debug, Clone)]
pub struct SeederConfig {
    pub(crate) table_size: usize,
    pub(crate) strategy: SeedStrategy,
    pub(crate) starts: usize,
    pub(crate) iterations: usize,
    pub(crate) parallel: bool,
    pub(crate) max_assignment_attempts: usize,
    pub(crate) exhaustive_pool_limit: usize,
    pub(crate) rng_seed: Option<u64>,
}

impl SeederConfig {
    /// Creates a configuration with default parameters.
    ///
    /// By default:
    /// - Games seat 7 players.
    /// - The random strategy is used, with 1 starting seeding improved for
    ///   1000 iterations, on the calling thread.
    /// - Random construction gives up after 1000 failed attempts.
    /// - Exhaustive enumeration refuses pools above 21 slots.
    /// - Randomness is drawn from the OS.
    pub fn new() -> Self {
        Self {
            table_size: 7,
            strategy: SeedStrategy::Random,
            starts: 1,
            iterations: 1000,
            parallel: false,
            max_assignment_attempts: 1000,
            exhaustive_pool_limit: 21,
            rng_seed: None,
        }
    }

    /// Sets the number of players per game.
    ///
    /// # Panics
    ///
    /// Panics if `value` is below 2; a game needs at least two players.
    pub fn with_table_size(mut self, value: usize) -> Self {
        assert!(value >= 2, "a game needs at least two players");
        self.table_size = value;
        self
    }

    /// Selects the seeding strategy.
    pub fn with_strategy(mut self, value: SeedStrategy) -> Self {
        self.strategy = value;
        self
    }

    /// Sets the number of independent random seedings to improve. More
    /// starts compensate for the random walk's lack of greediness. Ignored
    /// by the exhaustive strategy; values below 1 are treated as 1.
    pub fn with_starts(mut self, value: usize) -> Self {
        self.starts = value.max(1);
        self
    }

    /// Sets the number of random swaps tried per start. More iterations
    /// give better seedings but take longer. Ignored by the exhaustive
    /// strategy.
    pub fn with_iterations(mut self, value: usize) -> Self {
        self.iterations = value;
        self
    }

    /// Runs the independent random starts on a rayon thread pool instead of
    /// the calling thread.
    pub fn with_parallel(mut self, value: bool) -> Self {
        self.parallel = value;
        self
    }

    /// Bounds how often a failed random table assignment is redrawn before
    /// the round is declared unsolvable.
    pub fn with_max_assignment_attempts(mut self, value: usize) -> Self {
        self.max_assignment_attempts = value.max(1);
        self
    }

    /// Bounds the pool size accepted by the exhaustive strategy. The
    /// enumeration cost grows combinatorially; three tables worth of
    /// players is already slow.
    pub fn with_exhaustive_pool_limit(mut self, value: usize) -> Self {
        self.exhaustive_pool_limit = value;
        self
    }

    /// Seeds the random number generator, making `seed_games` reproducible.
    /// Each random start derives its own deterministic stream, so serial
    /// and parallel runs agree.
    pub fn with_rng_seed(mut self, value: u64) -> Self {
        self.rng_seed = Some(value);
        self
    }
}

impl Default for SeederConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SeederConfig::new();
        assert_eq!(config.table_size, 7);
        assert_eq!(config.strategy, SeedStrategy::Random);
        assert_eq!(config.starts, 1);
        assert_eq!(config.iterations, 1000);
        assert!(!config.parallel);
        assert_eq!(config.rng_seed, None);
    }

    #[test]
    fn builder_chains() {
        let config = SeederConfig::new()
            .with_table_size(4)
            .with_strategy(SeedStrategy::Exhaustive)
            .with_starts(0)
            .with_iterations(50)
            .with_rng_seed(42);
        assert_eq!(config.table_size, 4);
        assert_eq!(config.strategy, SeedStrategy::Exhaustive);
        assert_eq!(config.starts, 1, "starts below 1 are clamped");
        assert_eq!(config.iterations, 50);
        assert_eq!(config.rng_seed, Some(42));
    }

    #[test]
    #[should_panic(expected = "at least two players")]
    fn table_size_below_two_panics() {
        let _ = SeederConfig::new().with_table_size(1);
    }
}
