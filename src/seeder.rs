//! The public seeding surface: register players, record history, seed one
//! round at a time.

use std::borrow::Cow;
use std::collections::HashSet;

use itertools::Itertools;
use tracing::{debug, info};

use crate::config::{SeedStrategy, SeederConfig};
use crate::error::SeedError;
use crate::fitness::slot_seeding_fitness;
use crate::history::{PairingHistory, PlayerId};
use crate::partition::{for_each_partition, slot_pool, Slot};
use crate::search::run_trials;

/// Bias weight strong enough to dominate any single round's pair
/// contribution, for callers who want two players kept apart (family
/// members, rematch grudges). Pass it to
/// [`GameSeeder::add_bias`].
pub const DEFAULT_BIAS_WEIGHT: i32 = 25;

/// Temporary weight applied between every pair of doubled players for the
/// duration of one seeding call, so two players each playing two games do
/// not end up sharing both of them.
const DOUBLER_SEPARATION_WEIGHT: i32 = 10;

/// One round's seeding together with the search diagnostics.
#[derive(Debug, Clone)]
pub struct Seeding<P: PlayerId> {
    /// The tables, each a set of exactly `table_size` distinct players. A
    /// doubled player appears in exactly two tables, an omitted player in
    /// none, everyone else in exactly one.
    pub games: Vec<HashSet<P>>,
    /// Fitness of the returned seeding; 0 means no repeat pairings.
    pub fitness: i64,
    /// Number of candidate seedings examined.
    pub candidates: usize,
    /// Strategy that produced the result. Differs from the configured one
    /// when a pristine history made searching pointless.
    pub strategy: SeedStrategy,
}

/// Assigns tournament players to games so that they meet as few previous
/// tablemates as possible.
///
/// The seeder owns the [`PairingHistory`] for one tournament. Seeding a
/// round never mutates it: callers must feed the realized games back
/// through [`add_played_game`](Self::add_played_game) before seeding the
/// next round, or that round will not be taken into account.
pub struct GameSeeder<P: PlayerId> {
    config: SeederConfig,
    history: PairingHistory<P>,
}

impl<P: PlayerId> GameSeeder<P> {
    /// Creates a seeder with an empty history.
    pub fn new(config: SeederConfig) -> Self {
        let history = PairingHistory::new(config.table_size);
        Self { config, history }
    }

    /// Registers a player with no history. See [`PairingHistory::register`].
    pub fn add_player(&mut self, player: P) -> Result<(), SeedError> {
        self.history.register(player)
    }

    /// Records a finished game. See [`PairingHistory::record_game`].
    pub fn add_played_game(&mut self, game: &HashSet<P>) -> Result<(), SeedError> {
        self.history.record_game(game)
    }

    /// Biases a pair of players for or against sharing future tables. See
    /// [`PairingHistory::add_bias`]; [`DEFAULT_BIAS_WEIGHT`] is a good
    /// keep-apart weight.
    pub fn add_bias(&mut self, p1: &P, p2: &P, weight: i32) -> Result<(), SeedError> {
        self.history.add_bias(p1, p2, weight)
    }

    /// Read access to the accumulated history.
    pub fn history(&self) -> &PairingHistory<P> {
        &self.history
    }

    /// Seeds one round.
    ///
    /// The eligible pool is every registered player, plus one extra slot
    /// per player in `doubling_up` (assigned to two games this round),
    /// minus the players in `omitting` (sitting this round out). The pool
    /// size must be a positive multiple of the table size.
    ///
    /// Errors with [`SeedError::UnknownPlayer`] for unregistered names in
    /// either set, [`SeedError::InvalidPlayerCount`] for a bad pool size,
    /// and [`SeedError::Unsolvable`] when no valid assignment exists (or
    /// none was found within the attempt budget).
    pub fn seed_games(
        &self,
        omitting: &HashSet<P>,
        doubling_up: &HashSet<P>,
    ) -> Result<Seeding<P>, SeedError> {
        let pool_players = self.player_pool(omitting, doubling_up)?;
        let k = self.config.table_size;
        let composition = format!(
            "{} registered plus {} duplicated minus {} omitted",
            self.history.players().len(),
            doubling_up.len(),
            omitting.len()
        );
        if pool_players.is_empty() || pool_players.len() % k != 0 {
            return Err(SeedError::InvalidPlayerCount(format!(
                "{composition} leaves {} players, which is not a positive multiple of {k}",
                pool_players.len()
            )));
        }
        // a doubled player needs two different tables to sit at
        if !doubling_up.is_empty() && pool_players.len() < 2 * k {
            return Err(SeedError::Unsolvable(format!(
                "{composition} leaves a single table, but some players play twice"
            )));
        }
        let pool = slot_pool(&pool_players);

        // With several doubled players, bias them apart for this call only.
        // The bias goes onto a cloned overlay: seeding must never mutate
        // the shared history.
        let separate_doublers = doubling_up.len() > 1;
        let working: Cow<'_, PairingHistory<P>> = if separate_doublers {
            let mut overlay = self.history.clone();
            for (a, b) in doubling_up.iter().tuple_combinations() {
                overlay.add_bias(a, b, DOUBLER_SEPARATION_WEIGHT)?;
            }
            Cow::Owned(overlay)
        } else {
            Cow::Borrowed(&self.history)
        };

        // With nothing on record every seeding is equally good: one random
        // draw suffices, regardless of the configured strategy.
        if !working.has_history() {
            debug!("pristine history, taking the first random seeding");
            let trial = run_trials(&pool, &working, &self.config, 1, 0, false)?;
            return Ok(self.finish(trial.tables, trial.fitness, 1, SeedStrategy::Random));
        }

        match self.config.strategy {
            SeedStrategy::Random => {
                let trial = run_trials(
                    &pool,
                    &working,
                    &self.config,
                    self.config.starts,
                    self.config.iterations,
                    separate_doublers,
                )?;
                info!(
                    starts = self.config.starts,
                    iterations = self.config.iterations,
                    fitness = trial.fitness,
                    "random seeding finished"
                );
                Ok(self.finish(
                    trial.tables,
                    trial.fitness,
                    self.config.starts,
                    SeedStrategy::Random,
                ))
            }
            SeedStrategy::Exhaustive => {
                if pool.len() > self.config.exhaustive_pool_limit {
                    return Err(SeedError::PoolTooLarge {
                        size: pool.len(),
                        limit: self.config.exhaustive_pool_limit,
                    });
                }
                let mut best: Option<(Vec<Vec<Slot<P>>>, i64)> = None;
                let candidates = for_each_partition(&pool, k, &mut |tables| {
                    let fitness = slot_seeding_fitness(tables, &working, separate_doublers);
                    if best.as_ref().map_or(true, |(_, b)| fitness < *b) {
                        best = Some((tables.to_vec(), fitness));
                    }
                })?;
                let (tables, fitness) = best.ok_or_else(|| {
                    SeedError::Unsolvable("enumeration produced no seeding".into())
                })?;
                info!(candidates, fitness, "exhaustive seeding finished");
                Ok(self.finish(tables, fitness, candidates, SeedStrategy::Exhaustive))
            }
        }
    }

    /// Strips slot tags and packages the result.
    fn finish(
        &self,
        tables: Vec<Vec<Slot<P>>>,
        fitness: i64,
        candidates: usize,
        strategy: SeedStrategy,
    ) -> Seeding<P> {
        let games = tables
            .into_iter()
            .map(|table| table.into_iter().map(|s| s.player).collect())
            .collect();
        Seeding {
            games,
            fitness,
            candidates,
            strategy,
        }
    }

    /// Builds the round's pool in registration order: one slot per playing
    /// player, a second one per doubled player. A player both doubled and
    /// omitted contributes exactly one slot.
    fn player_pool(
        &self,
        omitting: &HashSet<P>,
        doubling_up: &HashSet<P>,
    ) -> Result<Vec<P>, SeedError> {
        for p in doubling_up.iter().chain(omitting) {
            if !self.history.is_registered(p) {
                return Err(SeedError::UnknownPlayer(p.to_string()));
            }
        }
        let mut pool = Vec::with_capacity(self.history.players().len() + doubling_up.len());
        for p in self.history.players() {
            if doubling_up.contains(p) {
                pool.push(p.clone());
            }
            if !omitting.contains(p) {
                pool.push(p.clone());
            }
        }
        Ok(pool)
    }
}
