//! Assigns the fixed roles of a game (seats, starting positions, powers in
//! the source domain) to the players of a seeded table, minimising how
//! often each player repeats a role they already had.
//!
//! Role bookkeeping is deliberately decoupled from [`GameSeeder`]: pairing
//! history and role history answer different questions, and many game
//! systems have no roles at all. Callers who use both record each finished
//! game into both trackers.
//!
//! [`GameSeeder`]: crate::seeder::GameSeeder

use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::hash::Hash;

use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::SeedError;
use crate::history::PlayerId;

/// Marker for anything usable as a role identity, mirroring
/// [`PlayerId`].
pub trait RoleId: Clone + Eq + Hash + Display {}

impl<T: Clone + Eq + Hash + Display> RoleId for T {}

/// A chosen mapping of one table's players to roles.
#[derive(Debug, Clone)]
pub struct RoleAssignment<P, R> {
    /// One `(player, role)` pair per seat.
    pub pairs: Vec<(P, R)>,
    /// How many of those players have already played their assigned role,
    /// counting multiplicity. 0 means everyone gets a fresh role.
    pub repeats: u32,
}

/// Tracks how often each player has played each role and proposes
/// repeat-minimising assignments.
///
/// Players are learned lazily from recorded assignments; an unseen player
/// simply has no repeats to avoid.
#[derive(Debug, Clone)]
pub struct RoleAssigner<P: PlayerId, R: RoleId> {
    roles: Vec<R>,
    played: HashMap<P, HashMap<R, u32>>,
}

impl<P: PlayerId, R: RoleId> RoleAssigner<P, R> {
    /// Creates an assigner for games played with exactly these roles.
    ///
    /// Fails with [`SeedError::DuplicateRole`] if a role appears twice.
    pub fn new(roles: Vec<R>) -> Result<Self, SeedError> {
        let mut seen = HashSet::new();
        for role in &roles {
            if !seen.insert(role) {
                return Err(SeedError::DuplicateRole(role.to_string()));
            }
        }
        Ok(Self {
            roles,
            played: HashMap::new(),
        })
    }

    /// Number of roles, which is also the table size.
    pub fn table_size(&self) -> usize {
        self.roles.len()
    }

    /// How often `player` has played `role`.
    pub fn times_played(&self, player: &P, role: &R) -> u32 {
        self.played
            .get(player)
            .and_then(|row| row.get(role))
            .copied()
            .unwrap_or(0)
    }

    /// Records a finished game's role assignment.
    ///
    /// Fails with [`SeedError::InvalidPlayerCount`] unless there is exactly
    /// one player per role, with [`SeedError::DuplicateRole`] or
    /// [`SeedError::DuplicatePlayer`] if a role or player appears twice.
    pub fn record(&mut self, assignment: &[(P, R)]) -> Result<(), SeedError> {
        if assignment.len() != self.roles.len() {
            return Err(SeedError::InvalidPlayerCount(format!(
                "role assignment covers {} seats, expected {}",
                assignment.len(),
                self.roles.len()
            )));
        }
        let mut roles_seen = HashSet::new();
        let mut players_seen = HashSet::new();
        for (player, role) in assignment {
            if !roles_seen.insert(role) {
                return Err(SeedError::DuplicateRole(role.to_string()));
            }
            if !players_seen.insert(player) {
                return Err(SeedError::DuplicatePlayer(player.to_string()));
            }
        }
        for (player, role) in assignment {
            *self
                .played
                .entry(player.clone())
                .or_default()
                .entry(role.clone())
                .or_insert(0) += 1;
        }
        Ok(())
    }

    /// Picks the role permutation with the fewest repeat plays for `table`.
    ///
    /// Every permutation is scored over a player order shuffled with `rng`,
    /// so ties break randomly and a seeded generator reproduces the same
    /// assignment. The search is exact but factorial in the number of
    /// roles; it is meant for ordinary table sizes (7! is a few thousand
    /// candidates), not for large k.
    ///
    /// Fails with [`SeedError::InvalidPlayerCount`] unless the table seats
    /// exactly one player per role.
    pub fn assign(
        &self,
        table: &HashSet<P>,
        rng: &mut impl Rng,
    ) -> Result<RoleAssignment<P, R>, SeedError> {
        if table.len() != self.roles.len() {
            return Err(SeedError::InvalidPlayerCount(format!(
                "table seats {} players, expected {}",
                table.len(),
                self.roles.len()
            )));
        }
        let mut players: Vec<&P> = table.iter().collect();
        players.shuffle(rng);

        let mut best: Option<(Vec<&R>, u32)> = None;
        for perm in self.roles.iter().permutations(self.roles.len()) {
            let repeats: u32 = players
                .iter()
                .zip(&perm)
                .map(|(player, role)| self.times_played(player, role))
                .sum();
            if best.as_ref().map_or(true, |(_, b)| repeats < *b) {
                let done = repeats == 0;
                best = Some((perm, repeats));
                if done {
                    break;
                }
            }
        }
        // table_size >= 1, so at least one permutation was scored
        let (roles, repeats) = best
            .ok_or_else(|| SeedError::InvalidPlayerCount("empty role list".into()))?;
        let pairs = players
            .into_iter()
            .cloned()
            .zip(roles.into_iter().cloned())
            .collect();
        Ok(RoleAssignment { pairs, repeats })
    }
}

#[cfg(test)]
mod roles_tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const ROLES: [&str; 4] = ["north", "east", "south", "west"];

    fn assigner() -> RoleAssigner<u32, &'static str> {
        RoleAssigner::new(ROLES.to_vec()).unwrap()
    }

    fn table(players: &[u32]) -> HashSet<u32> {
        players.iter().copied().collect()
    }

    #[test]
    fn duplicate_roles_rejected() {
        let err = RoleAssigner::<u32, _>::new(vec!["north", "north"]).unwrap_err();
        assert!(matches!(err, SeedError::DuplicateRole(_)));
    }

    #[test]
    fn fresh_table_has_no_repeats() {
        let a = assigner();
        let result = a
            .assign(&table(&[1, 2, 3, 4]), &mut rand::thread_rng())
            .unwrap();
        assert_eq!(result.repeats, 0);
        assert_eq!(result.pairs.len(), 4);
        let roles: HashSet<&str> = result.pairs.iter().map(|(_, r)| *r).collect();
        assert_eq!(roles.len(), 4);
    }

    #[test]
    fn reassignment_avoids_previous_roles() {
        let mut rng = rand::thread_rng();
        let mut a = assigner();
        let first = a.assign(&table(&[1, 2, 3, 4]), &mut rng).unwrap();
        a.record(&first.pairs).unwrap();
        // a zero-repeat derangement always exists for 4 seats
        let second = a.assign(&table(&[1, 2, 3, 4]), &mut rng).unwrap();
        assert_eq!(second.repeats, 0);
        for (player, role) in &second.pairs {
            assert_eq!(a.times_played(player, role), 0);
        }
    }

    #[test]
    fn forced_repeat_is_counted() {
        let mut a = RoleAssigner::new(vec!["solo"]).unwrap();
        a.record(&[(7u32, "solo")]).unwrap();
        let result = a.assign(&table(&[7]), &mut rand::thread_rng()).unwrap();
        assert_eq!(result.repeats, 1);
    }

    #[test]
    fn seeded_rng_reproduces_assignment() {
        let mut a = assigner();
        a.record(&[(1, "north"), (2, "east"), (3, "south"), (4, "west")])
            .unwrap();
        let first = a
            .assign(&table(&[1, 2, 3, 4]), &mut StdRng::seed_from_u64(3))
            .unwrap();
        let second = a
            .assign(&table(&[1, 2, 3, 4]), &mut StdRng::seed_from_u64(3))
            .unwrap();
        assert_eq!(first.pairs, second.pairs);
        assert_eq!(first.repeats, second.repeats);
    }

    #[test]
    fn record_validates_shape() {
        let mut a = assigner();
        assert!(matches!(
            a.record(&[(1, "north")]),
            Err(SeedError::InvalidPlayerCount(_))
        ));
        assert!(matches!(
            a.record(&[(1, "north"), (2, "north"), (3, "south"), (4, "west")]),
            Err(SeedError::DuplicateRole(_))
        ));
        assert!(matches!(
            a.record(&[(1, "north"), (1, "east"), (3, "south"), (4, "west")]),
            Err(SeedError::DuplicatePlayer(_))
        ));
        assert!(matches!(
            a.assign(&table(&[1, 2, 3]), &mut rand::thread_rng()),
            Err(SeedError::InvalidPlayerCount(_))
        ));
    }
}
