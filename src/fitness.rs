//! Cost of a candidate table or seeding. Lower is better; zero means no
//! pair in the seeding has ever been recorded together and no adverse bias
//! applies.

use std::collections::{HashMap, HashSet};

use crate::history::{PairingHistory, PlayerId};
use crate::partition::Slot;

/// Sum of [`PairingHistory::pair_count`] over all ordered pairs of distinct
/// players at the table.
///
/// Each unordered pair is counted from both directions, so a 7-player table
/// whose members have each shared exactly one previous game scores 42
/// (21 pairs, twice each).
pub fn table_fitness<P: PlayerId>(table: &HashSet<P>, history: &PairingHistory<P>) -> i64 {
    let members: Vec<&P> = table.iter().collect();
    pairwise(&members, |p, q| history.pair_count(p, q))
}

/// Sum of [`table_fitness`] over all tables of a seeding.
pub fn seeding_fitness<P: PlayerId>(games: &[HashSet<P>], history: &PairingHistory<P>) -> i64 {
    games.iter().map(|g| table_fitness(g, history)).sum()
}

fn pairwise<P, F>(members: &[&P], count: F) -> i64
where
    F: Fn(&P, &P) -> i32,
{
    let mut total = 0i64;
    for (i, &p) in members.iter().enumerate() {
        for (j, &q) in members.iter().enumerate() {
            if i != j {
                total += i64::from(count(p, q));
            }
        }
    }
    total
}

/// Fitness of a slot-based seeding as used by the search internals.
///
/// With `count_internal` set, pairs co-occurring within the candidate
/// seeding itself are charged as well, table by table: the first table a
/// pair shares is free, each further shared table costs like a recorded
/// game. This keeps the two tables of a doubled player from sharing the
/// same companions, at the price of extra bookkeeping.
pub(crate) fn slot_seeding_fitness<P: PlayerId>(
    tables: &[Vec<Slot<P>>],
    history: &PairingHistory<P>,
    count_internal: bool,
) -> i64 {
    let mut total = 0i64;
    let mut seen: HashMap<&P, HashMap<&P, i32>> = HashMap::new();
    for table in tables {
        let members: Vec<&P> = table.iter().map(|s| &s.player).collect();
        total += pairwise(&members, |p, q| history.pair_count(p, q));
        if count_internal {
            total += pairwise(&members, |p, q| {
                seen.get(p).and_then(|row| row.get(q)).copied().unwrap_or(0)
            });
            for &p in &members {
                let row = seen.entry(p).or_default();
                for &q in &members {
                    if p != q {
                        *row.entry(q).or_insert(0) += 1;
                    }
                }
            }
        }
    }
    total
}

#[cfg(test)]
mod fitness_tests {
    use super::*;
    use crate::partition::slot_pool;

    fn table(players: &[u32]) -> HashSet<u32> {
        players.iter().copied().collect()
    }

    fn history_after(games: &[&[u32]]) -> PairingHistory<u32> {
        let mut h = PairingHistory::new(7);
        for p in 1..=21 {
            h.register(p).unwrap();
        }
        for g in games {
            h.record_game(&table(g)).unwrap();
        }
        h
    }

    #[test]
    fn pristine_history_scores_zero() {
        let h = history_after(&[]);
        assert_eq!(table_fitness(&table(&[1, 2, 3, 4, 5, 6, 7]), &h), 0);
    }

    #[test]
    fn replayed_table_is_worst_case() {
        let h = history_after(&[&[1, 2, 3, 4, 5, 6, 7]]);
        // 21 unordered pairs, each counted from both directions
        assert_eq!(table_fitness(&table(&[1, 2, 3, 4, 5, 6, 7]), &h), 42);
    }

    #[test]
    fn one_pair_from_each_of_two_games() {
        let h = history_after(&[&[1, 2, 3, 4, 5, 6, 7], &[8, 9, 10, 11, 12, 13, 14]]);
        // {1,2} from the first game, {8,9} from the second, 3 fresh players
        assert_eq!(table_fitness(&table(&[1, 2, 8, 9, 15, 16, 17]), &h), 4);
    }

    #[test]
    fn three_players_from_one_game() {
        let h = history_after(&[&[1, 2, 3, 4, 5, 6, 7]]);
        // pairs {1,2}, {1,3}, {2,3}, twice each
        assert_eq!(table_fitness(&table(&[1, 2, 3, 15, 16, 17, 18]), &h), 6);
    }

    #[test]
    fn seeding_fitness_sums_tables() {
        let h = history_after(&[&[1, 2, 3, 4, 5, 6, 7]]);
        let games = vec![
            table(&[1, 2, 3, 15, 16, 17, 18]),
            table(&[4, 5, 8, 9, 10, 11, 12]),
        ];
        assert_eq!(seeding_fitness(&games, &h), 6 + 2);
    }

    #[test]
    fn negative_bias_lowers_fitness() {
        let mut h = history_after(&[&[1, 2, 3, 4, 5, 6, 7]]);
        h.add_bias(&1, &2, -2).unwrap();
        // the {1,2} pair now contributes -1 from each direction
        assert_eq!(table_fitness(&table(&[1, 2, 8, 9, 10, 11, 12]), &h), -2);
    }

    #[test]
    fn internal_counting_charges_repeat_companions() {
        let h = history_after(&[]);
        // player 1 doubles up and keeps player 2 at both tables
        let tables = vec![
            slot_pool(&[1, 2, 3, 4, 5, 6, 7]),
            slot_pool(&[1, 2, 8, 9, 10, 11, 12]),
        ];
        assert_eq!(slot_seeding_fitness(&tables, &h, false), 0);
        // {1,2} shares a second table: one pair, both directions
        assert_eq!(slot_seeding_fitness(&tables, &h, true), 2);
    }
}
