//! Builds candidate partitions of a round's eligible pool into tables.
//!
//! Two constructions are provided: a fast random draw used by the
//! random-search strategy, and a complete recursive enumeration used by the
//! exhaustive strategy. Both work on [`Slot`]s rather than bare players so
//! that a player occupying two pool slots (doubling up) keeps both slots
//! distinct during construction while staying one identity for every
//! history lookup.

use std::collections::HashSet;

use itertools::Itertools;
use rand::Rng;

use crate::error::SeedError;
use crate::history::PlayerId;

/// One occurrence of a player in the eligible pool.
///
/// `copy` distinguishes the two slots of a player doubling up; it is only
/// meaningful during partition construction and is stripped before results
/// reach the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Slot<P> {
    pub player: P,
    pub copy: u8,
}

/// Raised internally when a random draw paints itself into a corner. The
/// caller discards the attempt and redraws.
#[derive(Debug)]
pub(crate) struct AssignmentFailed;

/// Tags each occurrence of a player in `players` with its copy index.
pub(crate) fn slot_pool<P: PlayerId>(players: &[P]) -> Vec<Slot<P>> {
    let mut pool = Vec::with_capacity(players.len());
    for (i, p) in players.iter().enumerate() {
        let copy = players[..i].iter().filter(|q| *q == p).count() as u8;
        pool.push(Slot {
            player: p.clone(),
            copy,
        });
    }
    pool
}

fn distinct_players<P: PlayerId>(slots: &[Slot<P>]) -> usize {
    slots.iter().map(|s| &s.player).collect::<HashSet<_>>().len()
}

fn contains_player<P: PlayerId>(table: &[Slot<P>], player: &P) -> bool {
    table.iter().any(|s| s.player == *player)
}

/// Draws a single random partition of `pool` into tables of `table_size`.
///
/// Slots are drawn at random; a slot whose player is already at the
/// table-in-progress is skipped and redrawn. Fails when exactly the last
/// `table_size` slots remain but hold fewer distinct players, which can
/// happen when doubled slots were drawn into proximity.
pub(crate) fn random_partition<P: PlayerId>(
    pool: &[Slot<P>],
    table_size: usize,
    rng: &mut impl Rng,
) -> Result<Vec<Vec<Slot<P>>>, AssignmentFailed> {
    let mut remaining = pool.to_vec();
    let mut tables = Vec::with_capacity(pool.len() / table_size);
    let mut table: Vec<Slot<P>> = Vec::with_capacity(table_size);
    while !remaining.is_empty() {
        if remaining.len() == table_size && distinct_players(&remaining) < table_size {
            return Err(AssignmentFailed);
        }
        let idx = rng.gen_range(0..remaining.len());
        if contains_player(&table, &remaining[idx].player) {
            // redraw; with at most two copies per player this cannot spin
            // forever before the final-table check above fires
            continue;
        }
        table.push(remaining.swap_remove(idx));
        if table.len() == table_size {
            tables.push(std::mem::take(&mut table));
        }
    }
    Ok(tables)
}

/// Keeps redrawing random partitions until one succeeds, up to `attempts`.
///
/// A valid partition is found quickly whenever one exists at all; the bound
/// guards against pathological doubling configurations, surfacing
/// [`SeedError::Unsolvable`] instead of spinning.
pub(crate) fn random_partition_bounded<P: PlayerId>(
    pool: &[Slot<P>],
    table_size: usize,
    attempts: usize,
    rng: &mut impl Rng,
) -> Result<Vec<Vec<Slot<P>>>, SeedError> {
    for _ in 0..attempts {
        if let Ok(tables) = random_partition(pool, table_size, rng) {
            return Ok(tables);
        }
    }
    Err(SeedError::Unsolvable(format!(
        "no valid random assignment of {} slots into tables of {} after {} attempts",
        pool.len(),
        table_size,
        attempts
    )))
}

/// Enumerates every way to split `pool` into tables of `table_size`,
/// feeding each complete partition to `visit`.
///
/// Partitions differing only in table order are visited separately; callers
/// only keep a running minimum, so the duplication costs time, not
/// correctness. Returns the number of partitions visited, or
/// [`SeedError::Unsolvable`] when no complete partition exists.
pub(crate) fn for_each_partition<P, F>(
    pool: &[Slot<P>],
    table_size: usize,
    visit: &mut F,
) -> Result<usize, SeedError>
where
    P: PlayerId,
    F: FnMut(&[Vec<Slot<P>>]),
{
    if pool.len() % table_size != 0 {
        return Err(SeedError::InvalidPlayerCount(format!(
            "{} slots is not an exact multiple of {}",
            pool.len(),
            table_size
        )));
    }
    let mut prefix = Vec::with_capacity(pool.len() / table_size);
    let mut visited = 0usize;
    recurse(pool.to_vec(), table_size, &mut prefix, &mut visited, visit);
    if visited == 0 {
        return Err(SeedError::Unsolvable(format!(
            "no duplicate-free partition of {} slots into tables of {}",
            pool.len(),
            table_size
        )));
    }
    Ok(visited)
}

fn recurse<P, F>(
    pool: Vec<Slot<P>>,
    table_size: usize,
    prefix: &mut Vec<Vec<Slot<P>>>,
    visited: &mut usize,
    visit: &mut F,
) where
    P: PlayerId,
    F: FnMut(&[Vec<Slot<P>>]),
{
    if distinct_players(&pool) < table_size {
        // no combination from here can avoid a duplicate
        return;
    }
    if pool.len() == table_size {
        prefix.push(pool);
        *visited += 1;
        visit(prefix);
        prefix.pop();
        return;
    }
    for combo in (0..pool.len()).combinations(table_size) {
        let table: Vec<Slot<P>> = combo.iter().map(|&i| pool[i].clone()).collect();
        if distinct_players(&table) < table_size {
            continue;
        }
        let picked: HashSet<usize> = combo.into_iter().collect();
        let rest: Vec<Slot<P>> = pool
            .iter()
            .enumerate()
            .filter(|(i, _)| !picked.contains(i))
            .map(|(_, s)| s.clone())
            .collect();
        prefix.push(table);
        recurse(rest, table_size, prefix, visited, visit);
        prefix.pop();
    }
}
