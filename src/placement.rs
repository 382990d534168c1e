//! Scatters collectibles and pursuers over a freshly generated maze.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::OrderSequence;
use crate::grid::{Cell, Collectible, Grid, Pos, SpeedTier, SPAWN};
use crate::pursuer::Pursuer;

pub const PLACEMENT_ATTEMPTS: usize = 100;
pub const MIN_PURSUER_DISTANCE: usize = 5;
pub const FAST_PURSUER_CHANCE: f64 = 0.3;
pub const MAX_PURSUERS: u32 = 4;

/// Puts one collectible per stage `1..=max_stage` on a random empty interior
/// cell. A stage that finds no spot within [`PLACEMENT_ATTEMPTS`] draws is
/// left out. Returns the stages that were placed, ascending.
pub fn place_collectibles(
    grid: &mut Grid,
    catalog: &OrderSequence,
    max_stage: u32,
    rng: &mut impl Rng,
) -> Vec<u32> {
    let size = grid.size();
    let mut placed = Vec::new();
    for stage in 1..=max_stage {
        let Some(symbol) = catalog.pick(stage, rng) else {
            continue;
        };
        for _ in 0..PLACEMENT_ATTEMPTS {
            let pos = Pos::new(rng.gen_range(1..size - 1), rng.gen_range(1..size - 1));
            if pos == SPAWN || grid.get(pos) != Cell::Empty {
                continue;
            }
            grid.set(
                pos,
                Cell::Collectible(Collectible {
                    symbol,
                    stage,
                    active: stage == 1,
                }),
            );
            placed.push(stage);
            break;
        }
    }
    if placed.len() < max_stage as usize {
        log::warn!(
            "placed {} of {} collectibles; stages {:?} missing",
            placed.len(),
            max_stage,
            (1..=max_stage)
                .filter(|s| !placed.contains(s))
                .collect::<Vec<_>>()
        );
    }
    placed
}

pub fn pursuer_count(level: u32) -> usize {
    if level <= 1 {
        2
    } else {
        level.min(MAX_PURSUERS) as usize
    }
}

/// Spawns pursuers on distinct empty interior cells at least
/// [`MIN_PURSUER_DISTANCE`] steps from `player`. Places fewer when the maze
/// runs out of eligible cells.
pub fn place_pursuers(grid: &mut Grid, player: Pos, level: u32, rng: &mut impl Rng) -> Vec<Pursuer> {
    let mut eligible: Vec<Pos> = grid
        .cells()
        .filter(|(pos, cell)| {
            *cell == Cell::Empty
                && grid.is_interior(*pos)
                && pos.manhattan(player) >= MIN_PURSUER_DISTANCE
        })
        .map(|(pos, _)| pos)
        .collect();
    eligible.shuffle(rng);

    let pursuers: Vec<Pursuer> = eligible
        .into_iter()
        .take(pursuer_count(level))
        .map(|pos| {
            let tier = if rng.gen_bool(FAST_PURSUER_CHANCE) {
                SpeedTier::Fast
            } else {
                SpeedTier::Normal
            };
            Pursuer::new(pos, tier)
        })
        .collect();
    for p in &pursuers {
        grid.set(
            p.pos,
            Cell::Pursuer {
                tier: p.tier,
                covered: None,
            },
        );
    }
    pursuers
}
