//! Symmetric maze generation and the reachability check that accepts it.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::GameError;
use crate::grid::{Cell, Dir, Grid, Pos, SPAWN};

pub const WALL_CHANCE: f64 = 0.25;
/// Accept a maze once this share of its open cells is reachable from spawn.
pub const MIN_REACHABLE_RATIO: f64 = 0.9;
pub const MAX_GENERATION_ATTEMPTS: usize = 1000;
pub const MIN_BOARD_SIZE: usize = 7;
/// Cells with both coordinates at or below this stay open around spawn.
const SAFE_ZONE: usize = 2;

/// Draws a fresh seed per attempt until a candidate passes [`is_accessible`].
pub fn generate(size: usize, rng: &mut impl Rng) -> Result<Grid, GameError> {
    if size < MIN_BOARD_SIZE {
        return Err(GameError::InvalidBoardSize { size });
    }
    for attempt in 1..=MAX_GENERATION_ATTEMPTS {
        let seed: u64 = rng.gen();
        if let Some(grid) = candidate(size, seed) {
            log::debug!("maze accepted after {attempt} attempt(s) (seed {seed})");
            return Ok(grid);
        }
        log::debug!("maze candidate {attempt} rejected (seed {seed})");
    }
    Err(GameError::GenerationFailed {
        size,
        attempts: MAX_GENERATION_ATTEMPTS,
    })
}

/// One construction attempt. Pure in `seed`: the same seed always yields the
/// same grid, or the same rejection.
pub fn candidate(size: usize, seed: u64) -> Option<Grid> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let grid = build_symmetric(size, &mut rng);
    is_accessible(&grid).then_some(grid)
}

fn build_symmetric(size: usize, rng: &mut impl Rng) -> Grid {
    let mut grid = Grid::bordered(size);
    let half = size / 2;
    for y in 1..half {
        for x in 1..half {
            if x <= SAFE_ZONE && y <= SAFE_ZONE {
                continue;
            }
            if rng.gen_bool(WALL_CHANCE) {
                for pos in mirrored(size, x, y) {
                    grid.set(pos, Cell::Wall);
                }
            }
        }
    }
    grid
}

fn mirrored(size: usize, x: usize, y: usize) -> [Pos; 4] {
    let mx = size - 1 - x;
    let my = size - 1 - y;
    [
        Pos::new(x, y),
        Pos::new(mx, y),
        Pos::new(x, my),
        Pos::new(mx, my),
    ]
}

/// Breadth-first flood over non-wall cells; indexed `y * size + x`.
pub fn reachable_from(grid: &Grid, start: Pos) -> Vec<bool> {
    let size = grid.size();
    let mut seen = vec![false; size * size];
    if !grid.contains(start) || grid.get(start).is_wall() {
        return seen;
    }
    let mut q = VecDeque::new();
    seen[start.y * size + start.x] = true;
    q.push_back(start);
    while let Some(pos) = q.pop_front() {
        for dir in Dir::ALL {
            let Some(next) = grid.step(pos, dir) else {
                continue;
            };
            let idx = next.y * size + next.x;
            if seen[idx] || grid.get(next).is_wall() {
                continue;
            }
            seen[idx] = true;
            q.push_back(next);
        }
    }
    seen
}

pub fn reachable_ratio(grid: &Grid) -> f64 {
    let open = grid.open_count();
    if open == 0 {
        return 0.0;
    }
    let reached = reachable_from(grid, SPAWN).iter().filter(|r| **r).count();
    reached as f64 / open as f64
}

pub fn is_accessible(grid: &Grid) -> bool {
    reachable_ratio(grid) >= MIN_REACHABLE_RATIO
}
