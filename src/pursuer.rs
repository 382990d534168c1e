//! Pursuer agents and the fixed-cadence tick that moves them.

use rand::Rng;

use crate::grid::{Cell, Dir, Grid, Pos, SpeedTier};
use crate::state::{GameState, MoveOutcome, Phase};

pub const BASE_WEIGHT: u32 = 1;
pub const PURSUIT_WEIGHT: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pursuer {
    pub pos: Pos,
    /// Rendered differently by the frontend; every tier moves one cell per tick.
    pub tier: SpeedTier,
    pub active: bool,
}

impl Pursuer {
    pub fn new(pos: Pos, tier: SpeedTier) -> Self {
        Self {
            pos,
            tier,
            active: true,
        }
    }
}

/// Moves every active pursuer one step, in registration order. Stops at the
/// first pursuer that reaches the player.
pub fn tick(state: &mut GameState, rng: &mut impl Rng) -> MoveOutcome {
    if state.phase != Phase::Playing {
        return MoveOutcome::Rejected;
    }
    let player = state.player;
    for idx in 0..state.pursuers.len() {
        let Pursuer { pos: from, tier, active } = state.pursuers[idx];
        if !active {
            continue;
        }
        vacate(&mut state.grid, from);

        let options = weighted_steps(&state.grid, from, player);
        let to = pick_weighted(&options, rng).unwrap_or(from);
        if to == player {
            let covered = state.grid.get(from).collectible();
            state.grid.set(from, Cell::Pursuer { tier, covered });
            log::debug!("pursuer {idx} caught the player at {to:?}");
            return state.lose();
        }

        let covered = state.grid.get(to).collectible();
        state.grid.set(to, Cell::Pursuer { tier, covered });
        state.pursuers[idx].pos = to;
    }
    MoveOutcome::Moved
}

/// Clears a pursuer off `pos`, putting back any collectible it stood on.
fn vacate(grid: &mut Grid, pos: Pos) {
    let restored = match grid.get(pos) {
        Cell::Pursuer {
            covered: Some(c), ..
        } => Cell::Collectible(c),
        _ => Cell::Empty,
    };
    grid.set(pos, restored);
}

/// Legal steps from `from`, weighted toward `target`. A step that closes the
/// gap on either axis gets [`PURSUIT_WEIGHT`].
pub fn weighted_steps(grid: &Grid, from: Pos, target: Pos) -> Vec<(Pos, u32)> {
    let dx = from.x.abs_diff(target.x);
    let dy = from.y.abs_diff(target.y);
    Dir::ALL
        .iter()
        .filter_map(|dir| grid.step(from, *dir))
        .filter(|p| {
            let cell = grid.get(*p);
            !cell.is_wall() && !cell.is_pursuer()
        })
        .map(|p| {
            let closer = p.x.abs_diff(target.x) < dx || p.y.abs_diff(target.y) < dy;
            (p, if closer { PURSUIT_WEIGHT } else { BASE_WEIGHT })
        })
        .collect()
}

/// Cumulative-weight draw.
pub fn pick_weighted<T: Copy>(options: &[(T, u32)], rng: &mut impl Rng) -> Option<T> {
    let total: u32 = options.iter().map(|(_, w)| w).sum();
    if total == 0 {
        return None;
    }
    let mut roll = rng.gen_range(0..total);
    for (item, weight) in options {
        if roll < *weight {
            return Some(*item);
        }
        roll -= weight;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::SPAWN;
    use crate::state::tests::{collectible, corridor_state};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn with_pursuers(mut grid: Grid, player: Pos, at: &[Pos]) -> GameState {
        let pursuers: Vec<Pursuer> = at
            .iter()
            .map(|p| Pursuer::new(*p, SpeedTier::Normal))
            .collect();
        for p in &pursuers {
            let covered = grid.get(p.pos).collectible();
            grid.set(
                p.pos,
                Cell::Pursuer {
                    tier: p.tier,
                    covered,
                },
            );
        }
        GameState::new(grid, player, pursuers, 1, 0)
    }

    fn pursuer_cells(state: &GameState) -> usize {
        state.grid().cells().filter(|(_, c)| c.is_pursuer()).count()
    }

    #[test]
    fn steps_toward_the_target_weigh_more() {
        let grid = Grid::bordered(9);
        let mut steps = weighted_steps(&grid, Pos::new(4, 4), Pos::new(1, 1));
        steps.sort_by_key(|(p, _)| (p.y, p.x));
        assert_eq!(
            steps,
            vec![
                (Pos::new(4, 3), PURSUIT_WEIGHT),
                (Pos::new(3, 4), PURSUIT_WEIGHT),
                (Pos::new(5, 4), BASE_WEIGHT),
                (Pos::new(4, 5), BASE_WEIGHT),
            ]
        );
    }

    #[test]
    fn walls_and_other_pursuers_block_but_the_player_does_not() {
        let mut grid = Grid::bordered(9);
        grid.set(Pos::new(4, 3), Cell::Wall);
        grid.set(
            Pos::new(5, 4),
            Cell::Pursuer {
                tier: SpeedTier::Normal,
                covered: None,
            },
        );
        grid.set(Pos::new(3, 4), Cell::Player);
        let steps: Vec<Pos> = weighted_steps(&grid, Pos::new(4, 4), Pos::new(3, 4))
            .into_iter()
            .map(|(p, _)| p)
            .collect();
        assert_eq!(steps.len(), 2);
        assert!(steps.contains(&Pos::new(3, 4)));
        assert!(steps.contains(&Pos::new(4, 5)));
    }

    #[test]
    fn weighted_pick_respects_weights() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let options = [('a', 1), ('b', 5)];
        let mut b = 0;
        for _ in 0..6000 {
            if pick_weighted(&options, &mut rng) == Some('b') {
                b += 1;
            }
        }
        assert!((4500..5500).contains(&b), "b picked {b} times");
        assert_eq!(pick_weighted::<char>(&[], &mut rng), None);
    }

    #[test]
    fn boxed_in_pursuer_stays_put() {
        let mut grid = Grid::bordered(9);
        for p in [Pos::new(5, 4), Pos::new(3, 4), Pos::new(4, 3), Pos::new(4, 5)] {
            grid.set(p, Cell::Wall);
        }
        grid.set(Pos::new(6, 6), collectible('一', 1));
        let mut state = with_pursuers(grid, SPAWN, &[Pos::new(4, 4)]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(tick(&mut state, &mut rng), MoveOutcome::Moved);
        assert_eq!(state.pursuers()[0].pos, Pos::new(4, 4));
        assert!(state.grid().get(Pos::new(4, 4)).is_pursuer());
    }

    #[test]
    fn pursuer_passes_over_collectibles_without_consuming_them() {
        // A one-cell-wide corridor forces the pursuer back and forth over (3, 1).
        let mut grid = Grid::bordered(7);
        for pos in grid.positions().collect::<Vec<_>>() {
            if grid.is_interior(pos) && pos.y != 1 {
                grid.set(pos, Cell::Wall);
            }
        }
        grid.set(Pos::new(3, 1), collectible('二', 2));
        grid.set(Pos::new(1, 1), collectible('一', 1));
        let mut state = with_pursuers(grid, Pos::new(5, 1), &[Pos::new(3, 1)]);
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        for _ in 0..20 {
            if tick(&mut state, &mut rng) == MoveOutcome::Lost {
                break;
            }
            let stage_two: Vec<_> = state
                .grid()
                .cells()
                .filter_map(|(_, c)| c.collectible())
                .filter(|c| c.stage == 2)
                .collect();
            assert_eq!(stage_two.len(), 1);
            assert_eq!(pursuer_cells(&state), 1);
        }
    }

    #[test]
    fn catching_the_player_ends_the_tick() {
        // Player pinned between two pursuers in a corridor; the first to move
        // can only reach the player or step back.
        let mut grid = Grid::bordered(7);
        for pos in grid.positions().collect::<Vec<_>>() {
            if grid.is_interior(pos) && pos.y != 1 {
                grid.set(pos, Cell::Wall);
            }
        }
        grid.set(Pos::new(5, 1), collectible('一', 1));
        let mut state = with_pursuers(grid, Pos::new(3, 1), &[Pos::new(2, 1), Pos::new(4, 1)]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut outcome = MoveOutcome::Moved;
        for _ in 0..50 {
            outcome = tick(&mut state, &mut rng);
            if outcome == MoveOutcome::Lost {
                break;
            }
        }
        assert_eq!(outcome, MoveOutcome::Lost);
        assert_eq!(state.phase(), Phase::Lost);
        assert_eq!(state.grid().get(Pos::new(3, 1)), Cell::Player);
        assert_eq!(pursuer_cells(&state), 2);

        let frozen = state.grid().clone();
        assert_eq!(tick(&mut state, &mut rng), MoveOutcome::Rejected);
        assert_eq!(state.grid(), &frozen);
    }

    #[test]
    fn terminal_state_suppresses_ticks() {
        let mut state = corridor_state();
        state.attempt_move(Dir::Right);
        state.attempt_move(Dir::Right);
        assert_eq!(state.attempt_move(Dir::Right), MoveOutcome::Won);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(tick(&mut state, &mut rng), MoveOutcome::Rejected);
    }
}
