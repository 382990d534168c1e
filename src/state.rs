//! Authoritative per-level state and the player's move resolution.

use crate::grid::{Cell, Dir, Grid, Pos};
use crate::pursuer::Pursuer;

pub const POINTS_PER_STAGE: u32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Won,
    Lost,
}

/// What a single stimulus did to the state. Callers key sound and highlight
/// refreshes off this.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    Rejected,
    Collected,
    Won,
    Lost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub current_stage: u32,
    pub remaining: u32,
    pub score: u32,
    pub level: u32,
}

#[derive(Clone, Debug)]
pub struct GameState {
    pub(crate) grid: Grid,
    pub(crate) player: Pos,
    pub(crate) pursuers: Vec<Pursuer>,
    pub(crate) phase: Phase,
    progress: Progress,
    /// Stages present on the grid at level start, ascending.
    stages: Vec<u32>,
    target: Option<char>,
}

impl GameState {
    /// Takes ownership of a populated grid. The player is written at
    /// `player`; stage bookkeeping is derived from the collectibles present.
    pub fn new(mut grid: Grid, player: Pos, pursuers: Vec<Pursuer>, level: u32, score: u32) -> Self {
        grid.set(player, Cell::Player);
        let mut stages: Vec<u32> = grid
            .cells()
            .filter_map(|(_, c)| c.collectible())
            .map(|c| c.stage)
            .collect();
        stages.sort_unstable();
        stages.dedup();

        let mut state = Self {
            grid,
            player,
            pursuers,
            phase: Phase::Playing,
            progress: Progress {
                current_stage: stages.first().copied().unwrap_or(1),
                remaining: stages.len() as u32,
                score,
                level,
            },
            stages,
            target: None,
        };
        state.refresh_target();
        state
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> Pos {
        self.player
    }

    pub fn pursuers(&self) -> &[Pursuer] {
        &self.pursuers
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        self.phase != Phase::Playing
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// Symbol of the collectible the player must take next.
    pub fn target(&self) -> Option<char> {
        self.target
    }

    pub fn stages_cleared(&self) -> u32 {
        self.stages.len() as u32 - self.progress.remaining
    }

    pub fn attempt_move(&mut self, dir: Dir) -> MoveOutcome {
        if self.is_terminal() {
            return MoveOutcome::Rejected;
        }
        let Some(to) = self.grid.step(self.player, dir) else {
            return MoveOutcome::Rejected;
        };
        match self.grid.get(to) {
            Cell::Wall | Cell::Player => MoveOutcome::Rejected,
            Cell::Pursuer { .. } => {
                log::info!("player walked into a pursuer at {to:?}");
                self.lose()
            }
            Cell::Collectible(c) if c.stage != self.progress.current_stage => {
                log::info!(
                    "took stage {} out of order (expected {})",
                    c.stage,
                    self.progress.current_stage
                );
                self.lose()
            }
            Cell::Collectible(_) => self.collect(to),
            Cell::Empty => {
                self.move_player(to);
                MoveOutcome::Moved
            }
        }
    }

    fn collect(&mut self, to: Pos) -> MoveOutcome {
        let stage = self.progress.current_stage;
        self.progress.score += stage * POINTS_PER_STAGE;
        self.progress.remaining = self.progress.remaining.saturating_sub(1);
        self.progress.current_stage = self
            .stages
            .iter()
            .copied()
            .find(|s| *s > stage)
            .unwrap_or(stage + 1);
        self.move_player(to);
        self.refresh_target();

        if self.progress.remaining == 0 {
            self.phase = Phase::Won;
            log::info!(
                "level {} cleared with score {}",
                self.progress.level,
                self.progress.score
            );
            return MoveOutcome::Won;
        }
        MoveOutcome::Collected
    }

    pub(crate) fn lose(&mut self) -> MoveOutcome {
        self.phase = Phase::Lost;
        log::info!(
            "level {} lost at stage {} with score {}",
            self.progress.level,
            self.progress.current_stage,
            self.progress.score
        );
        MoveOutcome::Lost
    }

    fn move_player(&mut self, to: Pos) {
        self.grid.set(self.player, Cell::Empty);
        self.grid.set(to, Cell::Player);
        self.player = to;
    }

    /// Re-flags which collectible is active and looks up the new target.
    fn refresh_target(&mut self) {
        let current = self.progress.current_stage;
        self.target = None;
        for pos in self.grid.positions().collect::<Vec<_>>() {
            let cell = match self.grid.get(pos) {
                Cell::Collectible(mut c) => {
                    c.active = c.stage == current;
                    Cell::Collectible(c)
                }
                Cell::Pursuer {
                    tier,
                    covered: Some(mut c),
                } => {
                    c.active = c.stage == current;
                    Cell::Pursuer {
                        tier,
                        covered: Some(c),
                    }
                }
                _ => continue,
            };
            if let Some(c) = cell.collectible().filter(|c| c.active) {
                self.target = Some(c.symbol);
            }
            self.grid.set(pos, cell);
        }
    }

    /// Orthogonal neighbors of `pos` the player could step onto without
    /// hitting a wall or a pursuer.
    pub fn reachable_neighbors(&self, pos: Pos) -> Vec<Pos> {
        Dir::ALL
            .iter()
            .filter_map(|dir| self.grid.step(pos, *dir))
            .filter(|p| {
                let cell = self.grid.get(*p);
                !cell.is_wall() && !cell.is_pursuer()
            })
            .collect()
    }
}
