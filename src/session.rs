//! Level lifecycle plus the two timers that drive state between inputs: the
//! pursuer tick and the hint deadline.

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::catalog::OrderSequence;
use crate::config::Settings;
use crate::error::GameError;
use crate::grid::{Cell, Dir, Grid, Pos, SPAWN};
use crate::maze;
use crate::placement::{place_collectibles, place_pursuers};
use crate::pursuer::{self, Pursuer};
use crate::state::{GameState, MoveOutcome, Phase};

/// Ticks replayed in one `update` after a stall; the rest are dropped.
pub const MAX_CATCHUP_TICKS: u32 = 4;

/// Monotonic time since some fixed epoch.
pub trait Clock {
    fn now(&self) -> Duration;
}

pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Virtual clock advanced by hand.
#[derive(Default)]
pub struct ManualClock {
    now: std::cell::Cell<Duration>,
}

impl ManualClock {
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HintTimer {
    deadline: Option<Duration>,
    visible: bool,
}

impl HintTimer {
    /// Hides the hint until `now + delay`.
    pub fn arm(&mut self, now: Duration, delay: Duration) {
        self.deadline = Some(now + delay);
        self.visible = false;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Returns true on the call that reveals the hint.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.visible = true;
                true
            }
            _ => false,
        }
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Whole seconds left before the hint shows, rounded up.
    pub fn countdown_secs(&self, now: Duration) -> Option<u64> {
        self.deadline
            .map(|d| d.saturating_sub(now).as_millis().div_ceil(1000) as u64)
    }
}

/// Read-only view handed to the frontend.
#[derive(Debug)]
pub struct Snapshot<'a> {
    pub grid: &'a Grid,
    pub player: Pos,
    pub pursuers: &'a [Pursuer],
    pub phase: Phase,
    pub current_stage: u32,
    pub remaining: u32,
    pub score: u32,
    pub level: u32,
    pub target: Option<char>,
    pub stages_cleared: u32,
    pub hint_visible: bool,
    pub hint_deadline: Option<Duration>,
    pub hint_countdown_secs: Option<u64>,
    pub highlights: Vec<Pos>,
}

impl Snapshot<'_> {
    /// True for the current-stage collectible once its hint is showing.
    pub fn is_hinted(&self, cell: &Cell) -> bool {
        self.hint_visible
            && matches!(cell, Cell::Collectible(c) if c.stage == self.current_stage)
    }
}

pub struct SessionController<C: Clock = SystemClock> {
    settings: Settings,
    catalog: OrderSequence,
    clock: C,
    rng: ChaCha8Rng,
    seed: u64,
    state: GameState,
    hint: HintTimer,
    next_tick: Duration,
}

impl<C: Clock> SessionController<C> {
    /// Validates `settings` and starts level 1.
    pub fn new(settings: Settings, clock: C) -> Result<Self, GameError> {
        settings.validate()?;
        let seed = settings.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let catalog = OrderSequence::default();
        let state = build_level(&settings, &catalog, &mut rng, 1, 0)?;
        let next_tick = clock.now() + settings.tick_interval();
        log::info!("session seeded with {seed}");
        Ok(Self {
            settings,
            catalog,
            clock,
            rng,
            seed,
            state,
            hint: HintTimer::default(),
            next_tick,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn hint(&self) -> &HintTimer {
        &self.hint
    }

    /// Replaces the current level with a fresh one at `level`, keeping score.
    pub fn start_level(&mut self, level: u32) -> Result<(), GameError> {
        let score = self.state.progress().score;
        self.begin(level, score)
    }

    pub fn restart(&mut self) -> Result<(), GameError> {
        self.begin(1, 0)
    }

    pub fn next_level(&mut self) -> Result<(), GameError> {
        let progress = self.state.progress();
        self.begin(progress.level + 1, progress.score)
    }

    fn begin(&mut self, level: u32, score: u32) -> Result<(), GameError> {
        self.state = build_level(&self.settings, &self.catalog, &mut self.rng, level, score)?;
        self.hint.clear();
        self.next_tick = self.clock.now() + self.settings.tick_interval();
        Ok(())
    }

    /// Applies a directional input. Arms the hint timer after a pickup.
    pub fn handle_input(&mut self, dir: Dir) -> MoveOutcome {
        let outcome = self.state.attempt_move(dir);
        match outcome {
            MoveOutcome::Collected => self
                .hint
                .arm(self.clock.now(), self.settings.hint_delay()),
            MoveOutcome::Won | MoveOutcome::Lost => self.hint.clear(),
            MoveOutcome::Moved | MoveOutcome::Rejected => {}
        }
        outcome
    }

    /// Runs pursuer ticks that have come due and checks the hint deadline.
    /// Returns the last tick outcome, or `None` if no tick ran.
    pub fn update(&mut self) -> Option<MoveOutcome> {
        if self.state.is_terminal() {
            return None;
        }
        let now = self.clock.now();
        let interval = self.settings.tick_interval();
        let mut last = None;
        let mut ran = 0;
        while now >= self.next_tick && ran < MAX_CATCHUP_TICKS {
            self.next_tick += interval;
            ran += 1;
            let outcome = pursuer::tick(&mut self.state, &mut self.rng);
            last = Some(outcome);
            if outcome == MoveOutcome::Lost {
                self.hint.clear();
                return last;
            }
        }
        if now >= self.next_tick {
            self.next_tick = now + interval;
        }
        if self.hint.poll(now) {
            log::debug!("hint shown for stage {}", self.state.progress().current_stage);
        }
        last
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        let progress = self.state.progress();
        let now = self.clock.now();
        Snapshot {
            grid: self.state.grid(),
            player: self.state.player(),
            pursuers: self.state.pursuers(),
            phase: self.state.phase(),
            current_stage: progress.current_stage,
            remaining: progress.remaining,
            score: progress.score,
            level: progress.level,
            target: self.state.target(),
            stages_cleared: self.state.stages_cleared(),
            hint_visible: self.hint.visible(),
            hint_deadline: self.hint.deadline(),
            hint_countdown_secs: self.hint.countdown_secs(now),
            highlights: self.state.reachable_neighbors(self.state.player()),
        }
    }
}

fn build_level(
    settings: &Settings,
    catalog: &OrderSequence,
    rng: &mut ChaCha8Rng,
    level: u32,
    score: u32,
) -> Result<GameState, GameError> {
    let mut grid = maze::generate(settings.board_size, rng)?;
    let max_stage = catalog.max_stage_for_level(level);
    let placed = place_collectibles(&mut grid, catalog, max_stage, rng);
    let pursuers = place_pursuers(&mut grid, SPAWN, level, rng);
    log::info!(
        "level {level}: {} collectibles, {} pursuers, score {score}",
        placed.len(),
        pursuers.len()
    );
    Ok(GameState::new(grid, SPAWN, pursuers, level, score))
}
