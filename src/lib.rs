//! Stroke maze: collect kanji in stroke order through a generated maze while
//! pursuers close in.
//!
//! - `maze`: symmetric generation and the reachability check
//! - `placement`: collectible and pursuer spawning
//! - `state`: per-level grid, progress and player moves
//! - `pursuer`: the timed pursuer step
//! - `session`: level lifecycle, tick cadence and the hint timer

pub mod catalog;
pub mod config;
pub mod error;
pub mod grid;
pub mod maze;
pub mod placement;
pub mod pursuer;
pub mod session;
pub mod state;

pub use catalog::OrderSequence;
pub use config::Settings;
pub use error::GameError;
pub use grid::{Cell, Collectible, Dir, Grid, Pos, SpeedTier, SPAWN};
pub use pursuer::Pursuer;
pub use session::{Clock, HintTimer, ManualClock, SessionController, Snapshot, SystemClock};
pub use state::{GameState, MoveOutcome, Phase, Progress};
