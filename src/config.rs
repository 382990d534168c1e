use std::time::Duration;

use crate::error::GameError;
use crate::maze::MIN_BOARD_SIZE;

pub const DEFAULT_BOARD_SIZE: usize = 15;
pub const DEFAULT_TICK_MS: u64 = 500;
pub const DEFAULT_HINT_DELAY_MS: u64 = 30_000;
pub const DEFAULT_RENDER_FPS: u64 = 60;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub board_size: usize,
    /// Pursuer step cadence.
    pub tick_ms: u64,
    /// Delay after a pickup before the next target is hinted.
    pub hint_delay_ms: u64,
    pub render_fps: u64,
    /// Fixed RNG seed; a random one is drawn when unset.
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            tick_ms: DEFAULT_TICK_MS,
            hint_delay_ms: DEFAULT_HINT_DELAY_MS,
            render_fps: DEFAULT_RENDER_FPS,
            seed: None,
        }
    }
}

impl Settings {
    /// Overrides defaults from `STROKE_MAZE_*` variables. Unparseable or
    /// non-positive values fall back to the default.
    pub fn from_env() -> Self {
        let var = |key: &str| std::env::var(key).ok();
        let defaults = Self::default();
        Self {
            board_size: positive(var("STROKE_MAZE_BOARD_SIZE"))
                .map(|v| v as usize)
                .unwrap_or(defaults.board_size),
            tick_ms: positive(var("STROKE_MAZE_TICK_MS")).unwrap_or(defaults.tick_ms),
            hint_delay_ms: positive(var("STROKE_MAZE_HINT_MS")).unwrap_or(defaults.hint_delay_ms),
            render_fps: positive(var("STROKE_MAZE_FPS")).unwrap_or(defaults.render_fps),
            seed: var("STROKE_MAZE_SEED").and_then(|v| v.trim().parse().ok()),
        }
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.board_size < MIN_BOARD_SIZE {
            return Err(GameError::InvalidBoardSize {
                size: self.board_size,
            });
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    pub fn hint_delay(&self) -> Duration {
        Duration::from_millis(self.hint_delay_ms)
    }

    pub fn frame_time(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.render_fps.max(1))
    }
}

fn positive(value: Option<String>) -> Option<u64> {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_filters_junk_and_zero() {
        assert_eq!(positive(Some("250".into())), Some(250));
        assert_eq!(positive(Some(" 40 ".into())), Some(40));
        assert_eq!(positive(Some("0".into())), None);
        assert_eq!(positive(Some("-3".into())), None);
        assert_eq!(positive(Some("fast".into())), None);
        assert_eq!(positive(None), None);
    }

    #[test]
    fn validate_rejects_small_boards() {
        let settings = Settings {
            board_size: 5,
            ..Settings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(GameError::InvalidBoardSize { size: 5 })
        );
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn durations_follow_settings() {
        let settings = Settings::default();
        assert_eq!(settings.tick_interval(), Duration::from_millis(500));
        assert_eq!(settings.hint_delay(), Duration::from_secs(30));
        let zero = Settings {
            render_fps: 0,
            ..Settings::default()
        };
        assert_eq!(zero.frame_time(), Duration::from_secs(1));
    }
}
