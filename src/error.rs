use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("no maze of size {size} passed the reachability check in {attempts} attempts")]
    GenerationFailed { size: usize, attempts: usize },
    #[error("board size {size} is too small (minimum {min})", min = crate::maze::MIN_BOARD_SIZE)]
    InvalidBoardSize { size: usize },
}
