//! Sliding tile puzzle (2048 rules)
//!
//! `Board` owns the grid and computes slides; `GameManager` layers spawning,
//! scoring and the win/lose latches on top and implements `GameCore`.

pub mod board;
pub mod manager;

pub use board::{
    Board, Cell, Direction, LineMove, LineSlide, MoveOutcome, SpawnAnimation, TileAnimation,
    slide_line,
};
pub use manager::{GameManager, HIGH_SCORE_KEY, PuzzleSnapshot};
