//! Puzzle game manager: moves, spawns, win/lose latches, score

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::board::{Board, Direction, SpawnAnimation, TileAnimation};
use crate::audio::SoundEffect;
use crate::settings::PuzzleSettings;
use crate::{GameCore, clamp_dt};

/// Storage key for the puzzle high score
pub const HIGH_SCORE_KEY: &str = "puzzle_high_score";

/// What the renderer needs to draw one puzzle frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleSnapshot {
    pub size: usize,
    /// Row-major tile values (0 = empty)
    pub cells: Vec<u32>,
    pub moves: Vec<TileAnimation>,
    pub spawns: Vec<SpawnAnimation>,
    pub score: u64,
    pub high_score: u64,
    pub has_won: bool,
    pub has_lost: bool,
}

/// Drives move/merge/spawn/win/lose on top of a `Board`
#[derive(Debug, Clone)]
pub struct GameManager {
    board: Board,
    settings: PuzzleSettings,
    rng: Pcg32,
    score: u64,
    high_score: u64,
    /// Set by a move that changed the grid; consumed by the next tick
    is_moved: bool,
    has_won: bool,
    has_lost: bool,
    paused: bool,
    sounds: Vec<SoundEffect>,
}

impl GameManager {
    /// Start a new game with the given seed
    pub fn new(settings: PuzzleSettings, seed: u64) -> Self {
        let settings = settings.sanitized();
        let board = Board::with_durations(
            settings.board_size,
            settings.move_anim_duration,
            settings.spawn_anim_duration,
        );
        let mut manager = Self {
            board,
            settings,
            rng: Pcg32::seed_from_u64(seed),
            score: 0,
            high_score: 0,
            is_moved: false,
            has_won: false,
            has_lost: false,
            paused: false,
            sounds: Vec::new(),
        };
        manager.spawn_starting_tiles();
        manager
    }

    /// Wrap an existing board (tests, restored games); no tiles are spawned
    pub fn with_board(board: Board, settings: PuzzleSettings, seed: u64) -> Self {
        Self {
            board,
            settings: settings.sanitized(),
            rng: Pcg32::seed_from_u64(seed),
            score: 0,
            high_score: 0,
            is_moved: false,
            has_won: false,
            has_lost: false,
            paused: false,
            sounds: Vec::new(),
        }
    }

    fn spawn_starting_tiles(&mut self) {
        for _ in 0..self.settings.starting_tiles {
            self.spawn_tile();
        }
    }

    /// Reset grid, score and latches; the high score carries over
    pub fn new_game(&mut self) {
        self.board.clear();
        self.score = 0;
        self.is_moved = false;
        self.has_won = false;
        self.has_lost = false;
        self.sounds.clear();
        self.spawn_starting_tiles();
        log::info!("Puzzle: new game (best {})", self.high_score);
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn is_moved(&self) -> bool {
        self.is_moved
    }

    pub fn has_won(&self) -> bool {
        self.has_won
    }

    pub fn has_lost(&self) -> bool {
        self.has_lost
    }

    /// Slide the board. Returns whether anything moved.
    pub fn make_move(&mut self, direction: Direction) -> bool {
        if self.has_won || self.has_lost {
            return false;
        }

        let outcome = self.board.shift(direction);
        self.score += outcome.gained;
        self.is_moved = outcome.moved;

        if outcome.merges > 0 {
            self.sounds.push(SoundEffect::TileMerge);
        } else if outcome.moved {
            self.sounds.push(SoundEffect::TileSlide);
        }
        outcome.moved
    }

    /// Drop a 2 (90%) or 4 (10%) into a random empty cell; no-op when full or finished
    pub fn spawn_tile(&mut self) {
        if self.has_won || self.has_lost {
            return;
        }
        let empty = self.board.empty_cells();
        if empty.is_empty() {
            return;
        }
        let cell = empty[self.rng.random_range(0..empty.len())];
        let value = if self.rng.random_bool(self.settings.four_chance) {
            4
        } else {
            2
        };
        self.board.place_spawn(cell, value);
    }

    fn check_win(&mut self) {
        if self.has_won {
            return;
        }
        if self.board.contains(self.settings.win_value) {
            self.has_won = true;
            self.sounds.push(SoundEffect::Win);
            log::info!("Puzzle: reached {} with score {}", self.settings.win_value, self.score);
        }
    }

    fn check_lose(&mut self) {
        if self.has_lost || self.has_won {
            return;
        }
        if self.board.is_full() && !self.board.has_adjacent_pair() {
            self.has_lost = true;
            self.sounds.push(SoundEffect::GameOver);
            log::info!("Puzzle: no moves left, final score {}", self.score);
        }
    }

    /// Post-move logic pass: spawn, win/lose checks, high score
    fn resolve_move(&mut self) {
        self.spawn_tile();
        self.check_win();
        self.check_lose();
        self.is_moved = false;

        if self.score > self.high_score {
            self.high_score = self.score;
        }
    }
}

impl GameCore for GameManager {
    type Input = Direction;
    type Snapshot = PuzzleSnapshot;

    fn tick(&mut self, dt: f32) {
        if self.paused {
            return;
        }
        self.board.update(clamp_dt(dt));
        if self.is_moved {
            self.resolve_move();
        }
    }

    fn handle_input(&mut self, input: Direction) {
        if self.paused {
            return;
        }
        self.make_move(input);
    }

    fn renderables(&self) -> PuzzleSnapshot {
        PuzzleSnapshot {
            size: self.board.size(),
            cells: self.board.cells().to_vec(),
            moves: self.board.animations().to_vec(),
            spawns: self.board.spawn_animations().to_vec(),
            score: self.score,
            high_score: self.high_score,
            has_won: self.has_won,
            has_lost: self.has_lost,
        }
    }

    fn is_game_over(&self) -> bool {
        self.has_lost
    }

    fn is_won(&self) -> bool {
        self.has_won
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn high_score(&self) -> u64 {
        self.high_score
    }

    fn restore_high_score(&mut self, high_score: u64) {
        self.high_score = self.high_score.max(high_score);
    }

    fn high_score_key(&self) -> &'static str {
        HIGH_SCORE_KEY
    }

    fn drain_sounds(&mut self) -> Vec<SoundEffect> {
        std::mem::take(&mut self.sounds)
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }
}
