//! Tile grid and the slide/merge algorithm
//!
//! Every line (row or column) is compacted toward the move direction. Right
//! and Down walk their lines back to front, which is the same as reversing
//! the line, compacting it, and reversing it again.

use serde::{Deserialize, Serialize};

/// Swipe direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];
}

/// A grid cell as (row, col)
pub type Cell = (usize, usize);

/// A tile sliding (or merging) from one cell to another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileAnimation {
    pub value: u32,
    pub from: Cell,
    pub to: Cell,
    pub elapsed: f32,
    pub duration: f32,
}

impl TileAnimation {
    /// Advance; returns true once finished
    pub fn update(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        self.elapsed >= self.duration
    }

    /// Eased progress in [0, 1] (accelerate then decelerate)
    pub fn progress(&self) -> f32 {
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        (1.0 - (t * std::f32::consts::PI).cos()) / 2.0
    }
}

/// A freshly spawned tile popping in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnAnimation {
    pub value: u32,
    pub cell: Cell,
    pub elapsed: f32,
    pub duration: f32,
}

impl SpawnAnimation {
    /// Advance; returns true once finished
    pub fn update(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        self.elapsed >= self.duration
    }

    /// Render scale, 0.3 growing to 1.0
    pub fn scale(&self) -> f32 {
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        0.3 + 0.7 * (t * std::f32::consts::FRAC_PI_2).sin()
    }
}

/// One tile's travel inside a line (indices along the line)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMove {
    pub value: u32,
    pub from: usize,
    pub to: usize,
}

/// Result of compacting a single line toward index 0
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSlide {
    /// New line, zero padded to the input length
    pub values: Vec<u32>,
    pub moves: Vec<LineMove>,
    /// Sum of merged tile values
    pub gained: u64,
    pub merges: usize,
}

/// Compact a line toward index 0, merging each equal neighbour pair once.
pub fn slide_line(line: &[u32]) -> LineSlide {
    let tiles: Vec<(usize, u32)> = line
        .iter()
        .copied()
        .enumerate()
        .filter(|&(_, v)| v != 0)
        .collect();

    let mut values = Vec::with_capacity(line.len());
    let mut moves = Vec::new();
    let mut gained = 0u64;
    let mut merges = 0;

    let mut i = 0;
    while i < tiles.len() {
        let (from, value) = tiles[i];
        let to = values.len();
        match tiles.get(i + 1) {
            Some(&(from_next, next)) if next == value => {
                let merged = value * 2;
                values.push(merged);
                gained += merged as u64;
                merges += 1;
                // Both sources travel into the single destination slot
                moves.push(LineMove { value, from, to });
                moves.push(LineMove { value, from: from_next, to });
                i += 2;
            }
            _ => {
                values.push(value);
                if from != to {
                    moves.push(LineMove { value, from, to });
                }
                i += 1;
            }
        }
    }

    values.resize(line.len(), 0);
    LineSlide {
        values,
        moves,
        gained,
        merges,
    }
}

/// Outcome of shifting the whole board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Any cell changed value
    pub moved: bool,
    /// Score earned by merges
    pub gained: u64,
    pub merges: usize,
}

/// N x N tile grid plus its transient animations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<u32>,
    animations: Vec<TileAnimation>,
    spawns: Vec<SpawnAnimation>,
    move_duration: f32,
    spawn_duration: f32,
}

impl Board {
    pub fn new(size: usize) -> Self {
        Self::with_durations(size, 0.15, 0.25)
    }

    pub fn with_durations(size: usize, move_duration: f32, spawn_duration: f32) -> Self {
        assert!(size >= 2, "board must be at least 2x2");
        Self {
            size,
            cells: vec![0; size * size],
            animations: Vec::new(),
            spawns: Vec::new(),
            move_duration,
            spawn_duration,
        }
    }

    /// Build a board from rows (tests, restored games)
    pub fn from_rows(rows: &[Vec<u32>]) -> Self {
        let mut board = Self::new(rows.len());
        for (r, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), rows.len(), "board rows must be square");
            for (c, &value) in row.iter().enumerate() {
                board.set(r, c, value);
            }
        }
        board
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.size && col < self.size, "cell ({row}, {col}) out of bounds");
        row * self.size + col
    }

    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.cells[self.index(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, value: u32) {
        debug_assert!(value == 0 || value.is_power_of_two(), "tile {value} is not a power of two");
        let idx = self.index(row, col);
        self.cells[idx] = value;
    }

    /// Row-major cell values
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    pub fn rows(&self) -> Vec<Vec<u32>> {
        self.cells.chunks(self.size).map(|r| r.to_vec()).collect()
    }

    pub fn empty_cells(&self) -> Vec<Cell> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v == 0)
            .map(|(i, _)| (i / self.size, i % self.size))
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&v| v != 0)
    }

    pub fn contains(&self, value: u32) -> bool {
        self.cells.contains(&value)
    }

    /// Any horizontally or vertically adjacent pair shares a value
    pub fn has_adjacent_pair(&self) -> bool {
        let n = self.size;
        (0..n).any(|r| {
            (0..n).any(|c| {
                let v = self.get(r, c);
                (c + 1 < n && v == self.get(r, c + 1)) || (r + 1 < n && v == self.get(r + 1, c))
            })
        })
    }

    /// Cells of line `k` in processing order for `direction`
    fn line_cells(&self, direction: Direction, k: usize) -> Vec<Cell> {
        let n = self.size;
        match direction {
            Direction::Left => (0..n).map(|c| (k, c)).collect(),
            Direction::Right => (0..n).rev().map(|c| (k, c)).collect(),
            Direction::Up => (0..n).map(|r| (r, k)).collect(),
            Direction::Down => (0..n).rev().map(|r| (r, k)).collect(),
        }
    }

    /// Slide every line toward `direction`, recording animations
    pub fn shift(&mut self, direction: Direction) -> MoveOutcome {
        let mut outcome = MoveOutcome::default();

        for k in 0..self.size {
            let cells = self.line_cells(direction, k);
            let line: Vec<u32> = cells.iter().map(|&(r, c)| self.get(r, c)).collect();
            let slide = slide_line(&line);

            for (&(r, c), &value) in cells.iter().zip(&slide.values) {
                if self.get(r, c) != value {
                    outcome.moved = true;
                    self.set(r, c, value);
                }
            }

            for m in &slide.moves {
                self.animations.push(TileAnimation {
                    value: m.value,
                    from: cells[m.from],
                    to: cells[m.to],
                    elapsed: 0.0,
                    duration: self.move_duration,
                });
            }

            outcome.gained += slide.gained;
            outcome.merges += slide.merges;
        }

        outcome
    }

    /// Place a tile and start its pop-in animation
    pub fn place_spawn(&mut self, cell: Cell, value: u32) {
        self.set(cell.0, cell.1, value);
        self.spawns.push(SpawnAnimation {
            value,
            cell,
            elapsed: 0.0,
            duration: self.spawn_duration,
        });
    }

    /// Advance animations, dropping the finished ones
    pub fn update(&mut self, dt: f32) {
        self.animations.retain_mut(|a| !a.update(dt));
        self.spawns.retain_mut(|s| !s.update(dt));
    }

    pub fn animations(&self) -> &[TileAnimation] {
        &self.animations
    }

    pub fn spawn_animations(&self) -> &[SpawnAnimation] {
        &self.spawns
    }

    /// Empty the grid and drop all animations
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|v| *v = 0);
        self.animations.clear();
        self.spawns.clear();
    }
}
