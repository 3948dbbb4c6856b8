use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A cell coordinate on the grid, zero-based from the top-left corner
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialEq)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// The four directions a word may run in. Words are always read forwards
/// along one of these, so a puzzle never hides a word backwards or upwards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Right,
    Down,
    DiagonalDownRight,
    DiagonalDownLeft,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::DiagonalDownRight,
        Direction::DiagonalDownLeft,
    ];

    /// Unit step as (row delta, column delta)
    pub fn step(self) -> (isize, isize) {
        match self {
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::DiagonalDownRight => (1, 1),
            Direction::DiagonalDownLeft => (1, -1),
        }
    }

    /// Cell reached after `distance` steps from `start`, or None once the walk
    /// leaves a `size` x `size` grid.
    pub fn offset(self, start: Position, distance: usize, size: usize) -> Option<Position> {
        let (dr, dc) = self.step();
        let distance = distance as isize;
        let row = start.row as isize + dr * distance;
        let col = start.col as isize + dc * distance;

        if row < 0 || col < 0 || row >= size as isize || col >= size as isize {
            return None;
        }

        Some(Position::new(row as usize, col as usize))
    }
}

/// A finished square letter grid. Only the generator builds one, and it is
/// read-only afterwards: a new word list always gets a brand new grid.
#[derive(Debug, Clone, Serialize, Eq, PartialEq)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Vec<char>>,
}

impl Grid {
    pub(crate) fn from_rows(rows: Vec<Vec<char>>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == rows.len()));
        Self { rows }
    }

    /// Side length of the grid
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.size() && pos.col < self.size()
    }

    pub fn letter_at(&self, pos: Position) -> Option<char> {
        self.rows.get(pos.row).and_then(|row| row.get(pos.col)).copied()
    }

    pub fn rows(&self) -> &[Vec<char>] {
        &self.rows
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line: Vec<String> = row.iter().map(char::to_string).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// A word the player has matched, with the cells they selected for it
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct FoundWord {
    pub word: String,
    pub cells: Vec<Position>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPhase {
    Idle,
    Selecting,
}

/// Everything the UI needs to draw a session
#[derive(Debug, Clone, Serialize)]
pub struct GameSnapshot {
    pub game_id: Uuid,
    pub theme: String,
    pub size: usize,
    pub grid: Grid,
    pub words: Vec<String>,
    pub found_words: Vec<FoundWord>,
    pub remaining_words: Vec<String>,
    pub selection: Vec<Position>,
    pub phase: SelectionPhase,
    pub complete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
