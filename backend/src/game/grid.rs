use rand::Rng;

use crate::{
    game::GameError,
    models::{Direction, Grid, Position},
    utils::letters::{is_puzzle_word, random_letter},
};

/// Default side length of a puzzle grid
pub const DEFAULT_GRID_SIZE: usize = 8;
/// Random (direction, start) samples tried per word before giving up
pub const DEFAULT_MAX_PLACEMENT_ATTEMPTS: usize = 10_000;

/// A candidate spot for one word. Only lives while the grid is being built.
#[derive(Debug, Clone, Copy)]
struct Placement<'a> {
    word: &'a [char],
    start: Position,
    direction: Direction,
}

impl Placement<'_> {
    /// Cells the word would occupy, or None if it runs off the grid
    fn cells(&self, size: usize) -> Option<Vec<Position>> {
        (0..self.word.len())
            .map(|i| self.direction.offset(self.start, i, size))
            .collect()
    }
}

/// Grid under construction. Flat row-major storage, `None` marks an empty cell.
struct Draft {
    size: usize,
    cells: Vec<Option<char>>,
}

impl Draft {
    fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    #[inline]
    fn index(&self, pos: Position) -> usize {
        pos.row * self.size + pos.col
    }

    fn get(&self, pos: Position) -> Option<char> {
        self.cells[self.index(pos)]
    }

    /// A placement fits when it stays on the grid and every cell it touches
    /// is empty or already holds the letter it needs (a crossing).
    fn fits(&self, placement: &Placement) -> Option<Vec<Position>> {
        let cells = placement.cells(self.size)?;
        let clear = cells
            .iter()
            .zip(placement.word)
            .all(|(pos, letter)| match self.get(*pos) {
                None => true,
                Some(existing) => existing == *letter,
            });

        clear.then_some(cells)
    }

    fn commit(&mut self, cells: &[Position], word: &[char]) {
        for (pos, letter) in cells.iter().zip(word) {
            let idx = self.index(*pos);
            self.cells[idx] = Some(*letter);
        }
    }

    fn fill<R: Rng + ?Sized>(self, rng: &mut R) -> Grid {
        let rows = self
            .cells
            .chunks(self.size)
            .map(|row| {
                row.iter()
                    .map(|cell| cell.unwrap_or_else(|| random_letter(rng)))
                    .collect()
            })
            .collect();

        Grid::from_rows(rows)
    }
}

pub struct GridGenerator {
    size: usize,
    max_attempts: usize,
}

impl GridGenerator {
    pub fn new(size: usize, max_attempts: usize) -> Self {
        Self { size, max_attempts }
    }

    /// Generate a new grid hiding every word, using the thread-local RNG
    pub fn generate(&self, words: &[String]) -> Result<Grid, GameError> {
        let mut rng = rand::rng();
        self.generate_with_rng(words, &mut rng)
    }

    /// Generate a new grid hiding every word.
    ///
    /// Words are placed in the order given by rejection sampling: a direction
    /// and a start cell are drawn uniformly until the word fits. Each word gets
    /// at most `max_attempts` draws. The remaining cells get uniform A-Z filler.
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        words: &[String],
        rng: &mut R,
    ) -> Result<Grid, GameError> {
        self.validate(words)?;

        let mut draft = Draft::new(self.size);

        for word in words {
            let letters: Vec<char> = word.chars().collect();
            let (placement, cells) = self.place_word(&draft, &letters, rng)?;
            draft.commit(&cells, placement.word);

            tracing::debug!(
                "Placed {} at ({}, {}) going {:?}",
                word,
                placement.start.row,
                placement.start.col,
                placement.direction
            );
        }

        Ok(draft.fill(rng))
    }

    /// Reject inputs that could never be laid out, before any cell is written
    fn validate(&self, words: &[String]) -> Result<(), GameError> {
        if self.size == 0 {
            return Err(GameError::Configuration(
                "grid size must be at least 1".to_string(),
            ));
        }

        if words.is_empty() {
            return Err(GameError::Configuration("word list is empty".to_string()));
        }

        if let Some(word) = words.iter().find(|w| !is_puzzle_word(w)) {
            return Err(GameError::Configuration(format!(
                "'{}' must be one or more uppercase letters A-Z",
                word
            )));
        }

        if let Some(word) = words.iter().find(|w| w.len() > self.size) {
            return Err(GameError::Configuration(format!(
                "'{}' has {} letters but the grid is only {}x{}",
                word,
                word.len(),
                self.size,
                self.size
            )));
        }

        Ok(())
    }

    fn place_word<'a, R: Rng + ?Sized>(
        &self,
        draft: &Draft,
        word: &'a [char],
        rng: &mut R,
    ) -> Result<(Placement<'a>, Vec<Position>), GameError> {
        for _ in 0..self.max_attempts {
            let placement = Placement {
                word,
                start: Position::new(
                    rng.random_range(0..self.size),
                    rng.random_range(0..self.size),
                ),
                direction: Direction::ALL[rng.random_range(0..Direction::ALL.len())],
            };

            if let Some(cells) = draft.fits(&placement) {
                return Ok((placement, cells));
            }
        }

        Err(GameError::ImpossibleLayout {
            word: word.iter().collect(),
            attempts: self.max_attempts,
        })
    }
}
