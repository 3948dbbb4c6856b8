use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    config::GameConfig,
    game::{
        grid::{DEFAULT_GRID_SIZE, DEFAULT_MAX_PLACEMENT_ATTEMPTS},
        GameError, GridGenerator, MatchOutcome, SelectionMatcher,
    },
    models::{FoundWord, GameSnapshot, Grid, Position, SelectionPhase},
};

/// Knobs for building a session's grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSettings {
    pub grid_size: usize,
    pub max_placement_attempts: usize,
    /// Extra whole-grid regenerations allowed after the first layout boxes
    /// itself in
    pub generation_retries: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            max_placement_attempts: DEFAULT_MAX_PLACEMENT_ATTEMPTS,
            generation_retries: 3,
        }
    }
}

impl From<&GameConfig> for GameSettings {
    fn from(config: &GameConfig) -> Self {
        Self {
            grid_size: config.grid_size,
            max_placement_attempts: config.max_placement_attempts,
            generation_retries: config.generation_retries,
        }
    }
}

/// Where the player is in spelling a word.
///
/// `Idle --click--> Selecting --click--> Matched (back to Idle) | Pending (stay Selecting)`.
/// Only a match (or an explicit clear) returns to `Idle`.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SelectionState {
    Idle,
    Selecting(Vec<Position>),
}

/// What a single click did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClickOutcome {
    /// The selection grew but does not spell a target word yet
    Pending { selection: Vec<Position> },
    /// The selection spelled a target word and was cleared
    Matched {
        word: String,
        cells: Vec<Position>,
        newly_found: bool,
    },
}

/// One player's puzzle: the grid, the words hidden in it, and their progress.
/// Sessions share nothing with each other.
#[derive(Debug)]
pub struct GameSession {
    pub id: Uuid,
    theme: String,
    words: Vec<String>,
    grid: Grid,
    matcher: SelectionMatcher,
    state: SelectionState,
    found: Vec<FoundWord>,
    settings: GameSettings,
    pub created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_active: Instant,
}

impl GameSession {
    /// Start a session on a freshly generated grid
    pub fn new(
        theme: impl Into<String>,
        words: Vec<String>,
        settings: GameSettings,
    ) -> Result<Self, GameError> {
        let grid = generate_grid(&words, &settings)?;
        tracing::debug!("Generated grid:\n{}", grid);
        Ok(Self::from_grid(theme, words, grid, settings))
    }

    /// Start a session on an existing grid
    pub(crate) fn from_grid(
        theme: impl Into<String>,
        words: Vec<String>,
        grid: Grid,
        settings: GameSettings,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            theme: theme.into(),
            matcher: SelectionMatcher::new(words.iter().cloned()),
            words,
            grid,
            state: SelectionState::Idle,
            found: Vec::new(),
            settings,
            created_at: now,
            updated_at: now,
            last_active: Instant::now(),
        }
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn found_words(&self) -> &[FoundWord] {
        &self.found
    }

    pub fn selection(&self) -> &[Position] {
        match &self.state {
            SelectionState::Idle => &[],
            SelectionState::Selecting(cells) => cells.as_slice(),
        }
    }

    pub fn is_found(&self, word: &str) -> bool {
        self.found.iter().any(|f| f.word == word)
    }

    /// Target words the player has not found yet, in list order
    pub fn remaining_words(&self) -> Vec<&str> {
        self.words
            .iter()
            .filter(|w| !self.is_found(w))
            .map(String::as_str)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.words.iter().all(|w| self.is_found(w))
    }

    /// Handle a click on `pos`.
    ///
    /// The cell is appended to the selection. Once it holds two or more
    /// cells, a selection spelling a target word is recorded as found and
    /// cleared; anything else is kept for the next click.
    pub fn click(&mut self, pos: Position) -> Result<ClickOutcome, GameError> {
        if !self.grid.contains(pos) {
            return Err(GameError::OutOfBounds {
                row: pos.row,
                col: pos.col,
                size: self.grid.size(),
            });
        }

        self.touch();

        let selection = match std::mem::replace(&mut self.state, SelectionState::Idle) {
            SelectionState::Idle => Vec::new(),
            SelectionState::Selecting(cells) => cells,
        };
        let selection = SelectionMatcher::extend(selection, pos);

        match self.matcher.resolve(&self.grid, &selection) {
            MatchOutcome::Matched(word) => {
                let newly_found = self.record_found(&word, &selection);
                tracing::debug!(
                    "Session {} matched {} (new: {})",
                    self.id,
                    word,
                    newly_found
                );
                Ok(ClickOutcome::Matched {
                    word,
                    cells: selection,
                    newly_found,
                })
            }
            MatchOutcome::NoMatchYet => {
                self.state = SelectionState::Selecting(selection.clone());
                Ok(ClickOutcome::Pending { selection })
            }
        }
    }

    /// Drop the current selection. This is an explicit player action; nothing
    /// clears a selection on its own.
    pub fn clear_selection(&mut self) {
        self.touch();
        self.state = SelectionState::Idle;
    }

    /// True when `theme` with `words` is the puzzle already in play
    pub fn is_current_puzzle(&self, theme: &str, words: &[String]) -> bool {
        self.theme == theme && self.words == words
    }

    /// Swap in a new word list on an already generated grid, resetting
    /// selection and found words
    pub fn replace_puzzle(&mut self, theme: String, words: Vec<String>, grid: Grid) {
        self.touch();
        self.theme = theme;
        self.matcher = SelectionMatcher::new(words.iter().cloned());
        self.words = words;
        self.grid = grid;
        self.state = SelectionState::Idle;
        self.found.clear();
    }

    /// True when nobody has touched the session for longer than `timeout`
    pub fn is_idle_for(&self, timeout: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.last_active) > timeout
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            game_id: self.id,
            theme: self.theme.clone(),
            size: self.grid.size(),
            grid: self.grid().clone(),
            words: self.words().to_vec(),
            found_words: self.found_words().to_vec(),
            remaining_words: self.remaining_words().into_iter().map(String::from).collect(),
            selection: self.selection().to_vec(),
            phase: match self.state {
                SelectionState::Idle => SelectionPhase::Idle,
                SelectionState::Selecting(_) => SelectionPhase::Selecting,
            },
            complete: self.is_complete(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    fn record_found(&mut self, word: &str, cells: &[Position]) -> bool {
        if self.is_found(word) {
            return false;
        }

        self.found.push(FoundWord {
            word: word.to_string(),
            cells: cells.to_vec(),
        });
        true
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.last_active = Instant::now();
    }
}

/// Generate a grid, starting over from an empty grid when a layout runs out
/// of placement attempts. Configuration errors are returned immediately.
pub fn generate_grid(words: &[String], settings: &GameSettings) -> Result<Grid, GameError> {
    let generator = GridGenerator::new(settings.grid_size, settings.max_placement_attempts);
    retry_layout(settings.generation_retries, || generator.generate(words))
}

/// Run `generate` once, plus up to `retries` more times while it reports an
/// impossible layout
fn retry_layout(
    retries: usize,
    mut generate: impl FnMut() -> Result<Grid, GameError>,
) -> Result<Grid, GameError> {
    let mut retried = 0;

    loop {
        match generate() {
            Err(GameError::ImpossibleLayout { word, attempts }) if retried < retries => {
                retried += 1;
                tracing::warn!(
                    "Could not place {} after {} tries, regenerating ({}/{})",
                    word,
                    attempts,
                    retried,
                    retries
                );
            }
            result => return result,
        }
    }
}
