use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The word list or grid size can never produce a puzzle
    #[error("invalid puzzle configuration: {0}")]
    Configuration(String),

    /// Earlier placements boxed the word in. Generating again may succeed.
    #[error("could not place '{word}' after {attempts} attempts")]
    ImpossibleLayout { word: String, attempts: usize },

    #[error("cell ({row}, {col}) is outside the {size}x{size} grid")]
    OutOfBounds { row: usize, col: usize, size: usize },

    #[error("unknown theme '{0}'")]
    UnknownTheme(String),

    #[error("game session {0} not found")]
    SessionNotFound(Uuid),
}
