// Puzzle engine: grid generation, selection matching and per-player sessions

pub mod error;
pub mod grid;
pub mod matcher;
pub mod session;

pub use error::GameError;
pub use grid::GridGenerator;
pub use matcher::{MatchOutcome, SelectionMatcher};
pub use session::{generate_grid, ClickOutcome, GameSession, GameSettings};
