pub mod game;

pub use game::{
    // Grid types
    Direction, Grid, Position,
    // Session views
    FoundWord, GameSnapshot, SelectionPhase,
};
