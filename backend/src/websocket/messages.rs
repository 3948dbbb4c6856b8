use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{GameSnapshot, Position};

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    NewGame {
        #[serde(default)]
        theme: Option<String>,
    },
    ResumeGame {
        game_id: Uuid,
    },
    ClickCell {
        row: usize,
        col: usize,
    },
    SwitchTheme {
        theme: String,
    },
    ClearSelection,
    LeaveGame,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    GameState {
        game: GameSnapshot,
    },
    SelectionPending {
        selection: Vec<Position>,
    },
    WordFound {
        word: String,
        cells: Vec<Position>,
        newly_found: bool,
        game: GameSnapshot,
    },
    PuzzleComplete {
        game_id: Uuid,
    },
    LeftGame {
        game_id: Uuid,
    },
    Error {
        message: String,
    },
}
