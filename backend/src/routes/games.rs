use crate::{
    game::{ClickOutcome, GameError},
    models::{GameSnapshot, Position},
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub struct NewGameRequest {
    /// Falls back to the configured default theme
    #[serde(default)]
    pub theme: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClickRequest {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Deserialize)]
pub struct SwitchThemeRequest {
    pub theme: String,
}

#[derive(Debug, Serialize)]
pub struct ClickResponse {
    pub outcome: ClickOutcome,
    pub game: GameSnapshot,
}

/// Map a game error onto the HTTP status the client sees
pub fn status_for(err: &GameError) -> StatusCode {
    match err {
        GameError::Configuration(_) | GameError::ImpossibleLayout { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        GameError::OutOfBounds { .. } => StatusCode::BAD_REQUEST,
        GameError::UnknownTheme(_) | GameError::SessionNotFound(_) => StatusCode::NOT_FOUND,
    }
}

fn reject(err: GameError) -> StatusCode {
    match err {
        GameError::Configuration(_) | GameError::ImpossibleLayout { .. } => {
            tracing::error!("Failed to generate puzzle: {}", err);
        }
        _ => tracing::warn!("Game request rejected: {}", err),
    }
    status_for(&err)
}

/// Start a new game on a freshly generated grid
pub async fn create_game(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewGameRequest>,
) -> Result<(StatusCode, Json<GameSnapshot>), StatusCode> {
    let snapshot = state
        .start_session(payload.theme.as_deref())
        .map_err(reject)?;

    Ok((StatusCode::CREATED, Json(snapshot)))
}

pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameSnapshot>, StatusCode> {
    state.snapshot(game_id).map(Json).map_err(reject)
}

/// Apply one cell click to the game's selection
pub async fn click_cell(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<Uuid>,
    Json(payload): Json<ClickRequest>,
) -> Result<Json<ClickResponse>, StatusCode> {
    let response = state
        .with_session(game_id, |session| {
            let outcome = session.click(Position::new(payload.row, payload.col))?;
            Ok(ClickResponse {
                outcome,
                game: session.snapshot(),
            })
        })
        .map_err(reject)?;

    Ok(Json(response))
}

pub async fn switch_theme(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<Uuid>,
    Json(payload): Json<SwitchThemeRequest>,
) -> Result<Json<GameSnapshot>, StatusCode> {
    state
        .switch_theme(game_id, &payload.theme)
        .map(Json)
        .map_err(reject)
}

/// Deselect everything without touching found words
pub async fn clear_selection(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameSnapshot>, StatusCode> {
    state
        .with_session(game_id, |session| {
            session.clear_selection();
            Ok(session.snapshot())
        })
        .map(Json)
        .map_err(reject)
}

pub async fn delete_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<Uuid>,
) -> StatusCode {
    if state.end_session(game_id) {
        tracing::info!("Ended game {}", game_id);
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
