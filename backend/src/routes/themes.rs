use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ThemeResponse {
    pub name: String,
    pub words: Vec<String>,
}

/// List every theme a new game can be started with
pub async fn list_themes(State(state): State<Arc<AppState>>) -> Json<Vec<ThemeResponse>> {
    Json(
        state
            .themes
            .iter()
            .map(|(name, words)| ThemeResponse {
                name: name.to_string(),
                words: words.to_vec(),
            })
            .collect(),
    )
}
