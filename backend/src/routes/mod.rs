pub mod games;
pub mod health;
pub mod themes;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes())
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/themes", get(themes::list_themes))
        .route("/games", post(games::create_game))
        .route(
            "/games/{game_id}",
            get(games::get_game).delete(games::delete_game),
        )
        .route("/games/{game_id}/click", post(games::click_cell))
        .route("/games/{game_id}/theme", post(games::switch_theme))
        .route("/games/{game_id}/clear", post(games::clear_selection))
}
