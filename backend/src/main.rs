mod config;
mod game;
mod models;
mod routes;
mod themes;
mod utils;
mod websocket;

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Result;
use axum::{routing::get, Router};
use config::Config;
use dashmap::DashMap;
use game::{generate_grid, GameError, GameSession, GameSettings};
use models::GameSnapshot;
use themes::ThemeCatalog;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// How often idle sessions are swept
pub const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(15);

/// Application state shared across all handlers
pub struct AppState {
    pub config: Config,
    pub themes: ThemeCatalog,
    /// Live puzzles keyed by game id. Each entry is one player's isolated session.
    pub sessions: DashMap<Uuid, GameSession>,
}

impl AppState {
    pub fn new(config: Config, themes: ThemeCatalog) -> Self {
        Self {
            config,
            themes,
            sessions: DashMap::new(),
        }
    }

    pub fn settings(&self) -> GameSettings {
        GameSettings::from(&self.config.game)
    }

    /// Resolve a theme name (or the configured default) to its word list
    pub fn theme_words(&self, theme: Option<&str>) -> Result<(String, Vec<String>), GameError> {
        let name = theme
            .map(|t| t.trim().to_lowercase())
            .unwrap_or_else(|| self.config.game.default_theme.clone());

        self.themes
            .get(&name)
            .map(|words| (name.clone(), words.to_vec()))
            .ok_or(GameError::UnknownTheme(name))
    }

    /// Create a new session and return its first snapshot
    pub fn start_session(&self, theme: Option<&str>) -> Result<GameSnapshot, GameError> {
        let (theme, words) = self.theme_words(theme)?;
        let session = GameSession::new(theme, words, self.settings())?;
        let snapshot = session.snapshot();

        tracing::info!(
            "Started game {} with theme {} ({} words)",
            session.id,
            session.theme(),
            session.words().len()
        );
        self.sessions.insert(session.id, session);

        Ok(snapshot)
    }

    pub fn snapshot(&self, game_id: Uuid) -> Result<GameSnapshot, GameError> {
        self.sessions
            .get(&game_id)
            .map(|session| session.snapshot())
            .ok_or(GameError::SessionNotFound(game_id))
    }

    /// Run `f` against one session, holding only that session's entry
    pub fn with_session<T>(
        &self,
        game_id: Uuid,
        f: impl FnOnce(&mut GameSession) -> Result<T, GameError>,
    ) -> Result<T, GameError> {
        let mut session = self
            .sessions
            .get_mut(&game_id)
            .ok_or(GameError::SessionNotFound(game_id))?;
        f(&mut session)
    }

    /// Switch a session to another theme, regenerating its grid. Asking for
    /// the puzzle already in play keeps the player's progress.
    pub fn switch_theme(&self, game_id: Uuid, theme: &str) -> Result<GameSnapshot, GameError> {
        let (theme, words) = self.theme_words(Some(theme))?;

        let settings = {
            let session = self
                .sessions
                .get(&game_id)
                .ok_or(GameError::SessionNotFound(game_id))?;
            if session.is_current_puzzle(&theme, &words) {
                return Ok(session.snapshot());
            }
            *session.settings()
        };

        // Generate without holding the session entry
        let grid = generate_grid(&words, &settings)?;

        self.with_session(game_id, |session| {
            session.replace_puzzle(theme, words, grid);
            tracing::info!("Game {} switched to theme {}", game_id, session.theme());
            Ok(session.snapshot())
        })
    }

    pub fn end_session(&self, game_id: Uuid) -> bool {
        self.sessions.remove(&game_id).is_some()
    }

    /// Drop sessions nobody has touched within the idle timeout
    pub fn sweep_idle_sessions(&self, now: Instant) -> usize {
        let timeout = self.config.game.session_idle_timeout;
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_idle_for(timeout, now));
        before.saturating_sub(self.sessions.len())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "word_search_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting word search backend...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Load themes
    let themes = match &config.game.themes_path {
        Some(path) => match ThemeCatalog::load(path).await {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!("Failed to load themes: {:#}. Using built-in themes.", e);
                ThemeCatalog::builtin()
            }
        },
        None => ThemeCatalog::builtin(),
    };
    let themes = themes.fit_to_grid(config.game.grid_size);
    if themes.is_empty() {
        anyhow::bail!(
            "No theme has words that fit a {}x{} grid",
            config.game.grid_size,
            config.game.grid_size
        );
    }
    tracing::info!(
        "Themes available: {}",
        themes.names().collect::<Vec<_>>().join(", ")
    );

    if !themes.contains(&config.game.default_theme) {
        tracing::warn!(
            "Default theme '{}' is not in the catalog; new games must name a theme",
            config.game.default_theme
        );
    }

    // Create application state
    let state = Arc::new(AppState::new(config.clone(), themes));

    // Spawn background task to drop abandoned sessions
    let cleanup_state = state.clone();
    tokio::spawn(async move {
        session_cleanup_task(cleanup_state).await;
    });

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Serve frontend static files
    let frontend_service = ServeDir::new(&config.server.frontend_dir);

    // Build router
    let app = Router::new()
        // WebSocket endpoint
        .route("/ws", get(websocket::handle_websocket))
        // API routes
        .merge(routes::create_routes())
        .fallback_service(frontend_service)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("WebSocket endpoint: ws://{}/ws", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Background task that periodically removes idle game sessions
async fn session_cleanup_task(state: Arc<AppState>) {
    let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);

    loop {
        interval.tick().await;

        let removed = state.sweep_idle_sessions(Instant::now());
        if removed > 0 {
            tracing::info!(
                "Removed {} idle game sessions ({} still active)",
                removed,
                state.sessions.len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{game::grid::tests::locate, models::Position};

    fn test_state() -> AppState {
        AppState::new(Config::default(), ThemeCatalog::builtin())
    }

    #[test]
    fn test_start_session_uses_default_theme() {
        let state = test_state();
        let snapshot = state.start_session(None).unwrap();
        assert_eq!(snapshot.theme, "dinosaurs");
        assert_eq!(snapshot.words, vec!["TREX", "BONE", "CLAW", "SCALE"]);
        assert_eq!(snapshot.size, 8);
        assert!(state.sessions.contains_key(&snapshot.game_id));
    }

    #[test]
    fn test_start_session_theme_is_case_insensitive() {
        let state = test_state();
        let snapshot = state.start_session(Some(" Space ")).unwrap();
        assert_eq!(snapshot.theme, "space");
    }

    #[test]
    fn test_unknown_theme_rejected() {
        let state = test_state();
        let err = state.start_session(Some("jungle")).unwrap_err();
        assert_eq!(err, GameError::UnknownTheme("jungle".to_string()));
        assert!(state.sessions.is_empty());
    }

    #[test]
    fn test_sessions_are_isolated() {
        let state = test_state();
        let first = state.start_session(Some("ocean")).unwrap();
        let second = state.start_session(Some("ocean")).unwrap();
        assert_ne!(first.game_id, second.game_id);

        state
            .with_session(first.game_id, |session| session.click(Position::new(0, 0)))
            .unwrap();

        assert_eq!(state.snapshot(first.game_id).unwrap().selection.len(), 1);
        assert!(state.snapshot(second.game_id).unwrap().selection.is_empty());
    }

    #[test]
    fn test_missing_session() {
        let state = test_state();
        let id = Uuid::new_v4();
        assert_eq!(state.snapshot(id).unwrap_err(), GameError::SessionNotFound(id));
        assert!(!state.end_session(id));
    }

    #[test]
    fn test_switch_theme() {
        let state = test_state();
        let snapshot = state.start_session(None).unwrap();
        let switched = state.switch_theme(snapshot.game_id, "space").unwrap();
        assert_eq!(switched.theme, "space");
        assert!(switched.found_words.is_empty());
        assert_eq!(switched.game_id, snapshot.game_id);
    }

    #[test]
    fn test_switch_to_current_theme_keeps_progress() {
        let state = test_state();
        let snapshot = state.start_session(Some("space")).unwrap();
        let game_id = snapshot.game_id;

        let star = locate(&snapshot.grid, "STAR").unwrap();
        for cell in star {
            state.with_session(game_id, |session| session.click(cell)).unwrap();
        }
        state
            .with_session(game_id, |session| session.click(Position::new(1, 1)))
            .unwrap();

        let again = state.switch_theme(game_id, " SPACE ").unwrap();
        assert_eq!(again.grid, snapshot.grid, "grid must not be regenerated");
        assert_eq!(again.found_words.len(), 1);
        assert_eq!(again.selection, vec![Position::new(1, 1)]);
    }

    #[test]
    fn test_failed_switch_keeps_puzzle() {
        let mut config = Config::default();
        config.game.grid_size = 2;
        config.game.max_placement_attempts = 50;
        let themes =
            ThemeCatalog::from_map([("pair", vec!["AB"]), ("crowded", vec!["AB", "CD", "EF"])]);
        let state = AppState::new(config, themes);

        let snapshot = state.start_session(Some("pair")).unwrap();
        state
            .with_session(snapshot.game_id, |session| session.click(Position::new(0, 0)))
            .unwrap();

        let err = state.switch_theme(snapshot.game_id, "crowded").unwrap_err();
        assert!(matches!(err, GameError::ImpossibleLayout { .. }));

        let after = state.snapshot(snapshot.game_id).unwrap();
        assert_eq!(after.theme, "pair");
        assert_eq!(after.grid, snapshot.grid);
        assert_eq!(after.selection, vec![Position::new(0, 0)]);
    }

    #[test]
    fn test_switch_theme_missing_session() {
        let state = test_state();
        let id = Uuid::new_v4();
        assert_eq!(
            state.switch_theme(id, "space").unwrap_err(),
            GameError::SessionNotFound(id)
        );
    }

    #[test]
    fn test_sweep_idle_sessions() {
        let state = test_state();
        state.start_session(None).unwrap();
        state.start_session(None).unwrap();

        assert_eq!(state.sweep_idle_sessions(Instant::now()), 0);

        let much_later = Instant::now() + state.config.game.session_idle_timeout * 2;
        assert_eq!(state.sweep_idle_sessions(much_later), 2);
        assert!(state.sessions.is_empty());
    }
}
