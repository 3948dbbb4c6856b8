use anyhow::{bail, Context, Result};
use std::{env, str::FromStr, time::Duration};

use crate::game::grid::{DEFAULT_GRID_SIZE, DEFAULT_MAX_PLACEMENT_ATTEMPTS};

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub game: GameConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Static files for the browser UI, served for any unmatched path
    pub frontend_dir: String,
}

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub grid_size: usize,
    pub max_placement_attempts: usize,
    /// Whole-grid regenerations after the first failed layout; 0 disables them
    pub generation_retries: usize,
    pub default_theme: String,
    /// Optional JSON file replacing the built-in themes
    pub themes_path: Option<String>,
    pub session_idle_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            frontend_dir: "../frontend".to_string(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            max_placement_attempts: DEFAULT_MAX_PLACEMENT_ATTEMPTS,
            generation_retries: 3,
            default_theme: "dinosaurs".to_string(),
            themes_path: None,
            session_idle_timeout: Duration::from_secs(30 * 60),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let server = ServerConfig {
            host: env::var("HOST").unwrap_or(defaults.server.host),
            port: parse_or("PORT", env::var("PORT").ok(), defaults.server.port)?,
            frontend_dir: env::var("FRONTEND_DIR").unwrap_or(defaults.server.frontend_dir),
        };

        let game = GameConfig {
            grid_size: parse_or("GRID_SIZE", env::var("GRID_SIZE").ok(), defaults.game.grid_size)?,
            max_placement_attempts: parse_or(
                "MAX_PLACEMENT_ATTEMPTS",
                env::var("MAX_PLACEMENT_ATTEMPTS").ok(),
                defaults.game.max_placement_attempts,
            )?,
            generation_retries: parse_or(
                "GENERATION_RETRIES",
                env::var("GENERATION_RETRIES").ok(),
                defaults.game.generation_retries,
            )?,
            default_theme: env::var("DEFAULT_THEME")
                .map(|t| t.trim().to_lowercase())
                .unwrap_or(defaults.game.default_theme),
            themes_path: env::var("THEMES_PATH").ok().filter(|p| !p.trim().is_empty()),
            session_idle_timeout: Duration::from_secs(parse_or(
                "SESSION_IDLE_TIMEOUT_SECS",
                env::var("SESSION_IDLE_TIMEOUT_SECS").ok(),
                defaults.game.session_idle_timeout.as_secs(),
            )?),
        };

        let config = Config { server, game };
        config.game.validate()?;

        Ok(config)
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 {
            bail!("GRID_SIZE must be at least 1");
        }
        if self.max_placement_attempts == 0 {
            bail!("MAX_PLACEMENT_ATTEMPTS must be at least 1");
        }
        Ok(())
    }
}

/// Parse an optional environment value, falling back to `default` when unset
fn parse_or<T>(name: &str, value: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number, got '{}'", name, raw)),
        None => Ok(default),
    }
}
