//! Process configuration from environment variables

use crate::types::DEFAULT_EDITION;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATA_DIR: &str = "data";
/// Same document name older deployments wrote, so their rooms load as-is
const ROOMS_FILE_NAME: &str = "games.json";
const DEFAULT_STATIC_DIR: &str = "static";

/// Server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// TCP port to listen on (all interfaces)
    pub port: u16,
    /// JSON document holding every room
    pub rooms_file: PathBuf,
    /// Directory served for any non-API path
    pub static_dir: PathBuf,
    /// Edition label for rooms created without one
    pub default_edition: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            rooms_file: PathBuf::from(DEFAULT_DATA_DIR).join(ROOMS_FILE_NAME),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            default_edition: DEFAULT_EDITION.to_string(),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl ServerConfig {
    /// Load config from environment variables
    ///
    /// - `PORT`: listen port (default 5000)
    /// - `DATA_DIR`: directory for `games.json` (default `data`)
    /// - `ROOMS_FILE`: explicit path to the rooms document, overrides `DATA_DIR`
    /// - `STATIC_DIR`: static asset directory (default `static`)
    /// - `DEFAULT_EDITION`: edition label for new rooms
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = match non_empty_var("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!("Invalid PORT '{}', using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => defaults.port,
        };

        let rooms_file = non_empty_var("ROOMS_FILE")
            .map(PathBuf::from)
            .or_else(|| non_empty_var("DATA_DIR").map(|dir| PathBuf::from(dir).join(ROOMS_FILE_NAME)))
            .unwrap_or(defaults.rooms_file);

        let static_dir = non_empty_var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        let default_edition = non_empty_var("DEFAULT_EDITION").unwrap_or(defaults.default_edition);

        Self {
            port,
            rooms_file,
            static_dir,
            default_edition,
        }
    }
}
