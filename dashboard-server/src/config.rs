//! Configuration module

use std::env;

use nids_core::constants::{DEFAULT_DISPLAY_ROWS, DEFAULT_PREVIEW_ROWS};
use nids_core::AssetPaths;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Classifier, label map and feature list locations
    pub assets: AssetPaths,

    /// Largest accepted upload, bytes
    pub max_upload_bytes: usize,

    /// Sessions kept in memory before the oldest is evicted
    pub max_sessions: usize,

    /// Rows returned after upload
    pub preview_rows: usize,

    /// Rows returned after prediction
    pub display_rows: usize,

    /// Emit logs as JSON lines
    pub log_json: bool,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: parse_var("PORT").unwrap_or(8080),

            assets: AssetPaths::from_env(),

            max_upload_bytes: parse_var::<usize>("MAX_UPLOAD_MB").unwrap_or(50) * 1024 * 1024,

            max_sessions: parse_var("MAX_SESSIONS").unwrap_or(64),

            preview_rows: parse_var("PREVIEW_ROWS").unwrap_or(DEFAULT_PREVIEW_ROWS),

            display_rows: parse_var("DISPLAY_ROWS").unwrap_or(DEFAULT_DISPLAY_ROWS),

            log_json: env::var("LOG_FORMAT")
                .map(|f| f.eq_ignore_ascii_case("json"))
                .unwrap_or(false),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            assets: AssetPaths::default(),
            max_upload_bytes: 50 * 1024 * 1024,
            max_sessions: 64,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            display_rows: DEFAULT_DISPLAY_ROWS,
            log_json: false,
            environment: "development".to_string(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
