use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Root directory for saved documents. Request paths resolve under it.
    pub documents_dir: PathBuf,
    /// Vertical origin correction for Grid-mode tiles, in px.
    pub grid_align_adjust_px: f64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            documents_dir: std::env::var("GENKO_DOCUMENTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./documents")),
            grid_align_adjust_px: parse_env_or("GENKO_GRID_ALIGN_ADJUST_PX", -2.0)?,
        })
    }
}

fn parse_env_or(key: &str, default: f64) -> Result<f64> {
    match std::env::var(key) {
        Ok(raw) => {
            let value = raw
                .trim()
                .parse::<f64>()
                .with_context(|| format!("'{key}' must be a number, got '{raw}'"))?;
            anyhow::ensure!(value.is_finite(), "'{key}' must be finite");
            Ok(value)
        }
        Err(_) => Ok(default),
    }
}
