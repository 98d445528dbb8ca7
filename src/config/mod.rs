use std::time::Duration;

use crate::errors::{WatchError, WatchResult};

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SETTINGS_POLL_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub webhook_url: Option<String>,
    pub http_timeout: Duration,
    pub settings_poll: Duration,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<std::path::PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn from_env() -> WatchResult<Self> {
        let exe_dir = Self::exe_dir();

        // Try to load .env from executable's directory first
        if let Some(ref dir) = exe_dir {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        // Default db_path is relative to executable directory
        let db_path = std::env::var("WPWATCH_DB_PATH").unwrap_or_else(|_| {
            exe_dir
                .map(|d| d.join("wpwatch.db").to_string_lossy().into_owned())
                .unwrap_or_else(|| "./wpwatch.db".to_string())
        });

        let webhook_url = std::env::var("WPWATCH_WEBHOOK_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let http_timeout = Duration::from_secs(secs_from_env(
            "WPWATCH_HTTP_TIMEOUT_SECS",
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?);
        let settings_poll = Duration::from_secs(secs_from_env(
            "WPWATCH_SETTINGS_POLL_SECS",
            DEFAULT_SETTINGS_POLL_SECS,
        )?);

        Ok(Self {
            db_path,
            webhook_url,
            http_timeout,
            settings_poll,
        })
    }
}

fn secs_from_env(name: &str, default: u64) -> WatchResult<u64> {
    match std::env::var(name) {
        Ok(raw) => parse_secs(name, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_secs(name: &str, raw: &str) -> WatchResult<u64> {
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(WatchError::Config(format!(
            "{} must be a positive number of seconds, got '{}'",
            name, raw
        ))),
        Ok(secs) => Ok(secs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_secs_accepts_positive() {
        assert_eq!(parse_secs("X", " 12 ").unwrap(), 12);
    }

    #[test]
    fn test_parse_secs_rejects_zero_and_garbage() {
        assert!(matches!(parse_secs("X", "0"), Err(WatchError::Config(_))));
        assert!(matches!(parse_secs("X", "soon"), Err(WatchError::Config(_))));
    }
}
