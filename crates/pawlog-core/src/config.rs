use std::{env, fs, path::Path, time::Duration};

use crate::{errors::Error, Result};

/// Typed configuration, read from the environment (with `.env` support).
#[derive(Clone, Debug)]
pub struct Config {
    /// Telegram bot access token (`BOT_TOKEN`). Required.
    pub bot_token: String,
    /// SQLite database URL (`DATABASE_URL`).
    pub database_url: String,
    /// Entries shown per history page (`HISTORY_PAGE_SIZE`).
    pub history_page_size: u32,
    /// Idle timeout after which an abandoned dialog is discarded
    /// (`DIALOG_TIMEOUT_SECS`).
    pub dialog_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let bot_token = env_str("BOT_TOKEN").and_then(non_empty).ok_or_else(|| {
            Error::Config("BOT_TOKEN environment variable is required".to_string())
        })?;

        let database_url = env_str("DATABASE_URL")
            .and_then(non_empty)
            .unwrap_or_else(|| "sqlite://pawlog.db?mode=rwc".to_string());

        let history_page_size = env_u32("HISTORY_PAGE_SIZE").unwrap_or(10).max(1);
        let dialog_timeout =
            Duration::from_secs(env_u64("DIALOG_TIMEOUT_SECS").unwrap_or(1800));

        Ok(Self {
            bot_token,
            database_url,
            history_page_size,
            dialog_timeout,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_u32(key: &str) -> Option<u32> {
    env_str(key).and_then(|s| s.trim().parse::<u32>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
