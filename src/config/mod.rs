use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// Longest derived code a SHA-256 hex digest can provide.
pub const MAX_AUTO_URL_LENGTH: usize = 64;

const DEFAULT_RESERVED_WORDS: &[&str] = &["admin", "api", "login", "signup", "dashboard", "health"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app_name: String,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub short_codes: ShortCodeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Sqlite,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Path prefix every route is nested under. Empty means the root.
    pub api_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, used when `RUST_LOG` is not set
    pub level: String,
    /// Log file appended to alongside stdout
    pub file: Option<String>,
}

/// Rules for generated and client-supplied short codes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortCodeConfig {
    pub auto_length: usize,
    pub min_custom_length: usize,
    pub max_custom_length: usize,
    /// Stored lowercase; compared against the lowercased custom code
    pub reserved_words: HashSet<String>,
}

impl Default for ShortCodeConfig {
    fn default() -> Self {
        Self {
            auto_length: 8,
            min_custom_length: 4,
            max_custom_length: 30,
            reserved_words: DEFAULT_RESERVED_WORDS
                .iter()
                .map(|w| w.to_string())
                .collect(),
        }
    }
}

impl ShortCodeConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.auto_length == 0 || self.auto_length > MAX_AUTO_URL_LENGTH {
            bail!(
                "AUTO_URL_LENGTH must be between 1 and {MAX_AUTO_URL_LENGTH}, got {}",
                self.auto_length
            );
        }
        if self.min_custom_length == 0 {
            bail!("MIN_CUSTOM_URL_LENGTH must be at least 1");
        }
        if self.min_custom_length > self.max_custom_length {
            bail!(
                "MIN_CUSTOM_URL_LENGTH ({}) must not exceed MAX_CUSTOM_URL_LENGTH ({})",
                self.min_custom_length,
                self.max_custom_length
            );
        }
        Ok(())
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn parse_backend(raw: &str) -> anyhow::Result<DatabaseBackend> {
    match raw.trim().to_lowercase().as_str() {
        "postgres" | "postgresql" => Ok(DatabaseBackend::Postgres),
        "sqlite" => Ok(DatabaseBackend::Sqlite),
        other => bail!("Unknown DATABASE_BACKEND '{other}'. Supported values: sqlite, postgres"),
    }
}

fn parse_reserved_words(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let backend = parse_backend(&env_or("DATABASE_BACKEND", "sqlite"))?;

        let defaults = ShortCodeConfig::default();
        let reserved_words = match std::env::var("RESERVED_WORDS") {
            Ok(raw) => parse_reserved_words(&raw),
            Err(_) => defaults.reserved_words.clone(),
        };

        let short_codes = ShortCodeConfig {
            auto_length: parse_env("AUTO_URL_LENGTH", defaults.auto_length)?,
            min_custom_length: parse_env("MIN_CUSTOM_URL_LENGTH", defaults.min_custom_length)?,
            max_custom_length: parse_env("MAX_CUSTOM_URL_LENGTH", defaults.max_custom_length)?,
            reserved_words,
        };
        short_codes.validate()?;

        Ok(Config {
            app_name: env_or("APP_NAME", "URL Shortener"),
            database: DatabaseConfig {
                backend,
                url: env_or("DATABASE_URL", "sqlite://./shortener.db"),
                max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 5)?,
            },
            server: ServerConfig {
                host: env_or("HOST", "127.0.0.1"),
                port: parse_env("PORT", 8000)?,
                api_prefix: normalize_prefix(&env_or("API_PREFIX", "")),
            },
            logging: LoggingConfig {
                level: env_or("LOG_LEVEL", "info").to_lowercase(),
                file: std::env::var("LOG_FILE").ok().filter(|f| !f.trim().is_empty()),
            },
            short_codes,
        })
    }
}

/// Turns `api/v1/` or `/api/v1` into `/api/v1`; blank input stays blank.
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
