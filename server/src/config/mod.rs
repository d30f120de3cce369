use std::env;
use std::net::SocketAddr;

use chrono::{FixedOffset, Offset, Utc};
use thiserror::Error;

use crate::validation::CategoryWhitelist;

pub mod cors;

pub use cors::create_cors_layer;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("BIND_ADDR '{0}' is not a socket address")]
    InvalidBindAddr(String),

    #[error("DISPLAY_UTC_OFFSET '{0}' is not an offset like +01:00")]
    InvalidUtcOffset(String),

    #[error("{key} '{value}' is not a boolean")]
    InvalidBool { key: &'static str, value: String },

    #[error("EVENT_CATEGORIES must name at least one category")]
    EmptyCategories,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL URL. Without it events are kept in memory.
    pub database_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub categories: CategoryWhitelist,
    /// Zone used to print event dates on cards.
    pub display_offset: FixedOffset,
    pub seed_demo_events: bool,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(bind_addr))?;

        let categories = match lookup("EVENT_CATEGORIES") {
            Some(raw) => {
                let categories = CategoryWhitelist::from_csv(&raw);
                if categories.is_empty() {
                    return Err(ConfigError::EmptyCategories);
                }
                categories
            }
            None => CategoryWhitelist::default(),
        };

        let display_offset = match lookup("DISPLAY_UTC_OFFSET") {
            Some(raw) => parse_utc_offset(&raw).ok_or(ConfigError::InvalidUtcOffset(raw))?,
            None => Utc.fix(),
        };

        let seed_demo_events = match lookup("SEED_DEMO_EVENTS") {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidBool {
                key: "SEED_DEMO_EVENTS",
                value: raw,
            })?,
            None => false,
        };

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            database_url,
            bind_addr,
            categories,
            display_offset,
            seed_demo_events,
            cors_allowed_origins,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Accepts `Z` plus whatever chrono reads as a fixed offset (`+HH:MM`,
/// `-HHMM`).
pub fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") {
        return Some(Utc.fix());
    }
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert!(config.database_url.is_none());
        assert_eq!(
            config.bind_addr,
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().unwrap()
        );
        assert_eq!(config.categories, CategoryWhitelist::default());
        assert_eq!(config.display_offset.local_minus_utc(), 0);
        assert!(!config.seed_demo_events);
        assert!(config.cors_allowed_origins.is_empty());
    }

    #[test]
    fn test_reads_overrides() {
        let config = config(&[
            ("DATABASE_URL", "postgres://localhost/eventos"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("EVENT_CATEGORIES", "gaming, holiday"),
            ("DISPLAY_UTC_OFFSET", "-05:00"),
            ("SEED_DEMO_EVENTS", "true"),
            ("CORS_ALLOWED_ORIGINS", "http://localhost:5173, "),
        ])
        .unwrap();

        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/eventos")
        );
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.categories.as_slice(), ["gaming", "holiday"]);
        assert_eq!(config.display_offset.local_minus_utc(), -5 * 3600);
        assert!(config.seed_demo_events);
        assert_eq!(config.cors_allowed_origins, ["http://localhost:5173"]);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert_eq!(
            config(&[("BIND_ADDR", "nowhere")]).unwrap_err(),
            ConfigError::InvalidBindAddr("nowhere".to_string())
        );
        assert_eq!(
            config(&[("EVENT_CATEGORIES", " , ")]).unwrap_err(),
            ConfigError::EmptyCategories
        );
        assert!(matches!(
            config(&[("SEED_DEMO_EVENTS", "maybe")]).unwrap_err(),
            ConfigError::InvalidBool { .. }
        ));
        assert!(matches!(
            config(&[("DISPLAY_UTC_OFFSET", "CET")]).unwrap_err(),
            ConfigError::InvalidUtcOffset(_)
        ));
    }

    #[test]
    fn test_parse_utc_offset() {
        assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_utc_offset("+01:00").unwrap().local_minus_utc(), 3600);
        assert_eq!(parse_utc_offset("-0330").unwrap().local_minus_utc(), -12600);
        assert!(parse_utc_offset("+99:00").is_none());
        assert!(parse_utc_offset("01:00").is_none());
        assert!(parse_utc_offset("").is_none());
    }
}
