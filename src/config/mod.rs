//! Configuration module - environment variable parsing

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::lobby::RoomSettings;
use crate::util::time::{DEFAULT_BROADCAST_HZ, DEFAULT_TICK_INTERVAL_MS};

const DEFAULT_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_ROOMS: usize = 500;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Server binding address
    pub server_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones
    pub log_json: bool,

    /// Snapshot broadcasts per second per room
    pub broadcast_hz: u32,
    /// Wake-up period of each room worker
    pub tick_interval: Duration,
    /// Cap on concurrently open rooms
    pub max_rooms: usize,

    /// Directory served for any path that is not an API route
    pub static_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Hosting platforms hand us PORT; fall back to SERVER_ADDR or default
        let server_addr = match lookup("PORT") {
            Some(port) => format!("0.0.0.0:{}", port.trim()),
            None => lookup("SERVER_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string()),
        };

        let tick_ms = parse_in_range(
            &lookup,
            "TICK_INTERVAL_MS",
            DEFAULT_TICK_INTERVAL_MS,
            1..=50,
        )?;

        Ok(Self {
            server_addr: server_addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress(server_addr))?,

            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_json: lookup("LOG_FORMAT").is_some_and(|f| f.trim().eq_ignore_ascii_case("json")),

            broadcast_hz: parse_in_range(&lookup, "BROADCAST_HZ", DEFAULT_BROADCAST_HZ, 1..=120)?,
            tick_interval: Duration::from_millis(tick_ms),
            max_rooms: parse_in_range(&lookup, "MAX_ROOMS", DEFAULT_MAX_ROOMS, 1..=usize::MAX)?,

            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public")),
        })
    }

    pub fn room_settings(&self) -> RoomSettings {
        RoomSettings {
            tick_interval: self.tick_interval,
            broadcast_hz: self.broadcast_hz,
        }
    }
}

fn parse_in_range<F, T>(
    lookup: &F,
    key: &'static str,
    default: T,
    range: std::ops::RangeInclusive<T>,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + PartialOrd,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().parse::<T>() {
        Ok(value) if range.contains(&value) => Ok(value),
        _ => Err(ConfigError::InvalidValue { key, value: raw }),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid server address: {0}")]
    InvalidAddress(String),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.server_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.log_level, "info");
        assert!(!config.log_json);
        assert_eq!(config.broadcast_hz, 20);
        assert_eq!(config.tick_interval, Duration::from_millis(8));
        assert_eq!(config.max_rooms, 500);
        assert_eq!(config.static_dir, PathBuf::from("public"));
    }

    #[test]
    fn port_wins_over_server_addr() {
        let config = load(&[("PORT", "9000"), ("SERVER_ADDR", "127.0.0.1:1234")]).unwrap();
        assert_eq!(config.server_addr, "0.0.0.0:9000".parse().unwrap());

        let config = load(&[("SERVER_ADDR", "127.0.0.1:1234")]).unwrap();
        assert_eq!(config.server_addr, "127.0.0.1:1234".parse().unwrap());
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(load(&[("PORT", "http")]), Err(ConfigError::InvalidAddress(_))));
        assert!(matches!(
            load(&[("BROADCAST_HZ", "0")]),
            Err(ConfigError::InvalidValue { key: "BROADCAST_HZ", .. })
        ));
        assert!(matches!(
            load(&[("TICK_INTERVAL_MS", "fast")]),
            Err(ConfigError::InvalidValue { key: "TICK_INTERVAL_MS", .. })
        ));
        assert!(matches!(
            load(&[("MAX_ROOMS", "0")]),
            Err(ConfigError::InvalidValue { key: "MAX_ROOMS", .. })
        ));
    }

    #[test]
    fn json_logging_is_opt_in() {
        assert!(load(&[("LOG_FORMAT", "JSON")]).unwrap().log_json);
        assert!(!load(&[("LOG_FORMAT", "pretty")]).unwrap().log_json);
    }

    #[test]
    fn room_settings_follow_config() {
        let config = load(&[("BROADCAST_HZ", "30"), ("TICK_INTERVAL_MS", "4")]).unwrap();
        let settings = config.room_settings();
        assert_eq!(settings.broadcast_hz, 30);
        assert_eq!(settings.tick_interval, Duration::from_millis(4));
    }
}
