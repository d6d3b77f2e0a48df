//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::timetable::EngineConfig;

const DATA_PATH: &str = "FERRY_DATA_PATH";
const BIND_ADDR: &str = "FERRY_BIND_ADDR";
const DELAY_MINUTES: &str = "FERRY_DELAY_MINUTES";
const CACHE_TTL_SECS: &str = "FERRY_CACHE_TTL_SECS";

/// Error from reading the server configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {var}={value}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Everything needed to start the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Timetable JSON document to load at startup.
    pub data_path: PathBuf,

    pub bind_addr: SocketAddr,

    pub engine: EngineConfig,

    pub cache: CacheConfig,
}

impl ServerConfig {
    /// Read the configuration from the process environment.
    ///
    /// | Variable               | Default               |
    /// |------------------------|-----------------------|
    /// | `FERRY_DATA_PATH`      | `data/timetable.json` |
    /// | `FERRY_BIND_ADDR`      | `127.0.0.1:3000`      |
    /// | `FERRY_DELAY_MINUTES`  | `5`                   |
    /// | `FERRY_CACHE_TTL_SECS` | `300`                 |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name
    /// to its value if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_path = lookup(DATA_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data/timetable.json"));

        let bind_addr = parse_var(&lookup, BIND_ADDR)?
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));

        let engine = match parse_var::<u32>(&lookup, DELAY_MINUTES)? {
            Some(minutes) => EngineConfig::new(minutes),
            None => EngineConfig::default(),
        };

        let mut cache = CacheConfig::default();
        if let Some(secs) = parse_var::<u64>(&lookup, CACHE_TTL_SECS)? {
            cache.ttl = Duration::from_secs(secs);
        }

        Ok(Self {
            data_path,
            bind_addr,
            engine,
            cache,
        })
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(value) = lookup(var) else {
        return Ok(None);
    };
    let parsed = value.trim().parse::<T>();
    parsed.map(Some).map_err(|e| ConfigError {
        var,
        reason: e.to_string(),
        value,
    })
}
