//! Process configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{FixedOffset, Offset, Utc};

use crate::store::{DEFAULT_MAX_ROUTES, RouteStoreConfig};
use crate::yandex::{DEFAULT_TIMEOUT_SECS, YandexConfig};

const DEFAULT_ROUTES_DIR: &str = "data/routes";
const DEFAULT_UTC_OFFSET_HOURS: i32 = 3;

/// Errors from reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    /// Overrides the production API URL when set.
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub routes_dir: PathBuf,
    pub bind_addr: SocketAddr,
    /// Offset used to compute "now" for schedule lookups.
    pub utc_offset: FixedOffset,
    pub max_routes: usize,
}

impl AppConfig {
    /// Defaults for everything but the API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            routes_dir: PathBuf::from(DEFAULT_ROUTES_DIR),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            utc_offset: moscow_offset(),
            max_routes: DEFAULT_MAX_ROUTES,
        }
    }

    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to its
    /// value. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let api_key = get("YANDEX_API_KEY").ok_or(ConfigError::Missing("YANDEX_API_KEY"))?;
        let mut config = Self::new(api_key);

        if let Some(url) = get("YANDEX_BASE_URL") {
            config = config.with_base_url(url);
        }
        if let Some(value) = get("HTTP_TIMEOUT_SECS") {
            let secs: u64 = parse("HTTP_TIMEOUT_SECS", &value)?;
            if secs == 0 {
                return Err(invalid("HTTP_TIMEOUT_SECS", &value, "must be positive"));
            }
            config = config.with_timeout(secs);
        }
        if let Some(dir) = get("ROUTES_DIR") {
            config = config.with_routes_dir(dir);
        }
        if let Some(value) = get("BIND_ADDR") {
            config = config.with_bind_addr(parse("BIND_ADDR", &value)?);
        }
        if let Some(value) = get("SCHEDULE_UTC_OFFSET_HOURS") {
            let hours: i32 = parse("SCHEDULE_UTC_OFFSET_HOURS", &value)?;
            let offset = hours
                .checked_mul(3600)
                .and_then(FixedOffset::east_opt)
                .ok_or_else(|| invalid("SCHEDULE_UTC_OFFSET_HOURS", &value, "out of range"))?;
            config = config.with_utc_offset(offset);
        }
        if let Some(value) = get("MAX_ROUTES_PER_USER") {
            config = config.with_max_routes(parse("MAX_ROUTES_PER_USER", &value)?);
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_routes_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.routes_dir = dir.into();
        self
    }

    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    pub fn with_max_routes(mut self, max_routes: usize) -> Self {
        self.max_routes = max_routes;
        self
    }

    /// Client settings derived from this config.
    pub fn yandex(&self) -> YandexConfig {
        let config = YandexConfig::new(&self.api_key).with_timeout(self.timeout_secs);
        match &self.base_url {
            Some(url) => config.with_base_url(url),
            None => config,
        }
    }

    /// Route store settings derived from this config.
    pub fn route_store(&self) -> RouteStoreConfig {
        RouteStoreConfig::new(&self.routes_dir).with_max_routes(self.max_routes)
    }
}

fn moscow_offset() -> FixedOffset {
    FixedOffset::east_opt(DEFAULT_UTC_OFFSET_HOURS * 3600).unwrap_or_else(|| Utc.fix())
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| invalid(var, value, e.to_string()))
}

fn invalid(var: &'static str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.into(),
    }
}
