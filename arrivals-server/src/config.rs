//! Server configuration from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `TRANSITER_URL` | `http://localhost:8080` |
//! | `TRANSITER_SYSTEM` | `us-ny-subway` |
//! | `POLL_INTERVAL_SECS` | `30` |
//! | `REQUEST_TIMEOUT_SECS` | `10` |
//! | `CYCLE_TIMEOUT_SECS` | `25` |
//! | `MAX_PAGES` | `100` |
//! | `ARRIVAL_EXPIRY_CYCLES` | `20` (`0` keeps arrivals forever) |
//! | `BIND_ADDR` | `127.0.0.1:8081` |

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::poller::PollerConfig;
use crate::transiter::TransiterConfig;

/// Default listen address for the HTTP server.
const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
    8081,
);

/// Errors from reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable was set but could not be parsed
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    /// A duration or count that must be positive was zero
    #[error("{key} must be greater than zero")]
    Zero { key: &'static str },
}

/// Everything the server binary needs to start.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub transiter: TransiterConfig,
    pub poller: PollerConfig,
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transiter: TransiterConfig::default(),
            poller: PollerConfig::default(),
            bind_addr: DEFAULT_BIND_ADDR,
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for
    /// anything unset.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let env = Env { lookup };

        let mut transiter = defaults.transiter;
        if let Some(url) = env.string("TRANSITER_URL") {
            transiter.base_url = url;
        }
        if let Some(system) = env.string("TRANSITER_SYSTEM") {
            transiter.system_id = system;
        }
        transiter.timeout_secs = env.positive("REQUEST_TIMEOUT_SECS", transiter.timeout_secs)?;
        transiter.max_pages = env.positive("MAX_PAGES", transiter.max_pages)?;

        let mut poller = defaults.poller;
        poller.interval = Duration::from_secs(
            env.positive("POLL_INTERVAL_SECS", poller.interval.as_secs())?,
        );
        poller.cycle_timeout = Duration::from_secs(
            env.positive("CYCLE_TIMEOUT_SECS", poller.cycle_timeout.as_secs())?,
        );
        if let Some(cycles) = env.parsed::<u64>("ARRIVAL_EXPIRY_CYCLES")? {
            poller.expiry_cycles = (cycles > 0).then_some(cycles);
        }

        let bind_addr = env.parsed("BIND_ADDR")?.unwrap_or(defaults.bind_addr);

        Ok(Self {
            transiter,
            poller,
            bind_addr,
        })
    }
}

struct Env<L> {
    lookup: L,
}

impl<L: Fn(&str) -> Option<String>> Env<L> {
    /// A set, non-blank variable.
    fn string(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parsed<T: FromStr>(&self, key: &'static str) -> Result<Option<T>, ConfigError> {
        self.string(key)
            .map(|value| {
                value
                    .parse()
                    .map_err(|_| ConfigError::Invalid { key, value })
            })
            .transpose()
    }

    fn positive<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr + PartialEq + Default,
    {
        match self.parsed::<T>(key)? {
            Some(v) if v == T::default() => Err(ConfigError::Zero { key }),
            Some(v) => Ok(v),
            None => Ok(default),
        }
    }
}
