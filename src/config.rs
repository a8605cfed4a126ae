//! Runtime configuration from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `PORT` | `4000` |
//! | `HOST` | `0.0.0.0` |
//! | `MONGO_URI` | required |
//! | `MONGO_DB` | the database named in the URI, else `test` |
//!
//! A `.env` file in the working directory is loaded first when present;
//! variables already set in the process win.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use tracing::warn;

pub const DEFAULT_PORT: u16 = 4000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{name} has an invalid value `{value}`")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub mongo_uri: String,
    pub mongo_db: Option<String>,
}

impl Config {
    /// Loads `.env` (if any), then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = ignore_missing(dotenvy::dotenv()) {
            warn!(error = %e, "ignoring unreadable .env file");
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, treating empty values as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            None => DEFAULT_PORT,
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value })?,
        };
        let host = match get("HOST") {
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "HOST", value })?,
        };
        let mongo_uri = get("MONGO_URI").ok_or(ConfigError::Missing("MONGO_URI"))?;

        Ok(Self { host, port, mongo_uri, mongo_db: get("MONGO_DB") })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// A missing `.env` file is the normal case in production; anything else
/// (bad syntax, unreadable file) is passed on.
fn ignore_missing<T>(loaded: dotenvy::Result<T>) -> Result<(), dotenvy::Error> {
    match loaded {
        Err(e) if !e.not_found() => Err(e),
        _ => Ok(()),
    }
}
