// ABOUTME: Database connection configuration for the MySQL-backed persistence core
// ABOUTME: Builds a DSN from user, password, database, host, and port plus pool tuning
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::{database, env_config, pool};
use crate::errors::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use tracing::warn;

/// Connection settings combined into a single DSN before the pool is opened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database user
    pub user: String,
    /// Database password (may be empty)
    pub password: String,
    /// Database (schema) name
    pub name: String,
    /// Server host name or address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Pool tuning
    pub pool: PoolConfig,
}

impl DatabaseConfig {
    /// Create a configuration with default host, port, and pool settings
    #[must_use]
    pub fn new(user: impl Into<String>, password: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
            name: name.into(),
            host: database::DEFAULT_HOST.to_owned(),
            port: database::DEFAULT_PORT,
            pool: PoolConfig::default(),
        }
    }

    /// Override the host
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Override the port
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Load configuration from `MARGO_DB_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if user or database name are missing or
    /// the port is not a number
    pub fn from_env() -> StoreResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if user or database name are missing or
    /// the port is not a number
    pub fn from_lookup<F>(lookup: F) -> StoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| StoreError::config(format!("{key} is required")))
        };

        let port = match lookup(env_config::DB_PORT) {
            Some(raw) if !raw.is_empty() => raw
                .parse()
                .map_err(|e| StoreError::config(format!("invalid {}: {e}", env_config::DB_PORT)))?,
            _ => database::DEFAULT_PORT,
        };

        Ok(Self {
            user: required(env_config::DB_USER)?,
            password: lookup(env_config::DB_PASSWORD).unwrap_or_default(),
            name: required(env_config::DB_NAME)?,
            host: lookup(env_config::DB_HOST)
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| database::DEFAULT_HOST.to_owned()),
            port,
            pool: PoolConfig::from_lookup(&lookup),
        })
    }

    /// Connection string understood by the MySQL driver
    ///
    /// User and password are percent-encoded so reserved characters survive.
    #[must_use]
    pub fn to_dsn(&self) -> String {
        format!(
            "{}://{}:{}@{}:{}/{}",
            database::URL_SCHEME,
            urlencoding::encode(&self.user),
            urlencoding::encode(&self.password),
            self.host,
            self.port,
            self.name
        )
    }
}

impl Display for DatabaseConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{}://{}:***@{}:{}/{}",
            database::URL_SCHEME,
            self.user,
            self.host,
            self.port,
            self.name
        )
    }
}

/// Pool sizing and connection lifetime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Maximum number of connections
    pub max_connections: u32,
    /// Minimum number of connections kept open
    pub min_connections: u32,
    /// Seconds to wait when acquiring a connection
    pub acquire_timeout_secs: u64,
    /// Seconds before a connection is recycled
    pub max_lifetime_secs: u64,
    /// Seconds an idle connection is kept
    pub idle_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: pool::MAX_CONNECTIONS,
            min_connections: pool::MIN_CONNECTIONS,
            acquire_timeout_secs: pool::ACQUIRE_TIMEOUT_SECS,
            max_lifetime_secs: pool::MAX_LIFETIME_SECS,
            idle_timeout_secs: pool::IDLE_TIMEOUT_SECS,
        }
    }
}

impl PoolConfig {
    /// Load pool overrides from `MARGO_POOL_*` environment variables (or defaults)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(&|key: &str| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            max_connections: parse_or(lookup, env_config::POOL_MAX_CONNECTIONS, defaults.max_connections),
            min_connections: parse_or(lookup, env_config::POOL_MIN_CONNECTIONS, defaults.min_connections),
            acquire_timeout_secs: parse_or(
                lookup,
                env_config::POOL_ACQUIRE_TIMEOUT,
                defaults.acquire_timeout_secs,
            ),
            max_lifetime_secs: parse_or(lookup, env_config::POOL_MAX_LIFETIME, defaults.max_lifetime_secs),
            idle_timeout_secs: parse_or(lookup, env_config::POOL_IDLE_TIMEOUT, defaults.idle_timeout_secs),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(key = %key, value = %raw, "Ignoring unparsable pool setting");
            default
        }),
        None => default,
    }
}
