// ABOUTME: Constants shared by the persistence core and its configuration
// ABOUTME: Connection defaults, pool limits, and canonical temporal formats
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Database connection defaults
pub mod database {
    /// Default MySQL port
    pub const DEFAULT_PORT: u16 = 3306;
    /// Default host when none is configured
    pub const DEFAULT_HOST: &str = "127.0.0.1";
    /// URL scheme understood by the MySQL driver
    pub const URL_SCHEME: &str = "mysql";
}

/// Connection pool defaults
pub mod pool {
    /// Maximum connections in the pool
    pub const MAX_CONNECTIONS: u32 = 10;
    /// Minimum idle connections kept open
    pub const MIN_CONNECTIONS: u32 = 0;
    /// Seconds to wait for a free connection
    pub const ACQUIRE_TIMEOUT_SECS: u64 = 30;
    /// Maximum lifetime of a pooled connection (5 minutes)
    pub const MAX_LIFETIME_SECS: u64 = 300;
    /// Idle connections are closed after this many seconds (1 minute)
    pub const IDLE_TIMEOUT_SECS: u64 = 60;
}

/// Canonical MySQL text forms for temporal columns
pub mod temporal {
    /// `DATE`
    pub const DATE_FORMAT: &str = "%Y-%m-%d";
    /// `DATETIME` / `TIMESTAMP` without fraction
    pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
    /// Highest fractional-second precision MySQL supports
    pub const MAX_FRACTIONAL_DIGITS: u8 = 6;
}

/// Environment variable names read by the configuration loaders
pub mod env_config {
    /// Database user
    pub const DB_USER: &str = "MARGO_DB_USER";
    /// Database password
    pub const DB_PASSWORD: &str = "MARGO_DB_PASSWORD";
    /// Database (schema) name
    pub const DB_NAME: &str = "MARGO_DB_NAME";
    /// Server host
    pub const DB_HOST: &str = "MARGO_DB_HOST";
    /// Server port
    pub const DB_PORT: &str = "MARGO_DB_PORT";
    /// Pool size override
    pub const POOL_MAX_CONNECTIONS: &str = "MARGO_POOL_MAX_CONNECTIONS";
    /// Pool minimum override
    pub const POOL_MIN_CONNECTIONS: &str = "MARGO_POOL_MIN_CONNECTIONS";
    /// Acquire timeout override
    pub const POOL_ACQUIRE_TIMEOUT: &str = "MARGO_POOL_ACQUIRE_TIMEOUT";
    /// Connection lifetime override
    pub const POOL_MAX_LIFETIME: &str = "MARGO_POOL_MAX_LIFETIME";
    /// Idle timeout override
    pub const POOL_IDLE_TIMEOUT: &str = "MARGO_POOL_IDLE_TIMEOUT";
}
