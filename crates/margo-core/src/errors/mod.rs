// ABOUTME: Error taxonomy for the margo entity persistence core
// ABOUTME: Field validation, value encoding, and driver failures with stable error codes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Error Handling
//!
//! Every operation of the persistence core reports its outcome through
//! [`StoreResult`]. The taxonomy is deliberately small:
//!
//! - [`StoreError::UnknownField`]: a builder referenced a column the entity does not declare
//! - [`StoreError::Encoding`]: a value cannot be represented in its column's affinity or width
//! - [`StoreError::Driver`] / [`StoreError::ConstraintViolation`]: anything surfaced by the driver
//!
//! Nothing here retries. [`StoreError::is_retryable`] is a hint for callers
//! that own a retry policy.

use std::fmt;
use thiserror::Error;

/// Stable error codes, grouped by origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Programmer errors (3000-3999)
    /// Column name not present in the entity's descriptor set
    UnknownField = 3000,
    /// Value not representable in the column's declared affinity
    InvalidEncoding = 3001,
    /// Statement would have no columns to write
    EmptyFieldSet = 3002,

    // Resource conflicts (4000-4999)
    /// Unique, foreign-key, not-null or check constraint rejected the write
    ConstraintViolation = 4001,

    // Configuration (6000-6999)
    /// Connection configuration missing or malformed
    ConfigInvalid = 6002,

    // Driver (9000-9999)
    /// Any other failure surfaced by the database driver
    DatabaseError = 9001,
}

impl ErrorCode {
    /// Short human-readable description of the code
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::UnknownField => "The referenced column is not declared by the entity",
            Self::InvalidEncoding => "The value cannot be encoded for its column",
            Self::EmptyFieldSet => "The statement has no columns to write",
            Self::ConstraintViolation => "A database constraint rejected the write",
            Self::ConfigInvalid => "Database configuration is invalid",
            Self::DatabaseError => "Database operation failed",
        }
    }

    /// Numeric value of the code
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_u16())
    }
}

/// Errors produced by the persistence core
#[derive(Debug, Error)]
pub enum StoreError {
    /// A builder referenced a column that is not part of the entity
    #[error("unknown field '{field}' for entity '{entity}'")]
    UnknownField {
        /// Table name of the entity
        entity: &'static str,
        /// Offending column name
        field: String,
    },

    /// A value cannot be represented in its column
    #[error("cannot encode field '{field}': {reason}")]
    Encoding {
        /// Column name
        field: String,
        /// What was wrong with the value
        reason: String,
    },

    /// An UPDATE with nothing to SET
    #[error("{operation} on '{entity}' has no fields to write")]
    EmptyFieldSet {
        /// Statement kind (e.g. `UPDATE`)
        operation: &'static str,
        /// Table name of the entity
        entity: &'static str,
    },

    /// The server rejected a write because of a key or constraint conflict
    #[error("constraint violation: {message}")]
    ConstraintViolation {
        /// Server message
        message: String,
    },

    /// Connection configuration is missing or malformed
    #[error("invalid database configuration: {0}")]
    Config(String),

    /// Any other driver failure (syntax, connectivity, timeout, decoding)
    #[error("database driver error: {0}")]
    Driver(#[source] sqlx::Error),
}

impl StoreError {
    /// Build an [`StoreError::UnknownField`]
    pub fn unknown_field(entity: &'static str, field: impl Into<String>) -> Self {
        Self::UnknownField {
            entity,
            field: field.into(),
        }
    }

    /// Build an [`StoreError::Encoding`]
    pub fn encoding(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Encoding {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`StoreError::Config`]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Stable code for this error
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownField { .. } => ErrorCode::UnknownField,
            Self::Encoding { .. } => ErrorCode::InvalidEncoding,
            Self::EmptyFieldSet { .. } => ErrorCode::EmptyFieldSet,
            Self::ConstraintViolation { .. } => ErrorCode::ConstraintViolation,
            Self::Config(_) => ErrorCode::ConfigInvalid,
            Self::Driver(_) => ErrorCode::DatabaseError,
        }
    }

    /// True when the failure came from the driver rather than from the caller's input
    #[must_use]
    pub const fn is_driver(&self) -> bool {
        matches!(self, Self::Driver(_) | Self::ConstraintViolation { .. })
    }

    /// True for transient driver failures (deadlock, lock wait, pool or I/O timeouts)
    ///
    /// The core never acts on this; it exists for external retry policies.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Driver(sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut) => true,
            Self::Driver(sqlx::Error::Database(db)) => is_retryable_message(db.message()),
            _ => false,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &error {
            if matches!(
                db.kind(),
                sqlx::error::ErrorKind::UniqueViolation
                    | sqlx::error::ErrorKind::ForeignKeyViolation
                    | sqlx::error::ErrorKind::NotNullViolation
                    | sqlx::error::ErrorKind::CheckViolation
            ) {
                return Self::ConstraintViolation {
                    message: db.message().to_owned(),
                };
            }
        }
        Self::Driver(error)
    }
}

/// Transient server conditions worth a retry by whoever owns the policy
fn is_retryable_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("deadlock")
        || lower.contains("lock wait timeout")
        || lower.contains("timed out")
        || lower.contains("timeout")
}

/// Result alias used throughout the persistence core
pub type StoreResult<T> = Result<T, StoreError>;
