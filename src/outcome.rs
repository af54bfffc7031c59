// ABOUTME: Uniform result envelope for persistence operations
// ABOUTME: Rows, existence probes, write acknowledgements, and single scalars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use sqlx::mysql::MySqlQueryResult;

/// Acknowledgement of a write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ack {
    /// Rows the server reports as affected
    pub rows_affected: u64,
    /// `LAST_INSERT_ID()` after the statement, `0` when none was generated
    pub last_insert_id: u64,
}

impl From<MySqlQueryResult> for Ack {
    fn from(result: MySqlQueryResult) -> Self {
        Self {
            rows_affected: result.rows_affected(),
            last_insert_id: result.last_insert_id(),
        }
    }
}

/// First column of the first row of a hand-written query
///
/// `None` when the query produced no row or the cell was `NULL`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scalar(pub Option<String>);

impl Scalar {
    /// The value as text
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// The value parsed as a signed integer
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_str().and_then(|s| s.parse().ok())
    }

    /// The value parsed as an unsigned integer
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        self.as_str().and_then(|s| s.parse().ok())
    }

    /// True when no value came back
    #[must_use]
    pub const fn is_none(&self) -> bool {
        self.0.is_none()
    }

    /// Unwrap into the inner text
    #[must_use]
    pub fn into_inner(self) -> Option<String> {
        self.0
    }
}

/// Result of any persistence operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<E> {
    /// Materialized rows, in server order
    Rows(Vec<E>),
    /// Whether at least one row matched
    Probe(bool),
    /// Write acknowledgement
    Ack(Ack),
    /// Single value
    Scalar(Scalar),
}

impl<E> Outcome<E> {
    /// Rows, if this is a row outcome
    #[must_use]
    pub fn into_rows(self) -> Option<Vec<E>> {
        match self {
            Self::Rows(rows) => Some(rows),
            _ => None,
        }
    }

    /// Probe answer, if this is a probe outcome
    #[must_use]
    pub const fn probe(&self) -> Option<bool> {
        match self {
            Self::Probe(found) => Some(*found),
            _ => None,
        }
    }

    /// Acknowledgement, if this is a write outcome
    #[must_use]
    pub const fn ack(&self) -> Option<Ack> {
        match self {
            Self::Ack(ack) => Some(*ack),
            _ => None,
        }
    }

    /// Scalar, if this is a scalar outcome
    #[must_use]
    pub fn into_scalar(self) -> Option<Scalar> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Rows affected for writes, rows returned for reads, `0`/`1` for probes
    #[must_use]
    pub fn row_count(&self) -> u64 {
        match self {
            Self::Rows(rows) => rows.len() as u64,
            Self::Probe(found) => u64::from(*found),
            Self::Ack(ack) => ack.rows_affected,
            Self::Scalar(scalar) => u64::from(!scalar.is_none()),
        }
    }
}
