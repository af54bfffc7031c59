// ABOUTME: Unit tests for the store error taxonomy
// ABOUTME: Stable codes, messages, driver classification, and retryability hints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use margo::{ErrorCode, StoreError};
use std::io;

#[test]
fn test_error_code_values_are_stable() {
    assert_eq!(ErrorCode::UnknownField.as_u16(), 3000);
    assert_eq!(ErrorCode::InvalidEncoding.as_u16(), 3001);
    assert_eq!(ErrorCode::EmptyFieldSet.as_u16(), 3002);
    assert_eq!(ErrorCode::ConstraintViolation.as_u16(), 4001);
    assert_eq!(ErrorCode::ConfigInvalid.as_u16(), 6002);
    assert_eq!(ErrorCode::DatabaseError.as_u16(), 9001);

    assert_eq!(
        ErrorCode::EmptyFieldSet.to_string(),
        "The statement has no columns to write (3002)"
    );
}

#[test]
fn test_caller_errors_are_not_driver_errors() {
    let unknown = StoreError::unknown_field("Alpha", "Colour");
    assert_eq!(unknown.code(), ErrorCode::UnknownField);
    assert_eq!(
        unknown.to_string(),
        "unknown field 'Colour' for entity 'Alpha'"
    );
    assert!(!unknown.is_driver());
    assert!(!unknown.is_retryable());

    let encoding = StoreError::encoding("BigNumber", "not an integer");
    assert_eq!(encoding.code(), ErrorCode::InvalidEncoding);
    assert_eq!(
        encoding.to_string(),
        "cannot encode field 'BigNumber': not an integer"
    );

    let empty = StoreError::EmptyFieldSet {
        operation: "update",
        entity: "Beta",
    };
    assert_eq!(empty.to_string(), "update on 'Beta' has no fields to write");
    assert!(!empty.is_driver());

    let config = StoreError::config("MARGO_DB_USER is required");
    assert_eq!(config.code(), ErrorCode::ConfigInvalid);
    assert!(!config.is_retryable());
}

#[test]
fn test_driver_errors_are_classified() {
    let timeout = StoreError::from(sqlx::Error::PoolTimedOut);
    assert!(matches!(timeout, StoreError::Driver(_)));
    assert_eq!(timeout.code(), ErrorCode::DatabaseError);
    assert!(timeout.is_driver());
    assert!(timeout.is_retryable());

    let io = StoreError::from(sqlx::Error::Io(io::Error::new(
        io::ErrorKind::ConnectionReset,
        "reset",
    )));
    assert!(io.is_retryable());

    let missing = StoreError::from(sqlx::Error::RowNotFound);
    assert!(missing.is_driver());
    assert!(!missing.is_retryable());
}

#[test]
fn test_constraint_violation_counts_as_driver_failure() {
    let err = StoreError::ConstraintViolation {
        message: "Duplicate entry 'k' for key 'PRIMARY'".into(),
    };
    assert_eq!(err.code(), ErrorCode::ConstraintViolation);
    assert!(err.is_driver());
    assert!(!err.is_retryable());
}
