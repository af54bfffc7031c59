// ABOUTME: Foundation crate for the margo entity persistence core
// ABOUTME: Error taxonomy, database constants, and connection configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Margo Core
//!
//! Types shared by the persistence engine and its callers that change far
//! less often than the engine itself.
//!
//! ## Modules
//!
//! - **errors**: `StoreError`, `ErrorCode`, and the `StoreResult` alias
//! - **constants**: connection defaults, pool limits, temporal formats
//! - **config**: `DatabaseConfig` / `PoolConfig` and DSN construction

/// Error taxonomy with stable codes
pub mod errors;

/// Connection, pool, and temporal-format constants
pub mod constants;

/// Database connection configuration
pub mod config;
