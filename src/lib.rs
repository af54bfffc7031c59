// ABOUTME: Main library entry point for the margo entity persistence core
// ABOUTME: Reflection-free CRUD over MySQL with byte-faithful column values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Margo
//!
//! Persistence core for record-shaped entities stored in MySQL. Each entity
//! type declares a fixed descriptor set once; CRUD operations are then driven
//! by lists of column names rather than by runtime type inspection.
//!
//! ## Features
//!
//! - **Column subsets**: insert, update, and filter on exactly the columns named
//! - **Exact values**: every column travels as an exact string or byte sequence
//! - **Managed timestamps**: creation/update columns filled unless the caller names them
//! - **Hand-written SQL**: positional parameters with rows decoded by column name
//!
//! ## Architecture
//!
//! - **schema**: field descriptors and the `Entity` trait
//! - **params**: the query parameter builder
//! - **sql**: pure statement assembly
//! - **codec**: per-affinity encoding and row decoding
//! - **timestamps**: clock and timestamp injection
//! - **store**: the execution engine over a `MySqlPool`
//! - **outcome**: the result envelope
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use margo::entities::{alpha, Alpha};
//! use margo::{QueryParams, Store};
//! use margo_core::config::DatabaseConfig;
//! use margo_core::errors::StoreResult;
//!
//! #[tokio::main]
//! async fn main() -> StoreResult<()> {
//!     let store = Store::connect(&DatabaseConfig::from_env()?).await?;
//!
//!     let mut cat = Alpha::new("0b6c1b52-3f4e-4b8e-9a57-3c1d0f6f2a11", "cat");
//!     store
//!         .insert(&mut cat, &QueryParams::new().with_insert([alpha::FIELD_UUID, alpha::FIELD_ANIMAL]))
//!         .await?;
//!
//!     let by_key = QueryParams::new().with_where([alpha::FIELD_UUID]);
//!     assert!(store.exists(&cat, &by_key).await?);
//!     Ok(())
//! }
//! ```

/// Per-affinity value encoding and row decoding
pub mod codec;

/// Example entity types
pub mod entities;

/// Logging configuration and statement events
pub mod logging;

/// Result envelope
pub mod outcome;

/// Query parameter builder
pub mod params;

/// Hand-written statements over the `Alpha` table
pub mod queries;

/// Field descriptor sets and the `Entity` trait
pub mod schema;

/// Pure SQL assembly
pub mod sql;

/// Execution engine
pub mod store;

/// Clock and timestamp injection
pub mod timestamps;

/// Values crossing the entity and driver boundaries
pub mod value;

pub use margo_core::errors::{ErrorCode, StoreError, StoreResult};
pub use outcome::{Ack, Outcome, Scalar};
pub use params::QueryParams;
pub use schema::{Affinity, AffinityClass, Entity, FieldDescriptor, Schema};
pub use store::{Command, Store};
pub use timestamps::{Clock, FixedClock, SystemClock};
pub use value::{BindValue, FieldRef, FieldValue};
