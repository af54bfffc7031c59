// ABOUTME: Hand-written statements over the Alpha table, run through the store's query/exec path
// ABOUTME: Projections, aggregates, bulk updates, and age-based purges outside the CRUD shapes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Template Queries
//!
//! Statements the column-subset operations cannot express. Rows come back as
//! [`Alpha`] values decoded by result-column name; columns a statement does not
//! project stay empty.

use crate::entities::Alpha;
use crate::outcome::{Ack, Scalar};
use crate::params::QueryParams;
use crate::store::Store;
use margo_core::errors::StoreResult;

/// Key used by [`exec_insert_hardcoded`]
pub const HARDCODED_UUID: &str = "11111111-1111-4111-8111-111111111111";

/// Rows written before this instant are purged by [`exec_delete_old_rows`]
pub const PURGE_BEFORE: &str = "2023-01-01 00:00:00";

/// Cats updated at or after this instant count as recent
pub const RECENT_SINCE: &str = "2025-01-01 00:00:00";

/// `Animal` and `BigNumber` of every row
pub const GET_ALL_ANIMALS: &str = "SELECT `Animal`, `BigNumber` FROM `Alpha`";

/// Recently updated cats, newest first
pub const GET_RECENT_CATS: &str = "SELECT `Uuid`, `Animal`, `LastUpdate` FROM `Alpha` \
     WHERE `Animal` = 'cat' AND `LastUpdate` >= ? ORDER BY `LastUpdate` DESC";

/// Full row by key
pub const GET_BY_UUID: &str = "SELECT `Uuid`, `FirstInsert`, `LastUpdate`, `Animal`, `BigNumber`, `test_field` \
     FROM `Alpha` WHERE `Uuid` = ?";

/// Number of rows whose `BigNumber` is `NULL`
pub const COUNT_NULL_BIG_NUMBERS: &str = "SELECT COUNT(*) AS `Count` FROM `Alpha` WHERE `BigNumber` IS NULL";

/// Insert with server-side timestamps
pub const INSERT_ONE: &str = "INSERT INTO `Alpha` (`Uuid`, `FirstInsert`, `LastUpdate`, `Animal`, `test_field`) \
     VALUES (?, NOW(6), NOW(6), ?, ?)";

/// Insert of a fixed row
pub const INSERT_HARDCODED: &str = "INSERT INTO `Alpha` (`Uuid`, `FirstInsert`, `LastUpdate`, `Animal`) \
     VALUES ('11111111-1111-4111-8111-111111111111', NOW(6), NOW(6), 'dog')";

/// Rename the animal of one row
pub const UPDATE_ANIMAL_NAME: &str = "UPDATE `Alpha` SET `Animal` = ? WHERE `Uuid` = ?";

/// Overwrite `test_field` on every row
pub const UPDATE_TEST_FIELD: &str = "UPDATE `Alpha` SET `test_field` = 'updated'";

/// Delete one row by key
pub const DELETE_BY_UUID: &str = "DELETE FROM `Alpha` WHERE `Uuid` = ?";

/// Delete rows first inserted before a cutoff
pub const DELETE_OLD_ROWS: &str = "DELETE FROM `Alpha` WHERE `FirstInsert` < ?";

/// Every row's animal and number
///
/// # Errors
///
/// Returns a driver error if the query fails
pub async fn query_get_all_animals(store: &Store) -> StoreResult<Vec<Alpha>> {
    store.query(GET_ALL_ANIMALS, &QueryParams::new()).await
}

/// Cats updated since [`RECENT_SINCE`]
///
/// # Errors
///
/// Returns a driver error if the query fails
pub async fn query_get_recent_cats(store: &Store) -> StoreResult<Vec<Alpha>> {
    let params = QueryParams::new().with_param(RECENT_SINCE);
    store.query(GET_RECENT_CATS, &params).await
}

/// The row keyed by `uuid`, if any
///
/// # Errors
///
/// Returns a driver error if the query fails
pub async fn query_get_by_uuid(store: &Store, uuid: &str) -> StoreResult<Option<Alpha>> {
    let params = QueryParams::new().with_param(uuid);
    store.query_one(GET_BY_UUID, &params).await
}

/// Count of rows with a `NULL` `BigNumber`, as the server's digit string
///
/// # Errors
///
/// Returns a driver error if the query fails
pub async fn query_count_null_big_numbers(store: &Store) -> StoreResult<Scalar> {
    store.query_scalar(COUNT_NULL_BIG_NUMBERS, &QueryParams::new()).await
}

/// Insert one row with server-side timestamps
///
/// # Errors
///
/// `ConstraintViolation` on a duplicate key, otherwise `Driver`
pub async fn exec_insert_one(store: &Store, uuid: &str, animal: &str, test_field: &str) -> StoreResult<Ack> {
    let params = QueryParams::new().with_params([uuid, animal, test_field]);
    store.exec(INSERT_ONE, &params).await
}

/// Insert the row keyed by [`HARDCODED_UUID`]
///
/// # Errors
///
/// `ConstraintViolation` if the row already exists, otherwise `Driver`
pub async fn exec_insert_hardcoded(store: &Store) -> StoreResult<Ack> {
    store.exec(INSERT_HARDCODED, &QueryParams::new()).await
}

/// Rename the animal of the row keyed by `uuid`
///
/// # Errors
///
/// Returns a driver error if the statement fails
pub async fn exec_update_animal_name(store: &Store, animal: &str, uuid: &str) -> StoreResult<Ack> {
    let params = QueryParams::new().with_params([animal, uuid]);
    store.exec(UPDATE_ANIMAL_NAME, &params).await
}

/// Set `test_field` to `"updated"` on every row
///
/// # Errors
///
/// Returns a driver error if the statement fails
pub async fn exec_update_test_field(store: &Store) -> StoreResult<Ack> {
    store.exec(UPDATE_TEST_FIELD, &QueryParams::new()).await
}

/// Delete the row keyed by `uuid`
///
/// # Errors
///
/// Returns a driver error if the statement fails
pub async fn exec_delete_by_uuid(store: &Store, uuid: &str) -> StoreResult<Ack> {
    let params = QueryParams::new().with_param(uuid);
    store.exec(DELETE_BY_UUID, &params).await
}

/// Delete rows first inserted before [`PURGE_BEFORE`]
///
/// # Errors
///
/// Returns a driver error if the statement fails
pub async fn exec_delete_old_rows(store: &Store) -> StoreResult<Ack> {
    let params = QueryParams::new().with_param(PURGE_BEFORE);
    store.exec(DELETE_OLD_ROWS, &params).await
}
