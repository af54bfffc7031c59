// ABOUTME: Database tests for the Beta entity against a live MySQL server
// ABOUTME: Injected timestamps, caller overrides of the update column, and unguarded updates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use margo::entities::{beta, Beta};
use margo::QueryParams;
use serial_test::serial;

fn by_uuid() -> QueryParams {
    QueryParams::new().with_where([beta::FIELD_UUID])
}

async fn insert_named(store: &margo::Store, name: &str) -> Result<Beta> {
    let mut row = Beta {
        uuid: common::new_uuid(),
        name: name.into(),
        ..Beta::default()
    };
    store
        .insert(
            &mut row,
            &QueryParams::new().with_insert([beta::FIELD_UUID, beta::FIELD_NAME]),
        )
        .await?;
    Ok(row)
}

#[tokio::test]
#[serial]
#[ignore = "Requires MySQL server (MARGO_TEST_DATABASE_URL)"]
async fn test_manual_update_timestamp_is_kept() -> Result<()> {
    let store = common::test_store().await?;
    let store = store.with_clock(common::fixed_clock());

    let mut row = insert_named(&store, "original").await?;
    assert_eq!(row.first_insert, "2025-06-30 12:00:00.123456");

    row.last_update = "2000-01-01 00:00:00.123456".into();
    let ack = store
        .update(
            &mut row,
            &QueryParams::new()
                .with_update([beta::FIELD_LAST_UPDATE])
                .with_where([beta::FIELD_UUID]),
        )
        .await?;
    assert_eq!(ack.rows_affected, 1);
    assert_eq!(row.last_update, "2000-01-01 00:00:00.123456");

    let mut loaded = Beta {
        uuid: row.uuid.clone(),
        ..Beta::default()
    };
    assert!(store.load(&mut loaded, &by_uuid()).await?);
    assert_eq!(loaded.last_update, "2000-01-01 00:00:00.123456");
    assert_eq!(loaded.first_insert, "2025-06-30 12:00:00.123456");
    assert_eq!(loaded.name, "original");
    Ok(())
}

#[tokio::test]
#[serial]
#[ignore = "Requires MySQL server (MARGO_TEST_DATABASE_URL)"]
async fn test_update_without_columns_only_touches_the_timestamp() -> Result<()> {
    let store = common::test_store().await?;

    let mut row = insert_named(&store, "steady").await?;
    row.name = "ignored".into();

    let store = store.with_clock(common::fixed_clock());
    store.update(&mut row, &by_uuid()).await?;

    let mut loaded = Beta {
        uuid: row.uuid.clone(),
        ..Beta::default()
    };
    assert!(store.load(&mut loaded, &by_uuid()).await?);
    assert_eq!(loaded.name, "steady");
    assert_eq!(loaded.last_update, "2025-06-30 12:00:00.123456");
    Ok(())
}

#[tokio::test]
#[serial]
#[ignore = "Requires MySQL server (MARGO_TEST_DATABASE_URL)"]
async fn test_update_without_predicate_reaches_every_row() -> Result<()> {
    let store = common::test_store().await?;
    store.truncate::<Beta>().await?;

    insert_named(&store, "first").await?;
    insert_named(&store, "second").await?;

    let mut template = Beta {
        name: "renamed".into(),
        ..Beta::default()
    };
    let ack = store
        .update(
            &mut template,
            &QueryParams::new().with_update([beta::FIELD_NAME]),
        )
        .await?;
    assert_eq!(ack.rows_affected, 2);

    let rows = store.select_all::<Beta>().await?;
    assert!(rows.iter().all(|row| row.name == "renamed"));
    Ok(())
}
