// ABOUTME: The Alpha entity: uuid-keyed animal rows with managed FirstInsert/LastUpdate columns
// ABOUTME: Column constants and the descriptor set for the `Alpha` table
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::schema::{Affinity, Entity, FieldDescriptor, Schema};
use std::sync::OnceLock;

/// Table name
pub const TABLE: &str = "Alpha";

/// Primary key
pub const FIELD_UUID: &str = "Uuid";
/// Creation timestamp, `DATETIME(6)`
pub const FIELD_FIRST_INSERT: &str = "FirstInsert";
/// Update timestamp, `DATETIME(6)`
pub const FIELD_LAST_UPDATE: &str = "LastUpdate";
/// Free-text animal name
pub const FIELD_ANIMAL: &str = "Animal";
/// Nullable `BIGINT UNSIGNED`
pub const FIELD_BIG_NUMBER: &str = "BigNumber";
/// Nullable text; the column name differs from the struct field
pub const FIELD_TEST_FIELD: &str = "test_field";

/// Every column, in declaration order
pub const FIELDS: [&str; 6] = [
    FIELD_UUID,
    FIELD_FIRST_INSERT,
    FIELD_LAST_UPDATE,
    FIELD_ANIMAL,
    FIELD_BIG_NUMBER,
    FIELD_TEST_FIELD,
];

/// One row of `Alpha`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alpha {
    /// `Uuid`
    pub uuid: String,
    /// `FirstInsert`
    pub first_insert: String,
    /// `LastUpdate`
    pub last_update: String,
    /// `Animal`
    pub animal: String,
    /// `BigNumber`
    pub big_number: String,
    /// `test_field`
    pub test_field: String,
}

impl Alpha {
    /// A row with only the key and animal set
    #[must_use]
    pub fn new(uuid: impl Into<String>, animal: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            animal: animal.into(),
            ..Self::default()
        }
    }
}

fn build_schema() -> Schema<Alpha> {
    Schema::new(
        TABLE,
        FIELD_UUID,
        vec![
            FieldDescriptor::text(
                FIELD_UUID,
                Affinity::Identifier,
                |e: &Alpha| &e.uuid,
                |e: &mut Alpha, v| e.uuid = v,
            ),
            FieldDescriptor::text(
                FIELD_FIRST_INSERT,
                Affinity::DateTime { precision: 6 },
                |e: &Alpha| &e.first_insert,
                |e: &mut Alpha, v| e.first_insert = v,
            ),
            FieldDescriptor::text(
                FIELD_LAST_UPDATE,
                Affinity::DateTime { precision: 6 },
                |e: &Alpha| &e.last_update,
                |e: &mut Alpha, v| e.last_update = v,
            ),
            FieldDescriptor::text(
                FIELD_ANIMAL,
                Affinity::Text,
                |e: &Alpha| &e.animal,
                |e: &mut Alpha, v| e.animal = v,
            ),
            FieldDescriptor::text(
                FIELD_BIG_NUMBER,
                Affinity::Integer {
                    unsigned: true,
                    bytes: 8,
                },
                |e: &Alpha| &e.big_number,
                |e: &mut Alpha, v| e.big_number = v,
            ),
            FieldDescriptor::text(
                FIELD_TEST_FIELD,
                Affinity::Text,
                |e: &Alpha| &e.test_field,
                |e: &mut Alpha, v| e.test_field = v,
            ),
        ],
    )
    .with_timestamps(FIELD_FIRST_INSERT, FIELD_LAST_UPDATE)
}

impl Entity for Alpha {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Alpha>> = OnceLock::new();
        SCHEMA.get_or_init(build_schema)
    }
}
