// ABOUTME: The Beta entity: named rows with snake_case managed timestamp columns
// ABOUTME: Exercises caller-supplied update timestamps overriding the injected default
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::schema::{Affinity, Entity, FieldDescriptor, Schema};
use std::sync::OnceLock;

/// Table name
pub const TABLE: &str = "Beta";

/// Primary key
pub const FIELD_UUID: &str = "uuid";
/// Display name
pub const FIELD_NAME: &str = "name";
/// Creation timestamp, `DATETIME(6)`
pub const FIELD_FIRST_INSERT: &str = "first_insert";
/// Update timestamp, `DATETIME(6)`
pub const FIELD_LAST_UPDATE: &str = "last_update";

/// Every column, in declaration order
pub const FIELDS: [&str; 4] = [FIELD_UUID, FIELD_NAME, FIELD_FIRST_INSERT, FIELD_LAST_UPDATE];

/// One row of `Beta`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Beta {
    /// `uuid`
    pub uuid: String,
    /// `name`
    pub name: String,
    /// `first_insert`
    pub first_insert: String,
    /// `last_update`
    pub last_update: String,
}

fn build_schema() -> Schema<Beta> {
    Schema::new(
        TABLE,
        FIELD_UUID,
        vec![
            FieldDescriptor::text(
                FIELD_UUID,
                Affinity::Identifier,
                |e: &Beta| &e.uuid,
                |e: &mut Beta, v| e.uuid = v,
            ),
            FieldDescriptor::text(
                FIELD_NAME,
                Affinity::Text,
                |e: &Beta| &e.name,
                |e: &mut Beta, v| e.name = v,
            ),
            FieldDescriptor::text(
                FIELD_FIRST_INSERT,
                Affinity::DateTime { precision: 6 },
                |e: &Beta| &e.first_insert,
                |e: &mut Beta, v| e.first_insert = v,
            ),
            FieldDescriptor::text(
                FIELD_LAST_UPDATE,
                Affinity::DateTime { precision: 6 },
                |e: &Beta| &e.last_update,
                |e: &mut Beta, v| e.last_update = v,
            ),
        ],
    )
    .with_timestamps(FIELD_FIRST_INSERT, FIELD_LAST_UPDATE)
}

impl Entity for Beta {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Beta>> = OnceLock::new();
        SCHEMA.get_or_init(build_schema)
    }
}
