// ABOUTME: The AllTypes entity covering every MySQL column affinity the core supports
// ABOUTME: Used for exact round-trip checks of integers, decimals, bits, blobs, and temporals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::schema::{Affinity, Entity, FieldDescriptor, Schema};
use std::sync::OnceLock;

/// Table name
pub const TABLE: &str = "AllTypes";

/// Labels of `enum_field`
pub const ENUM_LABELS: &[&str] = &["one", "two", "three"];
/// Members of `set_field`
pub const SET_MEMBERS: &[&str] = &["a", "b", "c"];

/// Every column, in declaration order
pub const FIELDS: [&str; 45] = [
    "id",
    "tiny_signed",
    "tiny_unsigned",
    "small_signed",
    "small_unsigned",
    "medium_signed",
    "medium_unsigned",
    "int_signed",
    "int_unsigned",
    "big_signed",
    "big_unsigned",
    "float_field",
    "double_field",
    "real_field",
    "decimal_field",
    "dec_field",
    "numeric_field",
    "fixed_field",
    "bit1",
    "bit8",
    "bit64",
    "bool_field",
    "boolean_field",
    "char_field",
    "varchar_field",
    "text_field",
    "tinytext_field",
    "mediumtext_field",
    "longtext_field",
    "enum_field",
    "set_field",
    "binary_field",
    "varbinary_field",
    "blob_field",
    "tinyblob_field",
    "mediumblob_field",
    "longblob_field",
    "date_field",
    "time_field",
    "year_field",
    "datetime_field",
    "timestamp_field",
    "uuid_field",
    "nullable_int",
    "nullable_blob",
];

/// One row of `AllTypes`; textual columns as `String`, bit/binary/blob columns as bytes
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllTypes {
    pub id: String,
    pub tiny_signed: String,
    pub tiny_unsigned: String,
    pub small_signed: String,
    pub small_unsigned: String,
    pub medium_signed: String,
    pub medium_unsigned: String,
    pub int_signed: String,
    pub int_unsigned: String,
    pub big_signed: String,
    pub big_unsigned: String,
    pub float_field: String,
    pub double_field: String,
    pub real_field: String,
    pub decimal_field: String,
    pub dec_field: String,
    pub numeric_field: String,
    pub fixed_field: String,
    pub bit1: Vec<u8>,
    pub bit8: Vec<u8>,
    pub bit64: Vec<u8>,
    pub bool_field: String,
    pub boolean_field: String,
    pub char_field: String,
    pub varchar_field: String,
    pub text_field: String,
    pub tinytext_field: String,
    pub mediumtext_field: String,
    pub longtext_field: String,
    pub enum_field: String,
    pub set_field: String,
    pub binary_field: Vec<u8>,
    pub varbinary_field: Vec<u8>,
    pub blob_field: Vec<u8>,
    pub tinyblob_field: Vec<u8>,
    pub mediumblob_field: Vec<u8>,
    pub longblob_field: Vec<u8>,
    pub date_field: String,
    pub time_field: String,
    pub year_field: String,
    pub datetime_field: String,
    pub timestamp_field: String,
    pub uuid_field: String,
    pub nullable_int: String,
    pub nullable_blob: Vec<u8>,
}

macro_rules! text {
    ($field:ident, $affinity:expr) => {
        FieldDescriptor::text(
            stringify!($field),
            $affinity,
            |e: &AllTypes| &e.$field,
            |e: &mut AllTypes, v| e.$field = v,
        )
    };
}

macro_rules! bytes {
    ($field:ident, $affinity:expr) => {
        FieldDescriptor::bytes(
            stringify!($field),
            $affinity,
            |e: &AllTypes| &e.$field,
            |e: &mut AllTypes, v| e.$field = v,
        )
    };
}

const fn signed(bytes: u8) -> Affinity {
    Affinity::Integer {
        unsigned: false,
        bytes,
    }
}

const fn unsigned(bytes: u8) -> Affinity {
    Affinity::Integer {
        unsigned: true,
        bytes,
    }
}

const fn decimal(precision: u8, scale: u8) -> Affinity {
    Affinity::Decimal { precision, scale }
}

const DOUBLE: Affinity = Affinity::Float { single: false };

fn build_schema() -> Schema<AllTypes> {
    Schema::new(
        TABLE,
        "id",
        vec![
            text!(id, signed(4)),
            text!(tiny_signed, signed(1)),
            text!(tiny_unsigned, unsigned(1)),
            text!(small_signed, signed(2)),
            text!(small_unsigned, unsigned(2)),
            text!(medium_signed, signed(3)),
            text!(medium_unsigned, unsigned(3)),
            text!(int_signed, signed(4)),
            text!(int_unsigned, unsigned(4)),
            text!(big_signed, signed(8)),
            text!(big_unsigned, unsigned(8)),
            text!(float_field, Affinity::Float { single: true }),
            text!(double_field, DOUBLE),
            text!(real_field, DOUBLE),
            text!(decimal_field, decimal(20, 10)),
            text!(dec_field, decimal(10, 5)),
            text!(numeric_field, decimal(10, 7)),
            text!(fixed_field, decimal(10, 6)),
            bytes!(bit1, Affinity::Bit { bits: 1 }),
            bytes!(bit8, Affinity::Bit { bits: 8 }),
            bytes!(bit64, Affinity::Bit { bits: 64 }),
            text!(bool_field, Affinity::Boolean),
            text!(boolean_field, Affinity::Boolean),
            text!(char_field, Affinity::Char { length: 10 }),
            text!(varchar_field, Affinity::Text),
            text!(text_field, Affinity::Text),
            text!(tinytext_field, Affinity::Text),
            text!(mediumtext_field, Affinity::Text),
            text!(longtext_field, Affinity::Text),
            text!(enum_field, Affinity::Enum { labels: ENUM_LABELS }),
            text!(set_field, Affinity::Set { members: SET_MEMBERS }),
            bytes!(binary_field, Affinity::Binary { length: 16 }),
            bytes!(varbinary_field, Affinity::Blob),
            bytes!(blob_field, Affinity::Blob),
            bytes!(tinyblob_field, Affinity::Blob),
            bytes!(mediumblob_field, Affinity::Blob),
            bytes!(longblob_field, Affinity::Blob),
            text!(date_field, Affinity::Date),
            text!(time_field, Affinity::Time { precision: 0 }),
            text!(year_field, Affinity::Year),
            text!(datetime_field, Affinity::DateTime { precision: 6 }),
            text!(timestamp_field, Affinity::Timestamp { precision: 0 }),
            text!(uuid_field, Affinity::Identifier),
            text!(nullable_int, signed(4)),
            bytes!(nullable_blob, Affinity::Blob),
        ],
    )
}

impl Entity for AllTypes {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<AllTypes>> = OnceLock::new();
        SCHEMA.get_or_init(build_schema)
    }
}
