// ABOUTME: Field descriptor sets mapping entity fields to table columns without reflection
// ABOUTME: Ordered column names, SQL affinities, and accessor/mutator pairs per entity type
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Field Descriptor Sets
//!
//! Each entity type declares, once, an ordered list of [`FieldDescriptor`]s.
//! A descriptor binds a column name and its SQL [`Affinity`] to a pair of
//! plain function pointers that read and write the corresponding struct field.
//! Column-subset operations look fields up by name and go through these
//! pointers, so no runtime type inspection is ever needed.
//!
//! ```text
//! static SCHEMA: OnceLock<Schema<Alpha>> = OnceLock::new();
//! SCHEMA.get_or_init(|| {
//!     Schema::new("Alpha", "Uuid", vec![
//!         FieldDescriptor::text(
//!             "Uuid",
//!             Affinity::Identifier,
//!             |e: &Alpha| &e.uuid,
//!             |e: &mut Alpha, v| e.uuid = v,
//!         ),
//!     ])
//!     .with_timestamps("FirstInsert", "LastUpdate")
//! });
//! ```

use crate::value::{FieldRef, FieldValue};
use margo_core::errors::{StoreError, StoreResult};
use std::fmt;

/// Declared SQL affinity of a column
///
/// The affinity decides how a value is validated and bound on write and how
/// it is decoded on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affinity {
    /// `TINYINT` .. `BIGINT`
    Integer {
        /// Declared `UNSIGNED`
        unsigned: bool,
        /// Storage width in bytes: 1, 2, 3, 4 or 8
        bytes: u8,
    },
    /// `FLOAT`, `DOUBLE`, `REAL`
    Float {
        /// `FLOAT` (single precision) rather than `DOUBLE`
        single: bool,
    },
    /// `DECIMAL(M, D)`, `NUMERIC`, `FIXED`
    Decimal {
        /// Total significant digits (`M`)
        precision: u8,
        /// Digits after the decimal point (`D`)
        scale: u8,
    },
    /// `BIT(n)`, 1 to 64 bits
    Bit {
        /// Declared bit width
        bits: u8,
    },
    /// `BOOL` / `BOOLEAN` / `TINYINT(1)`
    Boolean,
    /// `CHAR(n)`
    Char {
        /// Declared length in characters
        length: u32,
    },
    /// `VARCHAR`, `TEXT` and its variants
    Text,
    /// `BINARY(n)`, zero-padded to `length`
    Binary {
        /// Declared length in bytes
        length: u32,
    },
    /// `VARBINARY`, `BLOB` and its variants
    Blob,
    /// `ENUM(...)`
    Enum {
        /// Labels in declaration order
        labels: &'static [&'static str],
    },
    /// `SET(...)`
    Set {
        /// Members in declaration order
        members: &'static [&'static str],
    },
    /// `DATE`
    Date,
    /// `TIME(fsp)`
    Time {
        /// Fractional-second digits (0-6)
        precision: u8,
    },
    /// `DATETIME(fsp)`
    DateTime {
        /// Fractional-second digits (0-6)
        precision: u8,
    },
    /// `TIMESTAMP(fsp)`
    Timestamp {
        /// Fractional-second digits (0-6)
        precision: u8,
    },
    /// `YEAR`
    Year,
    /// UUID-like opaque identifier stored in a character column
    Identifier,
}

/// Coarse grouping of affinities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AffinityClass {
    /// Integers, floats, decimals, bits, booleans
    Numeric,
    /// `CHAR(n)`, enums, sets
    FixedString,
    /// `VARCHAR` / `TEXT`, identifiers
    VariableString,
    /// Binary and blob columns
    Binary,
    /// Dates, times, timestamps, years
    Temporal,
}

impl Affinity {
    /// Coarse class of this affinity
    #[must_use]
    pub const fn class(&self) -> AffinityClass {
        match self {
            Self::Integer { .. } | Self::Float { .. } | Self::Decimal { .. } | Self::Bit { .. } | Self::Boolean => {
                AffinityClass::Numeric
            }
            Self::Char { .. } | Self::Enum { .. } | Self::Set { .. } => AffinityClass::FixedString,
            Self::Text | Self::Identifier => AffinityClass::VariableString,
            Self::Binary { .. } | Self::Blob => AffinityClass::Binary,
            Self::Date | Self::Time { .. } | Self::DateTime { .. } | Self::Timestamp { .. } | Self::Year => {
                AffinityClass::Temporal
            }
        }
    }

    /// True when values are carried as raw bytes rather than text
    #[must_use]
    pub const fn is_bytes(&self) -> bool {
        matches!(self, Self::Bit { .. } | Self::Binary { .. } | Self::Blob)
    }

    /// Fractional-second digits for temporal affinities, `0` otherwise
    #[must_use]
    pub const fn precision(&self) -> u8 {
        match self {
            Self::Time { precision } | Self::DateTime { precision } | Self::Timestamp { precision } => *precision,
            _ => 0,
        }
    }
}

impl fmt::Display for Affinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer { unsigned: false, bytes } => write!(f, "int{}", u32::from(*bytes) * 8),
            Self::Integer { unsigned: true, bytes } => write!(f, "uint{}", u32::from(*bytes) * 8),
            Self::Float { single: true } => f.write_str("float"),
            Self::Float { single: false } => f.write_str("double"),
            Self::Decimal { precision, scale } => write!(f, "decimal({precision},{scale})"),
            Self::Bit { bits } => write!(f, "bit({bits})"),
            Self::Boolean => f.write_str("boolean"),
            Self::Char { length } => write!(f, "char({length})"),
            Self::Text => f.write_str("text"),
            Self::Binary { length } => write!(f, "binary({length})"),
            Self::Blob => f.write_str("blob"),
            Self::Enum { .. } => f.write_str("enum"),
            Self::Set { .. } => f.write_str("set"),
            Self::Date => f.write_str("date"),
            Self::Time { precision } => write!(f, "time({precision})"),
            Self::DateTime { precision } => write!(f, "datetime({precision})"),
            Self::Timestamp { precision } => write!(f, "timestamp({precision})"),
            Self::Year => f.write_str("year"),
            Self::Identifier => f.write_str("identifier"),
        }
    }
}

/// Reads and writes one struct field
pub enum Accessor<E> {
    /// Field held as `String`
    Text {
        /// Borrow the field
        get: fn(&E) -> &str,
        /// Replace the field
        set: fn(&mut E, String),
    },
    /// Field held as `Vec<u8>`
    Bytes {
        /// Borrow the field
        get: fn(&E) -> &[u8],
        /// Replace the field
        set: fn(&mut E, Vec<u8>),
    },
}

/// One column of an entity: name, position, affinity, and accessor pair
pub struct FieldDescriptor<E> {
    name: &'static str,
    ordinal: usize,
    affinity: Affinity,
    accessor: Accessor<E>,
}

impl<E> FieldDescriptor<E> {
    /// Descriptor for a field stored as `String`
    pub fn text(
        name: &'static str,
        affinity: Affinity,
        get: fn(&E) -> &str,
        set: fn(&mut E, String),
    ) -> Self {
        Self {
            name,
            ordinal: 0,
            affinity,
            accessor: Accessor::Text { get, set },
        }
    }

    /// Descriptor for a field stored as `Vec<u8>`
    pub fn bytes(
        name: &'static str,
        affinity: Affinity,
        get: fn(&E) -> &[u8],
        set: fn(&mut E, Vec<u8>),
    ) -> Self {
        Self {
            name,
            ordinal: 0,
            affinity,
            accessor: Accessor::Bytes { get, set },
        }
    }

    /// Column name (exact, case-sensitive)
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Zero-based position in the descriptor set
    #[must_use]
    pub const fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Declared SQL affinity
    #[must_use]
    pub const fn affinity(&self) -> Affinity {
        self.affinity
    }

    /// Borrow this field's current value on `entity`
    pub fn read<'a>(&self, entity: &'a E) -> FieldRef<'a> {
        match &self.accessor {
            Accessor::Text { get, .. } => FieldRef::Text(get(entity)),
            Accessor::Bytes { get, .. } => FieldRef::Bytes(get(entity)),
        }
    }

    /// Store `value` into this field on `entity`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Encoding`] when bytes that are not UTF-8 target a
    /// `String` field; `entity` is left unchanged
    pub fn write(&self, entity: &mut E, value: FieldValue) -> StoreResult<()> {
        match &self.accessor {
            Accessor::Text { set, .. } => {
                let text = value.into_text().map_err(|e| {
                    StoreError::encoding(self.name, format!("value is not UTF-8: {e}"))
                })?;
                set(entity, text);
            }
            Accessor::Bytes { set, .. } => set(entity, value.into_bytes()),
        }
        Ok(())
    }
}

impl<E> fmt::Debug for FieldDescriptor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("ordinal", &self.ordinal)
            .field("affinity", &self.affinity)
            .finish_non_exhaustive()
    }
}

/// The ordered descriptor set of one entity type, plus its table metadata
pub struct Schema<E> {
    table: &'static str,
    primary_key: &'static str,
    fields: Vec<FieldDescriptor<E>>,
    created_at: Option<&'static str>,
    updated_at: Option<&'static str>,
}

impl<E> Schema<E> {
    /// Build a schema; ordinals follow the order of `fields`
    #[must_use]
    pub fn new(table: &'static str, primary_key: &'static str, fields: Vec<FieldDescriptor<E>>) -> Self {
        let fields = fields
            .into_iter()
            .enumerate()
            .map(|(ordinal, mut field)| {
                field.ordinal = ordinal;
                field
            })
            .collect();
        Self {
            table,
            primary_key,
            fields,
            created_at: None,
            updated_at: None,
        }
    }

    /// Declare the creation and update timestamp columns managed by the timestamp policy
    #[must_use]
    pub fn with_timestamps(mut self, created_at: &'static str, updated_at: &'static str) -> Self {
        self.created_at = Some(created_at);
        self.updated_at = Some(updated_at);
        self
    }

    /// Table name
    #[must_use]
    pub const fn table(&self) -> &'static str {
        self.table
    }

    /// Primary-key column name
    #[must_use]
    pub const fn primary_key(&self) -> &'static str {
        self.primary_key
    }

    /// All descriptors in declaration order
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor<E>] {
        &self.fields
    }

    /// Column names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(FieldDescriptor::name)
    }

    /// Number of declared columns
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no columns are declared
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when `name` is a declared column
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Descriptor for `name`, if declared
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&FieldDescriptor<E>> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Descriptor for `name`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownField`] if the column is not declared
    pub fn field(&self, name: &str) -> StoreResult<&FieldDescriptor<E>> {
        self.lookup(name)
            .ok_or_else(|| StoreError::unknown_field(self.table, name))
    }

    /// Descriptors for `names`, in the order given
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownField`] for the first undeclared name
    pub fn resolve<S>(&self, names: &[S]) -> StoreResult<Vec<&FieldDescriptor<E>>>
    where
        S: AsRef<str>,
    {
        names.iter().map(|name| self.field(name.as_ref())).collect()
    }

    /// Creation-timestamp descriptor, when the entity declares one
    #[must_use]
    pub fn created_at(&self) -> Option<&FieldDescriptor<E>> {
        self.created_at.and_then(|name| self.lookup(name))
    }

    /// Update-timestamp descriptor, when the entity declares one
    #[must_use]
    pub fn updated_at(&self) -> Option<&FieldDescriptor<E>> {
        self.updated_at.and_then(|name| self.lookup(name))
    }
}

impl<E> fmt::Debug for Schema<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("table", &self.table)
            .field("primary_key", &self.primary_key)
            .field("fields", &self.fields)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// A record type mapped to one table
///
/// Implementations hand out a `'static` schema, typically from a `OnceLock`.
pub trait Entity: Default + Send + Sync + Unpin + 'static {
    /// The entity's descriptor set
    fn schema() -> &'static Schema<Self>;

    /// Table name
    fn table() -> &'static str {
        Self::schema().table()
    }
}
