// ABOUTME: Value types crossing the entity boundary and the driver boundary
// ABOUTME: Borrowed field views, owned decoded values, and positional bind values

// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{NaiveDate, NaiveDateTime};
use std::borrow::Cow;
use std::string::FromUtf8Error;

/// Borrowed view of one entity field, as returned by a descriptor's accessor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRef<'a> {
    /// Textual column value
    Text(&'a str),
    /// Raw bytes (bit, binary, blob columns)
    Bytes(&'a [u8]),
}

impl<'a> FieldRef<'a> {
    /// Raw bytes of the value regardless of representation
    #[must_use]
    pub const fn as_bytes(&self) -> &'a [u8] {
        match *self {
            Self::Text(s) => s.as_bytes(),
            Self::Bytes(b) => b,
        }
    }

    /// Length in bytes
    #[must_use]
    pub const fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// True for `""` / empty byte sequences
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Owned copy of the value
    #[must_use]
    pub fn to_owned_value(&self) -> FieldValue {
        match *self {
            Self::Text(s) => FieldValue::Text(s.to_owned()),
            Self::Bytes(b) => FieldValue::Bytes(b.to_vec()),
        }
    }
}

/// Owned field value produced by row decoding and handed to a descriptor's mutator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Textual column value
    Text(String),
    /// Raw bytes
    Bytes(Vec<u8>),
}

impl FieldValue {
    /// Text form
    ///
    /// # Errors
    ///
    /// Raw bytes that are not valid UTF-8
    pub fn into_text(self) -> Result<String, FromUtf8Error> {
        match self {
            Self::Text(s) => Ok(s),
            Self::Bytes(b) => String::from_utf8(b),
        }
    }

    /// Byte form
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Text(s) => s.into_bytes(),
            Self::Bytes(b) => b,
        }
    }

    /// Borrowed view
    #[must_use]
    pub fn as_field_ref(&self) -> FieldRef<'_> {
        match self {
            Self::Text(s) => FieldRef::Text(s),
            Self::Bytes(b) => FieldRef::Bytes(b),
        }
    }
}

/// A value bound to a `?` placeholder
///
/// Entity columns bind as text, bytes, or (for integer and boolean columns) a
/// native integer parsed from the exact digit string.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    /// SQL `NULL`
    Null,
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    UInt(u64),
    /// Double-precision float
    Float(f64),
    /// Boolean (sent as `TINYINT`)
    Bool(bool),
    /// Text
    Text(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Calendar date
    Date(NaiveDate),
    /// Date and time (microsecond precision on the wire)
    DateTime(NaiveDateTime),
}

impl BindValue {
    /// Short type label used in logs
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Date(_) => "date",
            Self::DateTime(_) => "datetime",
        }
    }
}

impl From<FieldValue> for BindValue {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Text(s) => Self::Text(s),
            FieldValue::Bytes(b) => Self::Bytes(b),
        }
    }
}

impl From<&str> for BindValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for BindValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Cow<'_, str>> for BindValue {
    fn from(value: Cow<'_, str>) -> Self {
        Self::Text(value.into_owned())
    }
}

impl From<Vec<u8>> for BindValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for BindValue {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<i64> for BindValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for BindValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u64> for BindValue {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<u32> for BindValue {
    fn from(value: u32) -> Self {
        Self::UInt(u64::from(value))
    }
}

impl From<f64> for BindValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for BindValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NaiveDate> for BindValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDateTime> for BindValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl<T> From<Option<T>> for BindValue
where
    T: Into<Self>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
