// ABOUTME: Per-affinity value encoding for binds and byte-faithful decoding of MySQL rows
// ABOUTME: Validates widths and formats before any network call; never normalizes values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Value Codec
//!
//! Entity values are exact strings or byte sequences. Encoding validates a
//! value against its column's [`Affinity`] and produces the [`BindValue`] sent
//! to the server; decoding turns a row cell back into the same representation.
//!
//! | Affinity | Wire form |
//! |---|---|
//! | integer | digit string, no leading zeros, within the declared width (bound as a native integer) |
//! | float | digit string as given |
//! | decimal | digit string as given, within the declared precision and scale |
//! | bit | big-endian bytes, left-padded to the declared byte width |
//! | boolean | `"0"` / `"1"` |
//! | char / text / enum / set / identifier | string as given |
//! | binary | bytes, right-padded with `0x00` to the declared width |
//! | blob | bytes as given |
//! | temporal | canonical text at the declared fractional precision |
//!
//! An empty value on any column other than char, text, set, identifier or
//! blob binds as SQL `NULL`, which decodes back to empty.

use crate::schema::{Affinity, Entity, FieldDescriptor};
use crate::value::{BindValue, FieldRef, FieldValue};
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use margo_core::constants::temporal;
use margo_core::errors::{StoreError, StoreResult};
use sqlx::mysql::types::MySqlTime;
use sqlx::mysql::MySqlRow;
use sqlx::{Column, Row, TypeInfo};
use tracing::trace;

/// Encode the current value of `field` on `entity`
///
/// # Errors
///
/// Returns [`StoreError::Encoding`] if the value does not fit the column
pub fn encode_field<E>(field: &FieldDescriptor<E>, entity: &E) -> StoreResult<BindValue> {
    encode(field.name(), field.affinity(), field.read(entity))
}

/// Validate `value` against `affinity` and produce its bind form
///
/// # Errors
///
/// Returns [`StoreError::Encoding`] for malformed values, values wider than a
/// fixed-width column, and enum/set labels that are not declared
pub fn encode(name: &str, affinity: Affinity, value: FieldRef<'_>) -> StoreResult<BindValue> {
    if value.is_empty() && empty_is_null(affinity) {
        return Ok(BindValue::Null);
    }
    match affinity {
        Affinity::Bit { bits } => encode_bit(name, bits, value.as_bytes()).map(BindValue::Bytes),
        Affinity::Binary { length } => {
            encode_binary(name, length, value.as_bytes()).map(BindValue::Bytes)
        }
        Affinity::Blob => Ok(BindValue::Bytes(value.as_bytes().to_vec())),
        _ => {
            let text = as_text(name, value)?;
            encode_text(name, affinity, text)
        }
    }
}

/// Columns with no meaningful empty value; `""` there means `NULL`
const fn empty_is_null(affinity: Affinity) -> bool {
    !matches!(
        affinity,
        Affinity::Char { .. }
            | Affinity::Text
            | Affinity::Set { .. }
            | Affinity::Identifier
            | Affinity::Blob
    )
}

fn encode_text(name: &str, affinity: Affinity, text: &str) -> StoreResult<BindValue> {
    match affinity {
        Affinity::Integer { unsigned, bytes } => encode_integer(name, unsigned, bytes, text),
        Affinity::Float { .. } => {
            let parsed: f64 = text
                .parse()
                .map_err(|_| StoreError::encoding(name, format!("'{text}' is not a number")))?;
            if !parsed.is_finite() {
                return Err(StoreError::encoding(name, "non-finite floats cannot be stored"));
            }
            Ok(BindValue::Text(text.to_owned()))
        }
        Affinity::Decimal { precision, scale } => {
            validate_decimal(name, precision, scale, text)?;
            Ok(BindValue::Text(text.to_owned()))
        }
        Affinity::Boolean => match text {
            "0" => Ok(BindValue::Int(0)),
            "1" => Ok(BindValue::Int(1)),
            _ => Err(StoreError::encoding(name, format!("boolean must be \"0\" or \"1\", got '{text}'"))),
        },
        Affinity::Char { length } => {
            let chars = text.chars().count();
            if chars > length as usize {
                return Err(StoreError::encoding(
                    name,
                    format!("{chars} characters exceed CHAR({length})"),
                ));
            }
            Ok(BindValue::Text(text.to_owned()))
        }
        Affinity::Enum { labels } => {
            if !labels.is_empty() && !labels.contains(&text) {
                return Err(StoreError::encoding(
                    name,
                    format!("'{text}' is not one of the declared labels {labels:?}"),
                ));
            }
            Ok(BindValue::Text(text.to_owned()))
        }
        Affinity::Set { members } => {
            validate_set(name, members, text)?;
            Ok(BindValue::Text(text.to_owned()))
        }
        Affinity::Date => {
            NaiveDate::parse_from_str(text, temporal::DATE_FORMAT)
                .map_err(|e| StoreError::encoding(name, format!("invalid date '{text}': {e}")))?;
            Ok(BindValue::Text(text.to_owned()))
        }
        Affinity::Time { precision } => {
            validate_time(name, precision, text)?;
            Ok(BindValue::Text(text.to_owned()))
        }
        Affinity::DateTime { precision } | Affinity::Timestamp { precision } => {
            validate_datetime(name, precision, text)?;
            Ok(BindValue::Text(text.to_owned()))
        }
        Affinity::Year => {
            let valid = text.len() == 4
                && text.bytes().all(|b| b.is_ascii_digit())
                && text
                    .parse::<u16>()
                    .is_ok_and(|year| year == 0 || (1901..=2155).contains(&year));
            if !valid {
                return Err(StoreError::encoding(name, format!("invalid year '{text}'")));
            }
            Ok(BindValue::Text(text.to_owned()))
        }
        Affinity::Text
        | Affinity::Identifier
        | Affinity::Bit { .. }
        | Affinity::Binary { .. }
        | Affinity::Blob => Ok(BindValue::Text(text.to_owned())),
    }
}

fn as_text<'a>(name: &str, value: FieldRef<'a>) -> StoreResult<&'a str> {
    match value {
        FieldRef::Text(text) => Ok(text),
        FieldRef::Bytes(bytes) => std::str::from_utf8(bytes)
            .map_err(|e| StoreError::encoding(name, format!("value is not UTF-8: {e}"))),
    }
}

fn encode_integer(name: &str, unsigned: bool, bytes: u8, text: &str) -> StoreResult<BindValue> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    let negative = digits.len() != text.len();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(StoreError::encoding(name, format!("'{text}' is not an integer")));
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return Err(StoreError::encoding(name, format!("'{text}' has leading zeros")));
    }
    if negative && (unsigned || digits == "0") {
        return Err(StoreError::encoding(name, format!("'{text}' is not a valid unsigned integer")));
    }
    let out_of_range = || {
        let kind = if unsigned { "unsigned " } else { "" };
        StoreError::encoding(
            name,
            format!("'{text}' does not fit a {bytes}-byte {kind}integer"),
        )
    };
    let bits = u32::from(bytes.clamp(1, 8)) * 8;
    let parsed: i128 = text.parse().map_err(|_| out_of_range())?;
    let (min, max) = if unsigned {
        (0, (1_i128 << bits) - 1)
    } else {
        (-(1_i128 << (bits - 1)), (1_i128 << (bits - 1)) - 1)
    };
    if !(min..=max).contains(&parsed) {
        return Err(out_of_range());
    }
    if unsigned {
        u64::try_from(parsed).map(BindValue::UInt).map_err(|_| out_of_range())
    } else {
        i64::try_from(parsed).map(BindValue::Int).map_err(|_| out_of_range())
    }
}

fn validate_decimal(name: &str, precision: u8, scale: u8, text: &str) -> StoreResult<()> {
    let unsigned = text.strip_prefix(['-', '+']).unwrap_or(text);
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let well_formed = !whole.is_empty()
        && whole.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit())
        && !unsigned.ends_with('.');
    if !well_formed {
        return Err(StoreError::encoding(name, format!("'{text}' is not a decimal")));
    }
    let integral = whole.trim_start_matches('0').len();
    let room = usize::from(precision.saturating_sub(scale));
    if integral > room || fraction.len() > usize::from(scale) {
        return Err(StoreError::encoding(
            name,
            format!("'{text}' does not fit DECIMAL({precision},{scale})"),
        ));
    }
    Ok(())
}

fn validate_set(name: &str, members: &[&str], text: &str) -> StoreResult<()> {
    if text.is_empty() || members.is_empty() {
        return Ok(());
    }
    let mut last: Option<usize> = None;
    for label in text.split(',') {
        let Some(position) = members.iter().position(|member| *member == label) else {
            return Err(StoreError::encoding(
                name,
                format!("'{label}' is not a declared set member {members:?}"),
            ));
        };
        if last.is_some_and(|previous| position <= previous) {
            return Err(StoreError::encoding(
                name,
                format!("set members must be unique and in declared order, got '{text}'"),
            ));
        }
        last = Some(position);
    }
    Ok(())
}

fn encode_bit(name: &str, bits: u8, bytes: &[u8]) -> StoreResult<Vec<u8>> {
    if bits == 0 || bits > 64 {
        return Err(StoreError::encoding(name, format!("BIT({bits}) is not a valid width")));
    }
    let width = usize::from(bits.div_ceil(8));
    if bytes.len() > width {
        return Err(StoreError::encoding(
            name,
            format!("{} bytes exceed BIT({bits}) width of {width}", bytes.len()),
        ));
    }
    let mut padded = vec![0_u8; width - bytes.len()];
    padded.extend_from_slice(bytes);
    let spare = bits % 8;
    if spare != 0 && padded.first().is_some_and(|lead| u32::from(*lead) >= 1_u32 << spare) {
        return Err(StoreError::encoding(name, format!("value does not fit in BIT({bits})")));
    }
    Ok(padded)
}

fn encode_binary(name: &str, length: u32, bytes: &[u8]) -> StoreResult<Vec<u8>> {
    let width = length as usize;
    if bytes.len() > width {
        return Err(StoreError::encoding(
            name,
            format!("{} bytes exceed BINARY({length})", bytes.len()),
        ));
    }
    let mut padded = bytes.to_vec();
    padded.resize(width, 0);
    Ok(padded)
}

fn fraction_digits(text: &str) -> usize {
    text.rsplit_once('.').map_or(0, |(_, fraction)| fraction.len())
}

fn validate_datetime(name: &str, precision: u8, text: &str) -> StoreResult<()> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
        .map_err(|e| StoreError::encoding(name, format!("invalid datetime '{text}': {e}")))?;
    check_precision(name, precision, text)
}

fn validate_time(name: &str, precision: u8, text: &str) -> StoreResult<()> {
    let body = text.strip_prefix('-').unwrap_or(text);
    let (clock, fraction) = body.split_once('.').unwrap_or((body, ""));
    let parts: Vec<&str> = clock.split(':').collect();
    let valid = parts.len() == 3
        && parts.iter().all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
        && parts[1].len() == 2
        && parts[2].len() == 2
        && parts[0].parse::<u32>().is_ok_and(|hours| hours <= MAX_TIME_HOURS)
        && parts[1] < "60"
        && parts[2] < "60"
        && fraction.bytes().all(|b| b.is_ascii_digit())
        && !body.ends_with('.');
    if !valid {
        return Err(StoreError::encoding(name, format!("invalid time '{text}'")));
    }
    check_precision(name, precision, text)
}

/// `TIME` spans `-838:59:59` to `838:59:59`
const MAX_TIME_HOURS: u32 = 838;

fn check_precision(name: &str, precision: u8, text: &str) -> StoreResult<()> {
    let digits = fraction_digits(text);
    if digits > usize::from(precision) {
        return Err(StoreError::encoding(
            name,
            format!("{digits} fractional digits exceed declared precision {precision}"),
        ));
    }
    Ok(())
}

/// Canonical `DATETIME` text at `precision` fractional digits
#[must_use]
pub fn format_datetime(value: NaiveDateTime, precision: u8) -> String {
    let mut out = value.format(temporal::DATETIME_FORMAT).to_string();
    push_fraction(&mut out, value.nanosecond() / 1_000, precision);
    out
}

/// Canonical `TIME` text at `precision` fractional digits
///
/// Covers the full column range, `-838:59:59` to `838:59:59`; hours are
/// zero-padded to two digits and grow past that as needed.
#[must_use]
pub fn format_time(value: &MySqlTime, precision: u8) -> String {
    let sign = if value.is_negative() { "-" } else { "" };
    let mut out = format!(
        "{sign}{:02}:{:02}:{:02}",
        value.hours(),
        value.minutes(),
        value.seconds()
    );
    push_fraction(&mut out, value.microseconds(), precision);
    out
}

fn push_fraction(out: &mut String, micros: u32, precision: u8) {
    let precision = precision.min(temporal::MAX_FRACTIONAL_DIGITS);
    if precision == 0 {
        return;
    }
    let micros = micros.min(999_999);
    let digits = format!("{micros:06}");
    out.push('.');
    out.push_str(&digits[..usize::from(precision)]);
}

/// Decode column `index` of `row` according to `affinity`
///
/// SQL `NULL` decodes to an empty string (or empty byte sequence).
///
/// # Errors
///
/// Returns a driver error if the cell cannot be decoded as the declared affinity
pub fn decode_column(row: &MySqlRow, index: usize, affinity: Affinity) -> StoreResult<FieldValue> {
    let text = |value: Option<String>| FieldValue::Text(value.unwrap_or_default());
    let value = match affinity {
        Affinity::Integer { unsigned: true, .. } => {
            text(row.try_get_unchecked::<Option<u64>, _>(index)?.map(|v| v.to_string()))
        }
        Affinity::Integer { unsigned: false, .. } | Affinity::Boolean => {
            text(row.try_get_unchecked::<Option<i64>, _>(index)?.map(|v| v.to_string()))
        }
        Affinity::Float { single: true } => {
            text(row.try_get_unchecked::<Option<f32>, _>(index)?.map(|v| v.to_string()))
        }
        Affinity::Float { single: false } => {
            text(row.try_get_unchecked::<Option<f64>, _>(index)?.map(|v| v.to_string()))
        }
        Affinity::Bit { .. } | Affinity::Binary { .. } | Affinity::Blob => FieldValue::Bytes(
            row.try_get_unchecked::<Option<Vec<u8>>, _>(index)?
                .unwrap_or_default(),
        ),
        Affinity::Date => text(
            row.try_get_unchecked::<Option<NaiveDate>, _>(index)?
                .map(|v| v.format(temporal::DATE_FORMAT).to_string()),
        ),
        Affinity::Time { precision } => text(
            row.try_get_unchecked::<Option<MySqlTime>, _>(index)?
                .map(|v| format_time(&v, precision)),
        ),
        Affinity::DateTime { precision } | Affinity::Timestamp { precision } => text(
            row.try_get_unchecked::<Option<NaiveDateTime>, _>(index)?
                .map(|v| format_datetime(v, precision)),
        ),
        Affinity::Year => text(
            row.try_get_unchecked::<Option<u16>, _>(index)?
                .map(|v| format!("{v:04}")),
        ),
        Affinity::Decimal { .. }
        | Affinity::Char { .. }
        | Affinity::Text
        | Affinity::Enum { .. }
        | Affinity::Set { .. }
        | Affinity::Identifier => text(row.try_get_unchecked::<Option<String>, _>(index)?),
    };
    Ok(value)
}

const MAX_DECIMAL_PRECISION: u8 = 65;
const MAX_DECIMAL_SCALE: u8 = 30;

/// Best-effort affinity for a column whose type is only known from the server
///
/// Used for scalar results of hand-written statements, where no descriptor
/// exists. Temporal values render with full microsecond precision.
#[must_use]
pub fn affinity_for_type_name(name: &str) -> Affinity {
    let upper = name.to_ascii_uppercase();
    let unsigned = upper.contains("UNSIGNED");
    match upper.split_whitespace().next().unwrap_or_default() {
        "TINYINT" => Affinity::Integer { unsigned, bytes: 1 },
        "SMALLINT" => Affinity::Integer { unsigned, bytes: 2 },
        "MEDIUMINT" => Affinity::Integer { unsigned, bytes: 3 },
        "INT" | "INTEGER" => Affinity::Integer { unsigned, bytes: 4 },
        "BIGINT" => Affinity::Integer { unsigned, bytes: 8 },
        "BOOLEAN" | "BOOL" => Affinity::Boolean,
        "FLOAT" => Affinity::Float { single: true },
        "DOUBLE" | "REAL" => Affinity::Float { single: false },
        "DECIMAL" | "NUMERIC" => Affinity::Decimal {
            precision: MAX_DECIMAL_PRECISION,
            scale: MAX_DECIMAL_SCALE,
        },
        "BIT" | "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" | "GEOMETRY" => {
            Affinity::Blob
        }
        "DATE" => Affinity::Date,
        "TIME" => Affinity::Time {
            precision: temporal::MAX_FRACTIONAL_DIGITS,
        },
        "DATETIME" => Affinity::DateTime {
            precision: temporal::MAX_FRACTIONAL_DIGITS,
        },
        "TIMESTAMP" => Affinity::Timestamp {
            precision: temporal::MAX_FRACTIONAL_DIGITS,
        },
        "YEAR" => Affinity::Year,
        _ => Affinity::Text,
    }
}

/// Decode column `index` using the server-reported type
///
/// # Errors
///
/// Returns a driver error if the cell cannot be decoded
pub fn decode_dynamic(row: &MySqlRow, index: usize) -> StoreResult<Option<FieldValue>> {
    let Some(column) = row.columns().get(index) else {
        return Ok(None);
    };
    let affinity = affinity_for_type_name(column.type_info().name());
    if row.try_get_raw(index).map(|raw| sqlx::ValueRef::is_null(&raw))? {
        return Ok(None);
    }
    decode_column(row, index, affinity).map(Some)
}

/// Decode a whole row into a fresh entity
///
/// Result columns are matched to descriptors by name; columns the entity does
/// not declare (aliases, aggregates) are skipped.
///
/// # Errors
///
/// Returns a driver error if any matched cell fails to decode
pub fn decode_entity<E: Entity>(row: &MySqlRow) -> StoreResult<E> {
    let mut entity = E::default();
    decode_into(row, &mut entity)?;
    Ok(entity)
}

/// Decode a row into an existing entity, overwriting the matched fields
///
/// # Errors
///
/// Returns a driver error if any matched cell fails to decode
pub fn decode_into<E: Entity>(row: &MySqlRow, entity: &mut E) -> StoreResult<()> {
    let schema = E::schema();
    for column in row.columns() {
        match schema.lookup(column.name()) {
            Some(field) => {
                let value = decode_column(row, column.ordinal(), field.affinity())?;
                field.write(entity, value)?;
            }
            None => trace!(
                db.table = %schema.table(),
                db.column = %column.name(),
                "Skipping result column without descriptor"
            ),
        }
    }
    Ok(())
}
