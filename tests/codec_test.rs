// ABOUTME: Unit tests for per-affinity value encoding and temporal formatting
// ABOUTME: Width checks, padding, enum/set labels, and malformed values rejected before I/O
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use chrono::NaiveDate;
use margo::codec::{affinity_for_type_name, encode, format_datetime, format_time};
use margo::{Affinity, BindValue, FieldRef, StoreError};
use sqlx::mysql::types::{MySqlTime, MySqlTimeSign};

fn text(affinity: Affinity, value: &str) -> Result<BindValue, StoreError> {
    encode("col", affinity, FieldRef::Text(value))
}

fn bytes(affinity: Affinity, value: &[u8]) -> Result<BindValue, StoreError> {
    encode("col", affinity, FieldRef::Bytes(value))
}

const fn int(unsigned: bool, bytes: u8) -> Affinity {
    Affinity::Integer { unsigned, bytes }
}

const fn decimal(precision: u8, scale: u8) -> Affinity {
    Affinity::Decimal { precision, scale }
}

fn assert_encoding_error(result: Result<BindValue, StoreError>) {
    match result {
        Err(StoreError::Encoding { field, .. }) => assert_eq!(field, "col"),
        other => panic!("expected an encoding error, got {other:?}"),
    }
}

#[test]
fn test_integers() {
    let signed = int(false, 8);
    let unsigned = int(true, 8);

    assert_eq!(text(signed, "42").unwrap(), BindValue::Int(42));
    assert_eq!(text(signed, "-42").unwrap(), BindValue::Int(-42));
    assert_eq!(text(signed, "0").unwrap(), BindValue::Int(0));
    assert_eq!(
        text(unsigned, "18446744073709551615").unwrap(),
        BindValue::UInt(u64::MAX)
    );

    assert_encoding_error(text(signed, "007"));
    assert_encoding_error(text(signed, "-0"));
    assert_encoding_error(text(signed, "4 2"));
    assert_encoding_error(text(signed, "1.5"));
    assert_encoding_error(text(unsigned, "-1"));
    assert_encoding_error(text(signed, "9223372036854775808"));
    assert_encoding_error(text(unsigned, "18446744073709551616"));
}

#[test]
fn test_integers_respect_declared_width() {
    assert_eq!(text(int(true, 1), "255").unwrap(), BindValue::UInt(255));
    assert_encoding_error(text(int(true, 1), "300"));
    assert_encoding_error(text(int(true, 1), "256"));
    assert_eq!(text(int(false, 1), "-128").unwrap(), BindValue::Int(-128));
    assert_encoding_error(text(int(false, 1), "128"));
    assert_encoding_error(text(int(false, 1), "-129"));

    assert!(text(int(false, 2), "-32768").is_ok());
    assert_encoding_error(text(int(false, 2), "32768"));
    assert!(text(int(true, 3), "16777215").is_ok());
    assert_encoding_error(text(int(true, 3), "16777216"));
    assert!(text(int(false, 3), "-8388608").is_ok());
    assert_encoding_error(text(int(false, 3), "8388608"));
    assert!(text(int(true, 4), "4294967295").is_ok());
    assert_encoding_error(text(int(true, 4), "4294967296"));
    assert_eq!(
        text(int(false, 8), "-9223372036854775808").unwrap(),
        BindValue::Int(i64::MIN)
    );
}

#[test]
fn test_empty_values_bind_null_outside_string_columns() {
    let null_when_empty = [
        int(false, 4),
        int(true, 8),
        Affinity::Float { single: false },
        decimal(10, 5),
        Affinity::Boolean,
        Affinity::Enum {
            labels: &["one", "two"],
        },
        Affinity::Date,
        Affinity::Time { precision: 0 },
        Affinity::DateTime { precision: 6 },
        Affinity::Timestamp { precision: 0 },
        Affinity::Year,
    ];
    for affinity in null_when_empty {
        assert_eq!(text(affinity, "").unwrap(), BindValue::Null, "{affinity}");
    }
    assert_eq!(bytes(Affinity::Bit { bits: 8 }, &[]).unwrap(), BindValue::Null);
    assert_eq!(bytes(Affinity::Binary { length: 16 }, &[]).unwrap(), BindValue::Null);

    assert_eq!(text(Affinity::Text, "").unwrap(), BindValue::Text(String::new()));
    assert_eq!(
        text(Affinity::Char { length: 4 }, "").unwrap(),
        BindValue::Text(String::new())
    );
    assert_eq!(
        text(Affinity::Set { members: &["a"] }, "").unwrap(),
        BindValue::Text(String::new())
    );
    assert_eq!(bytes(Affinity::Blob, &[]).unwrap(), BindValue::Bytes(Vec::new()));
}

#[test]
fn test_floats_and_decimals_keep_their_digits() {
    let double = Affinity::Float { single: false };
    assert_eq!(
        text(double, "3.14159").unwrap(),
        BindValue::Text("3.14159".into())
    );
    assert_encoding_error(text(double, "pi"));
    assert_encoding_error(text(double, "inf"));

    let wide = decimal(20, 10);
    assert_eq!(
        text(wide, "1234567890.1234567890").unwrap(),
        BindValue::Text("1234567890.1234567890".into())
    );
    assert!(text(wide, "-0.5").is_ok());
    assert_encoding_error(text(wide, "1."));
    assert_encoding_error(text(wide, ".5"));
    assert_encoding_error(text(wide, "1e5"));
}

#[test]
fn test_decimals_respect_precision_and_scale() {
    let dec = decimal(10, 5);
    assert!(text(dec, "12345.67890").is_ok());
    assert!(text(dec, "-99999.99999").is_ok());
    assert!(text(dec, "00012345.1").is_ok(), "leading zeros take no room");
    assert_encoding_error(text(dec, "12345.1234567899"));
    assert_encoding_error(text(dec, "123456.1"));

    let numeric = decimal(10, 7);
    assert!(text(numeric, "123.4567890").is_ok());
    assert_encoding_error(text(numeric, "1234.5"));

    let integral = decimal(5, 0);
    assert!(text(integral, "12345").is_ok());
    assert_encoding_error(text(integral, "1.5"));
}

#[test]
fn test_bits_are_left_padded_to_declared_width() {
    assert_eq!(
        bytes(Affinity::Bit { bits: 1 }, &[0x01]).unwrap(),
        BindValue::Bytes(vec![0x01])
    );
    assert_eq!(
        bytes(Affinity::Bit { bits: 64 }, &[0x01]).unwrap(),
        BindValue::Bytes(vec![0, 0, 0, 0, 0, 0, 0, 0x01])
    );
    assert_eq!(
        bytes(Affinity::Bit { bits: 12 }, &[0x0F, 0xFF]).unwrap(),
        BindValue::Bytes(vec![0x0F, 0xFF])
    );

    assert_encoding_error(bytes(Affinity::Bit { bits: 8 }, &[0x01, 0x02]));
    assert_encoding_error(bytes(Affinity::Bit { bits: 1 }, &[0x02]));
    assert_encoding_error(bytes(Affinity::Bit { bits: 12 }, &[0x10, 0x00]));
}

#[test]
fn test_binary_is_zero_padded_and_bounded() {
    let binary = Affinity::Binary { length: 16 };
    let mut expected = vec![0x01, 0x02, 0x03];
    expected.resize(16, 0);

    assert_eq!(
        bytes(binary, &[0x01, 0x02, 0x03]).unwrap(),
        BindValue::Bytes(expected)
    );
    assert_encoding_error(bytes(binary, &[0xAA; 17]));
    assert_eq!(
        bytes(Affinity::Blob, b"blob_data").unwrap(),
        BindValue::Bytes(b"blob_data".to_vec())
    );
}

#[test]
fn test_booleans() {
    assert_eq!(text(Affinity::Boolean, "1").unwrap(), BindValue::Int(1));
    assert_eq!(text(Affinity::Boolean, "0").unwrap(), BindValue::Int(0));
    assert_encoding_error(text(Affinity::Boolean, "true"));
}

#[test]
fn test_char_length_counts_characters() {
    let char10 = Affinity::Char { length: 10 };
    assert!(text(char10, "char10___").is_ok());
    assert!(text(char10, "éééééééééé").is_ok());
    assert_encoding_error(text(char10, "eleven_char"));
}

#[test]
fn test_enum_labels_are_exact() {
    let labels = Affinity::Enum {
        labels: &["one", "two", "three"],
    };
    assert_eq!(text(labels, "two").unwrap(), BindValue::Text("two".into()));
    assert_encoding_error(text(labels, "Two"));
    assert_encoding_error(text(labels, "four"));
}

#[test]
fn test_set_members_must_be_known_unique_and_ordered() {
    let set = Affinity::Set {
        members: &["a", "b", "c"],
    };
    assert_eq!(text(set, "a,b").unwrap(), BindValue::Text("a,b".into()));
    assert!(text(set, "").is_ok());
    assert!(text(set, "c").is_ok());
    assert_encoding_error(text(set, "b,a"));
    assert_encoding_error(text(set, "a,a"));
    assert_encoding_error(text(set, "a,d"));
}

#[test]
fn test_temporal_values() {
    assert!(text(Affinity::Date, "2025-06-29").is_ok());
    assert_encoding_error(text(Affinity::Date, "2025-02-30"));

    let datetime6 = Affinity::DateTime { precision: 6 };
    assert!(text(datetime6, "2025-06-29 12:34:56.000000").is_ok());
    assert!(text(datetime6, "2025-06-30 12:00:00").is_ok());
    assert_encoding_error(text(datetime6, "2025-06-29T12:34:56"));
    assert_encoding_error(text(datetime6, "2025-06-29 12:34:56.1234567"));

    let timestamp0 = Affinity::Timestamp { precision: 0 };
    assert!(text(timestamp0, "2025-06-29 12:34:56").is_ok());
    assert_encoding_error(text(timestamp0, "2025-06-29 12:34:56.5"));

    let time0 = Affinity::Time { precision: 0 };
    assert!(text(time0, "12:34:56").is_ok());
    assert!(text(time0, "-838:59:59").is_ok());
    assert!(text(time0, "100:00:00").is_ok());
    assert_encoding_error(text(time0, "839:00:00"));
    assert_encoding_error(text(time0, "12:60:00"));
    assert_encoding_error(text(time0, "12:34:56.5"));

    assert!(text(Affinity::Year, "2025").is_ok());
    assert_encoding_error(text(Affinity::Year, "25"));
    assert_encoding_error(text(Affinity::Year, "1800"));
}

#[test]
fn test_text_and_identifiers_pass_through() {
    assert_eq!(
        text(Affinity::Text, "  spaced  ").unwrap(),
        BindValue::Text("  spaced  ".into())
    );
    assert_eq!(text(Affinity::Text, "").unwrap(), BindValue::Text(String::new()));
    assert_eq!(
        text(Affinity::Identifier, "not-really-a-uuid").unwrap(),
        BindValue::Text("not-really-a-uuid".into())
    );
}

#[test]
fn test_datetime_formatting_truncates_to_precision() {
    let instant = NaiveDate::from_ymd_opt(2025, 6, 29)
        .and_then(|d| d.and_hms_micro_opt(12, 34, 56, 123_456))
        .unwrap();

    assert_eq!(format_datetime(instant, 6), "2025-06-29 12:34:56.123456");
    assert_eq!(format_datetime(instant, 3), "2025-06-29 12:34:56.123");
    assert_eq!(format_datetime(instant, 0), "2025-06-29 12:34:56");

    let time = MySqlTime::new(MySqlTimeSign::Positive, 1, 2, 3, 50).unwrap();
    assert_eq!(format_time(&time, 6), "01:02:03.000050");
    assert_eq!(format_time(&time, 0), "01:02:03");
}

#[test]
fn test_time_formatting_covers_the_full_column_range() {
    let longest = MySqlTime::new(MySqlTimeSign::Positive, 838, 59, 59, 0).unwrap();
    assert_eq!(format_time(&longest, 0), "838:59:59");

    let overnight = MySqlTime::new(MySqlTimeSign::Positive, 26, 30, 0, 0).unwrap();
    assert_eq!(format_time(&overnight, 0), "26:30:00");

    let negative = MySqlTime::new(MySqlTimeSign::Negative, 1, 0, 0, 0).unwrap();
    assert_eq!(format_time(&negative, 0), "-01:00:00");

    let fraction = MySqlTime::new(MySqlTimeSign::Negative, 838, 59, 58, 999_999).unwrap();
    assert_eq!(format_time(&fraction, 6), "-838:59:58.999999");
    assert_eq!(format_time(&fraction, 2), "-838:59:58.99");
}

#[test]
fn test_server_type_names_map_to_affinities() {
    assert_eq!(affinity_for_type_name("BIGINT UNSIGNED"), int(true, 8));
    assert_eq!(affinity_for_type_name("BIGINT"), int(false, 8));
    assert_eq!(affinity_for_type_name("TINYINT"), int(false, 1));
    assert_eq!(affinity_for_type_name("MEDIUMINT UNSIGNED"), int(true, 3));
    assert_eq!(affinity_for_type_name("INT"), int(false, 4));
    assert_eq!(affinity_for_type_name("DECIMAL"), decimal(65, 30));
    assert_eq!(affinity_for_type_name("VARBINARY"), Affinity::Blob);
    assert_eq!(affinity_for_type_name("DATE"), Affinity::Date);
    assert_eq!(affinity_for_type_name("VARCHAR"), Affinity::Text);
    assert_eq!(affinity_for_type_name("JSON"), Affinity::Text);
}
