// ABOUTME: Creation/update timestamp injection for entities that declare timestamp columns
// ABOUTME: Injectable clock; caller-named columns are never overwritten
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::codec::format_datetime;
use crate::params::QueryParams;
use crate::schema::{FieldDescriptor, Schema};
use crate::value::FieldValue;
use chrono::{NaiveDateTime, Utc};
use margo_core::errors::StoreResult;
use std::fmt::Debug;

/// Source of "now" for timestamp injection
pub trait Clock: Debug + Send + Sync {
    /// Current wall-clock time, UTC, no zone attached
    fn now(&self) -> NaiveDateTime;
}

/// Reads the system clock in UTC
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}

/// Always reports the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Timestamp values chosen for one statement
///
/// Nothing is written to the entity until [`Stamp::assemble`] succeeds.
pub struct Stamp<'s, E> {
    params: QueryParams,
    values: Vec<(&'s FieldDescriptor<E>, String)>,
}

impl<'s, E> Stamp<'s, E> {
    /// Caller parameters extended with the injected columns
    #[must_use]
    pub const fn params(&self) -> &QueryParams {
        &self.params
    }

    /// Injected value for `column`, if it was stamped
    #[must_use]
    pub fn value(&self, column: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(field, _)| field.name() == column)
            .map(|(_, value)| value.as_str())
    }

    /// True when no column was injected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Run `build` with the stamped values in place on `entity`
    ///
    /// The values stay on `entity` only if `build` succeeds; on failure the
    /// previous field contents are put back.
    ///
    /// # Errors
    ///
    /// Whatever `build` returns
    pub fn assemble<T>(
        &self,
        entity: &mut E,
        build: impl FnOnce(&E, &QueryParams) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let previous: Vec<FieldValue> = self
            .values
            .iter()
            .map(|(field, _)| field.read(entity).to_owned_value())
            .collect();
        for (field, value) in &self.values {
            field.write(entity, FieldValue::Text(value.clone()))?;
        }
        let built = build(entity, &self.params);
        if built.is_err() {
            for ((field, _), old) in self.values.iter().zip(previous) {
                field.write(entity, old)?;
            }
        }
        built
    }
}

impl<E> Debug for Stamp<'_, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stamp")
            .field("params", &self.params)
            .field(
                "values",
                &self.values.iter().map(|(field, value)| (field.name(), value)).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Choose default timestamps ahead of an `INSERT`
///
/// Each declared timestamp column the insert list does not already name gets
/// `now` and is appended to the stamped parameters, creation column first.
/// Both columns receive the same instant.
#[must_use]
pub fn stamp_insert<'s, E>(schema: &'s Schema<E>, params: &QueryParams, now: NaiveDateTime) -> Stamp<'s, E> {
    let values: Vec<_> = [schema.created_at(), schema.updated_at()]
        .into_iter()
        .flatten()
        .filter(|field| !params.inserts(field.name()))
        .map(|field| (field, format_datetime(now, field.affinity().precision())))
        .collect();
    let params = params
        .clone()
        .with_insert(values.iter().map(|(field, _)| field.name()));
    Stamp { params, values }
}

/// Choose the update timestamp ahead of an `UPDATE`
///
/// Only the update column is stamped, and only when the `SET` list does not
/// already name it.
#[must_use]
pub fn stamp_update<'s, E>(schema: &'s Schema<E>, params: &QueryParams, now: NaiveDateTime) -> Stamp<'s, E> {
    match schema.updated_at() {
        Some(field) if !params.updates(field.name()) => Stamp {
            params: params.clone().with_update([field.name()]),
            values: vec![(field, format_datetime(now, field.affinity().precision()))],
        },
        _ => Stamp {
            params: params.clone(),
            values: Vec::new(),
        },
    }
}
