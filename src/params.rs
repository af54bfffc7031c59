// ABOUTME: Composable query parameters naming which columns take part in one CRUD call
// ABOUTME: Ordered insert/update/where field sets plus positional binds for hand-written SQL
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::schema::{Entity, Schema};
use crate::value::BindValue;
use margo_core::errors::StoreResult;

/// Which columns (or values) participate in one statement
///
/// Four independent slots:
///
/// - `insert_fields`: column list of an `INSERT`
/// - `update_fields`: `SET` list of an `UPDATE`
/// - `where_fields`: equality predicates, joined with `AND` in declaration order
/// - `positional`: bind values for hand-written statements
///
/// Field slots have set semantics: repeating a name is a no-op and the first
/// occurrence fixes its position. An empty `where_fields` means *no predicate*;
/// updates and deletes then touch every row.
///
/// Builder methods take and return the value, so a shared base can
/// be cloned and extended at several call sites.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    insert_fields: Vec<String>,
    update_fields: Vec<String>,
    where_fields: Vec<String>,
    positional: Vec<BindValue>,
}

impl QueryParams {
    /// Empty parameters: no columns, no predicate, no binds
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add columns to the `INSERT` column list
    #[must_use]
    pub fn with_insert<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend_unique(&mut self.insert_fields, fields);
        self
    }

    /// Add columns to the `UPDATE ... SET` list
    #[must_use]
    pub fn with_update<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend_unique(&mut self.update_fields, fields);
        self
    }

    /// Add columns to the equality predicate
    #[must_use]
    pub fn with_where<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend_unique(&mut self.where_fields, fields);
        self
    }

    /// Append positional bind values for a hand-written statement
    #[must_use]
    pub fn with_params<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<BindValue>,
    {
        self.positional.extend(values.into_iter().map(Into::into));
        self
    }

    /// Append a single positional bind value
    #[must_use]
    pub fn with_param(mut self, value: impl Into<BindValue>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Columns of the `INSERT`, in order
    #[must_use]
    pub fn insert_fields(&self) -> &[String] {
        &self.insert_fields
    }

    /// Columns of the `SET` clause, in order
    #[must_use]
    pub fn update_fields(&self) -> &[String] {
        &self.update_fields
    }

    /// Predicate columns, in order
    #[must_use]
    pub fn where_fields(&self) -> &[String] {
        &self.where_fields
    }

    /// Positional bind values, in order
    #[must_use]
    pub fn positional(&self) -> &[BindValue] {
        &self.positional
    }

    /// Hand over the positional binds
    #[must_use]
    pub fn into_positional(self) -> Vec<BindValue> {
        self.positional
    }

    /// True when the insert list names `field`
    #[must_use]
    pub fn inserts(&self, field: &str) -> bool {
        self.insert_fields.iter().any(|f| f == field)
    }

    /// True when the `SET` list names `field`
    #[must_use]
    pub fn updates(&self, field: &str) -> bool {
        self.update_fields.iter().any(|f| f == field)
    }

    /// Check every named field against `schema`
    ///
    /// # Errors
    ///
    /// Returns `UnknownField` for the first name the schema does not declare
    pub fn validate<E>(&self, schema: &Schema<E>) -> StoreResult<()> {
        schema.resolve(&self.insert_fields)?;
        schema.resolve(&self.update_fields)?;
        schema.resolve(&self.where_fields)?;
        Ok(())
    }

    /// Check every named field against the schema of `E`
    ///
    /// # Errors
    ///
    /// Returns `UnknownField` for the first name `E` does not declare
    pub fn validate_for<E: Entity>(&self) -> StoreResult<()> {
        self.validate(E::schema())
    }
}

fn extend_unique<I, S>(target: &mut Vec<String>, fields: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    for field in fields {
        let field = field.into();
        if !target.contains(&field) {
            target.push(field);
        }
    }
}
