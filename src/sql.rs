// ABOUTME: Pure SQL assembly for column-subset CRUD statements over one entity table
// ABOUTME: Produces statement text with `?` placeholders plus ordered bind values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # SQL Assembler
//!
//! Every function here is pure: given an entity and its [`QueryParams`] it
//! returns a [`Statement`] without touching the network. Identifiers are
//! backtick-quoted; values are always bound, never interpolated.
//!
//! | Operation | Shape |
//! |---|---|
//! | insert | ``INSERT INTO `t` (`a`, `b`) VALUES (?, ?)`` |
//! | select | ``SELECT `a`, `b`, ... FROM `t` WHERE `k` = ?`` |
//! | update | ``UPDATE `t` SET `a` = ? WHERE `k` = ?`` |
//! | delete | ``DELETE FROM `t` WHERE `k` = ?`` |
//! | exists | ``SELECT 1 FROM `t` WHERE `k` = ? LIMIT 1`` |
//! | truncate | ``TRUNCATE TABLE `t` `` |
//!
//! Without where-fields the `WHERE` clause is omitted entirely.

use crate::codec::encode_field;
use crate::params::QueryParams;
use crate::schema::{Entity, FieldDescriptor, Schema};
use crate::value::BindValue;
use margo_core::errors::{StoreError, StoreResult};
use std::fmt;

/// The operation a statement performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Insert one row
    Insert,
    /// Fetch matching rows
    Select,
    /// Modify matching rows
    Update,
    /// Remove matching rows
    Delete,
    /// Probe for at least one matching row
    Exists,
    /// Remove every row
    Truncate,
    /// Hand-written statement returning rows
    Query,
    /// Hand-written statement returning no rows
    Exec,
}

impl Operation {
    /// Lowercase label used in logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Select => "select",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Exists => "exists",
            Self::Truncate => "truncate",
            Self::Query => "query",
            Self::Exec => "exec",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Statement text plus its bind values, in placeholder order
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    operation: Operation,
    table: Option<&'static str>,
    sql: String,
    binds: Vec<BindValue>,
}

impl Statement {
    /// A caller-written statement with positional binds
    #[must_use]
    pub fn raw(operation: Operation, sql: impl Into<String>, binds: Vec<BindValue>) -> Self {
        Self {
            operation,
            table: None,
            sql: sql.into(),
            binds,
        }
    }

    /// Operation performed
    #[must_use]
    pub const fn operation(&self) -> Operation {
        self.operation
    }

    /// Target table, when assembled from an entity
    #[must_use]
    pub const fn table(&self) -> Option<&'static str> {
        self.table
    }

    /// Statement text
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Bind values in placeholder order
    #[must_use]
    pub fn binds(&self) -> &[BindValue] {
        &self.binds
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Quote an identifier with backticks, doubling embedded backticks
#[must_use]
pub fn quote(identifier: &str) -> String {
    format!("`{}`", identifier.replace('`', "``"))
}

fn column_list<E>(fields: &[&FieldDescriptor<E>]) -> String {
    fields
        .iter()
        .map(|field| quote(field.name()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn encode_all<E>(fields: &[&FieldDescriptor<E>], entity: &E) -> StoreResult<Vec<BindValue>> {
    fields.iter().map(|field| encode_field(field, entity)).collect()
}

/// Append ` WHERE a = ? AND b = ?` and the predicate binds; nothing when empty
fn push_where<E>(
    sql: &mut String,
    binds: &mut Vec<BindValue>,
    schema: &Schema<E>,
    entity: &E,
    names: &[String],
) -> StoreResult<()> {
    let fields = schema.resolve(names)?;
    if fields.is_empty() {
        return Ok(());
    }
    let conditions: Vec<String> = fields
        .iter()
        .map(|field| format!("{} = ?", quote(field.name())))
        .collect();
    sql.push_str(" WHERE ");
    sql.push_str(&conditions.join(" AND "));
    binds.extend(encode_all(&fields, entity)?);
    Ok(())
}

fn entity_statement<E: Entity>(operation: Operation, sql: String, binds: Vec<BindValue>) -> Statement {
    Statement {
        operation,
        table: Some(E::table()),
        sql,
        binds,
    }
}

/// `INSERT` of the insert fields; an empty list inserts a row of defaults
///
/// # Errors
///
/// Returns `UnknownField` or `Encoding` errors
pub fn insert<E: Entity>(entity: &E, params: &QueryParams) -> StoreResult<Statement> {
    let schema = E::schema();
    let fields = schema.resolve(params.insert_fields())?;
    let sql = if fields.is_empty() {
        format!("INSERT INTO {} () VALUES ()", quote(schema.table()))
    } else {
        let placeholders = vec!["?"; fields.len()].join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({placeholders})",
            quote(schema.table()),
            column_list(&fields),
        )
    };
    let binds = encode_all(&fields, entity)?;
    Ok(entity_statement::<E>(Operation::Insert, sql, binds))
}

/// `SELECT` of every declared column, filtered by the where fields of `template`
///
/// # Errors
///
/// Returns `UnknownField` or `Encoding` errors
pub fn select<E: Entity>(template: &E, params: &QueryParams) -> StoreResult<Statement> {
    let schema = E::schema();
    let mut sql = select_prefix(schema);
    let mut binds = Vec::new();
    push_where(&mut sql, &mut binds, schema, template, params.where_fields())?;
    Ok(entity_statement::<E>(Operation::Select, sql, binds))
}

/// `SELECT` of every declared column of every row
#[must_use]
pub fn select_all<E: Entity>() -> Statement {
    entity_statement::<E>(Operation::Select, select_prefix(E::schema()), Vec::new())
}

fn select_prefix<E>(schema: &Schema<E>) -> String {
    let columns: Vec<String> = schema.names().map(quote).collect();
    format!("SELECT {} FROM {}", columns.join(", "), quote(schema.table()))
}

/// `UPDATE` of the update fields, filtered by the where fields
///
/// # Errors
///
/// Returns `EmptyFieldSet` when nothing is named for `SET`, otherwise
/// `UnknownField` or `Encoding` errors
pub fn update<E: Entity>(entity: &E, params: &QueryParams) -> StoreResult<Statement> {
    let schema = E::schema();
    let fields = schema.resolve(params.update_fields())?;
    if fields.is_empty() {
        return Err(StoreError::EmptyFieldSet {
            operation: Operation::Update.as_str(),
            entity: schema.table(),
        });
    }
    let assignments: Vec<String> = fields
        .iter()
        .map(|field| format!("{} = ?", quote(field.name())))
        .collect();
    let mut sql = format!("UPDATE {} SET {}", quote(schema.table()), assignments.join(", "));
    let mut binds = encode_all(&fields, entity)?;
    push_where(&mut sql, &mut binds, schema, entity, params.where_fields())?;
    Ok(entity_statement::<E>(Operation::Update, sql, binds))
}

/// `DELETE` filtered by the where fields; without them every row goes
///
/// # Errors
///
/// Returns `UnknownField` or `Encoding` errors
pub fn delete<E: Entity>(entity: &E, params: &QueryParams) -> StoreResult<Statement> {
    let schema = E::schema();
    let mut sql = format!("DELETE FROM {}", quote(schema.table()));
    let mut binds = Vec::new();
    push_where(&mut sql, &mut binds, schema, entity, params.where_fields())?;
    Ok(entity_statement::<E>(Operation::Delete, sql, binds))
}

/// Existence probe filtered by the where fields
///
/// # Errors
///
/// Returns `UnknownField` or `Encoding` errors
pub fn exists<E: Entity>(entity: &E, params: &QueryParams) -> StoreResult<Statement> {
    let schema = E::schema();
    let mut sql = format!("SELECT 1 FROM {}", quote(schema.table()));
    let mut binds = Vec::new();
    push_where(&mut sql, &mut binds, schema, entity, params.where_fields())?;
    sql.push_str(" LIMIT 1");
    Ok(entity_statement::<E>(Operation::Exists, sql, binds))
}

/// Like [`select`] but limited to the first matching row
///
/// # Errors
///
/// Returns `UnknownField` or `Encoding` errors
pub fn select_first<E: Entity>(template: &E, params: &QueryParams) -> StoreResult<Statement> {
    let mut statement = select(template, params)?;
    statement.sql.push_str(" LIMIT 1");
    Ok(statement)
}

/// `TRUNCATE TABLE`
#[must_use]
pub fn truncate<E: Entity>() -> Statement {
    let sql = format!("TRUNCATE TABLE {}", quote(E::table()));
    entity_statement::<E>(Operation::Truncate, sql, Vec::new())
}
