// ABOUTME: Execution engine running assembled statements against an injected MySQL pool
// ABOUTME: One awaited round trip per call, timestamp injection, row materialization, logging
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Execution Engine
//!
//! [`Store`] is the explicit connection handle. It is cheap to clone and
//! holds only the pool and the clock used for timestamp injection. Each
//! method assembles exactly one statement, awaits exactly one round trip,
//! and returns its payload; nothing is spawned, retried, or wrapped in a
//! transaction.

use crate::codec::{decode_dynamic, decode_entity, decode_into};
use crate::logging::DbLogger;
use crate::outcome::{Ack, Outcome, Scalar};
use crate::params::QueryParams;
use crate::schema::Entity;
use crate::sql::{self, Operation, Statement};
use crate::timestamps::{self, Clock, SystemClock};
use crate::value::BindValue;
use margo_core::config::DatabaseConfig;
use margo_core::errors::{StoreError, StoreResult};
use sqlx::mysql::{MySqlArguments, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, MySql, Row};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, trace, warn};

/// One request for [`Store::run`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// [`Store::insert`]
    Insert,
    /// [`Store::select`]
    Select,
    /// [`Store::select_all`]
    SelectAll,
    /// [`Store::update`]
    Update,
    /// [`Store::delete`]
    Delete,
    /// [`Store::exists`]
    Exists,
    /// [`Store::load`]
    Load,
    /// [`Store::truncate`]
    Truncate,
    /// [`Store::query`] with the given SQL
    Query(&'a str),
    /// [`Store::query_scalar`] with the given SQL
    Scalar(&'a str),
    /// [`Store::exec`] with the given SQL
    Exec(&'a str),
}

/// Connection handle and execution engine
#[derive(Clone)]
pub struct Store {
    pool: MySqlPool,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("pool_size", &self.pool.size())
            .field("clock", &self.clock)
            .finish()
    }
}

impl Store {
    /// Wrap an existing pool; timestamps come from the system clock
    #[must_use]
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            pool,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used for timestamp injection
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Open a pool from `config` and wrap it
    ///
    /// # Errors
    ///
    /// Returns a driver error if the first connection cannot be established
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let pool_config = &config.pool;
        let pool = MySqlPoolOptions::new()
            .max_connections(pool_config.max_connections)
            .min_connections(pool_config.min_connections)
            .acquire_timeout(Duration::from_secs(pool_config.acquire_timeout_secs))
            .max_lifetime(Some(Duration::from_secs(pool_config.max_lifetime_secs)))
            .idle_timeout(Some(Duration::from_secs(pool_config.idle_timeout_secs)))
            .connect(&config.to_dsn())
            .await
            .map_err(|e| {
                warn!(db.target = %config, error = %e, "Failed to connect to MySQL");
                StoreError::from(e)
            })?;

        info!(
            db.target = %config,
            pool.max_connections = pool_config.max_connections,
            "Connected to MySQL"
        );
        Ok(Self::new(pool))
    }

    /// The underlying pool
    #[must_use]
    pub const fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Insert `entity` using the insert fields of `params`
    ///
    /// Declared creation/update timestamp columns the caller did not name are
    /// set to the current instant, both on the row and on `entity`. A
    /// statement that fails to assemble leaves `entity` unchanged.
    ///
    /// # Errors
    ///
    /// `UnknownField`, `Encoding`, `ConstraintViolation` on key conflicts, or `Driver`
    pub async fn insert<E: Entity>(&self, entity: &mut E, params: &QueryParams) -> StoreResult<Ack> {
        let schema = E::schema();
        params.validate(schema)?;
        let stamp = timestamps::stamp_insert(schema, params, self.clock.now());
        let statement = checked::<E>(Operation::Insert, stamp.assemble(entity, sql::insert))?;
        self.execute(&statement).await
    }

    /// Rows matching the where fields of `params`, bound from `template`
    ///
    /// # Errors
    ///
    /// `UnknownField`, `Encoding`, or `Driver`
    pub async fn select<E: Entity>(&self, template: &E, params: &QueryParams) -> StoreResult<Vec<E>> {
        let statement = checked::<E>(Operation::Select, sql::select(template, params))?;
        self.fetch_entities(&statement).await
    }

    /// Every row of the entity's table
    ///
    /// # Errors
    ///
    /// Returns a driver error if the query fails
    pub async fn select_all<E: Entity>(&self) -> StoreResult<Vec<E>> {
        self.fetch_entities(&sql::select_all::<E>()).await
    }

    /// Update the update fields of rows matching the where fields
    ///
    /// The update timestamp column, when declared and not named by the
    /// caller, is set to the current instant on the row and on `entity`.
    ///
    /// # Errors
    ///
    /// `UnknownField`, `EmptyFieldSet`, `Encoding`, `ConstraintViolation`, or `Driver`
    pub async fn update<E: Entity>(&self, entity: &mut E, params: &QueryParams) -> StoreResult<Ack> {
        let schema = E::schema();
        params.validate(schema)?;
        let stamp = timestamps::stamp_update(schema, params, self.clock.now());
        let statement = checked::<E>(Operation::Update, stamp.assemble(entity, sql::update))?;
        self.execute(&statement).await
    }

    /// Delete rows matching the where fields
    ///
    /// # Errors
    ///
    /// `UnknownField`, `Encoding`, `ConstraintViolation`, or `Driver`
    pub async fn delete<E: Entity>(&self, entity: &E, params: &QueryParams) -> StoreResult<Ack> {
        let statement = checked::<E>(Operation::Delete, sql::delete(entity, params))?;
        self.execute(&statement).await
    }

    /// Whether at least one row matches the where fields
    ///
    /// # Errors
    ///
    /// `UnknownField`, `Encoding`, or `Driver`
    pub async fn exists<E: Entity>(&self, entity: &E, params: &QueryParams) -> StoreResult<bool> {
        let statement = checked::<E>(Operation::Exists, sql::exists(entity, params))?;
        Ok(self.fetch_optional(&statement).await?.is_some())
    }

    /// Fill `entity` from the first row matching its where fields
    ///
    /// Returns `false` and leaves `entity` untouched when nothing matches.
    ///
    /// # Errors
    ///
    /// `UnknownField`, `Encoding`, or `Driver`
    pub async fn load<E: Entity>(&self, entity: &mut E, params: &QueryParams) -> StoreResult<bool> {
        let statement = checked::<E>(Operation::Select, sql::select_first(&*entity, params))?;
        match self.fetch_optional(&statement).await? {
            Some(row) => {
                decode_into(&row, entity)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove every row of the entity's table
    ///
    /// # Errors
    ///
    /// Returns a driver error if the statement fails
    pub async fn truncate<E: Entity>(&self) -> StoreResult<Ack> {
        self.execute(&sql::truncate::<E>()).await
    }

    /// Run a hand-written query and decode rows into `E` by column name
    ///
    /// Result columns `E` does not declare are ignored; declared columns
    /// missing from the result stay at their default.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the query fails
    pub async fn query<E: Entity>(&self, sql: &str, params: &QueryParams) -> StoreResult<Vec<E>> {
        self.fetch_entities(&raw(Operation::Query, sql, params)).await
    }

    /// Like [`Store::query`], keeping only the first row
    ///
    /// # Errors
    ///
    /// Returns a driver error if the query fails
    pub async fn query_one<E: Entity>(&self, sql: &str, params: &QueryParams) -> StoreResult<Option<E>> {
        let statement = raw(Operation::Query, sql, params);
        self.fetch_optional(&statement)
            .await?
            .as_ref()
            .map(decode_entity)
            .transpose()
    }

    /// First column of the first row, decoded by its server-reported type
    ///
    /// # Errors
    ///
    /// Returns a driver error if the query fails, or `Encoding` when the
    /// value is binary data that is not UTF-8
    pub async fn query_scalar(&self, sql: &str, params: &QueryParams) -> StoreResult<Scalar> {
        let statement = raw(Operation::Query, sql, params);
        let Some(row) = self.fetch_optional(&statement).await? else {
            return Ok(Scalar(None));
        };
        let value = decode_dynamic(&row, 0)?
            .map(|value| {
                value.into_text().map_err(|e| {
                    let column = row.columns().first().map_or("?", Column::name);
                    StoreError::encoding(column, format!("scalar is not UTF-8: {e}"))
                })
            })
            .transpose()?;
        Ok(Scalar(value))
    }

    /// Run a hand-written statement that returns no rows
    ///
    /// # Errors
    ///
    /// `ConstraintViolation` or `Driver`
    pub async fn exec(&self, sql: &str, params: &QueryParams) -> StoreResult<Ack> {
        self.execute(&raw(Operation::Exec, sql, params)).await
    }

    /// Dispatch `command` and wrap its payload in an [`Outcome`]
    ///
    /// # Errors
    ///
    /// Whatever the dispatched operation returns
    pub async fn run<E: Entity>(
        &self,
        command: Command<'_>,
        entity: &mut E,
        params: &QueryParams,
    ) -> StoreResult<Outcome<E>> {
        match command {
            Command::Insert => self.insert(entity, params).await.map(Outcome::Ack),
            Command::Select => self.select(&*entity, params).await.map(Outcome::Rows),
            Command::SelectAll => self.select_all().await.map(Outcome::Rows),
            Command::Update => self.update(entity, params).await.map(Outcome::Ack),
            Command::Delete => self.delete(&*entity, params).await.map(Outcome::Ack),
            Command::Exists => self.exists(&*entity, params).await.map(Outcome::Probe),
            Command::Load => self.load(entity, params).await.map(Outcome::Probe),
            Command::Truncate => self.truncate::<E>().await.map(Outcome::Ack),
            Command::Query(sql) => self.query(sql, params).await.map(Outcome::Rows),
            Command::Scalar(sql) => self.query_scalar(sql, params).await.map(Outcome::Scalar),
            Command::Exec(sql) => self.exec(sql, params).await.map(Outcome::Ack),
        }
    }

    async fn execute(&self, statement: &Statement) -> StoreResult<Ack> {
        let started = Instant::now();
        let result = bind_all(sqlx::query(statement.sql()), statement.binds())
            .execute(&self.pool)
            .await
            .map(Ack::from)
            .map_err(StoreError::from);
        log_statement(statement, started, result.as_ref().map(|ack| ack.rows_affected));
        result
    }

    async fn fetch_all(&self, statement: &Statement) -> StoreResult<Vec<MySqlRow>> {
        let started = Instant::now();
        let result = bind_all(sqlx::query(statement.sql()), statement.binds())
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::from);
        log_statement(statement, started, result.as_ref().map(|rows| rows.len() as u64));
        result
    }

    async fn fetch_optional(&self, statement: &Statement) -> StoreResult<Option<MySqlRow>> {
        let started = Instant::now();
        let result = bind_all(sqlx::query(statement.sql()), statement.binds())
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from);
        log_statement(statement, started, result.as_ref().map(|row| u64::from(row.is_some())));
        result
    }

    async fn fetch_entities<E: Entity>(&self, statement: &Statement) -> StoreResult<Vec<E>> {
        self.fetch_all(statement)
            .await?
            .iter()
            .map(decode_entity)
            .collect()
    }
}

fn raw(operation: Operation, sql: &str, params: &QueryParams) -> Statement {
    Statement::raw(operation, sql, params.positional().to_vec())
}

/// Log assembly failures (caller input problems) before handing them back
fn checked<E: Entity>(operation: Operation, assembled: StoreResult<Statement>) -> StoreResult<Statement> {
    if let Err(error) = &assembled {
        DbLogger::log_rejected(operation.as_str(), E::table(), error);
    }
    assembled
}

fn bind_all<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    binds: &'q [BindValue],
) -> Query<'q, MySql, MySqlArguments> {
    for value in binds {
        query = match value {
            BindValue::Null => query.bind(None::<String>),
            BindValue::Int(v) => query.bind(*v),
            BindValue::UInt(v) => query.bind(*v),
            BindValue::Float(v) => query.bind(*v),
            BindValue::Bool(v) => query.bind(*v),
            BindValue::Text(v) => query.bind(v.as_str()),
            BindValue::Bytes(v) => query.bind(v.as_slice()),
            BindValue::Date(v) => query.bind(*v),
            BindValue::DateTime(v) => query.bind(*v),
        };
    }
    query
}

fn log_statement(statement: &Statement, started: Instant, outcome: Result<u64, &StoreError>) {
    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    trace!(db.statement = %statement.sql(), "Statement text");
    DbLogger::log_statement(
        statement.operation().as_str(),
        statement.table().unwrap_or("-"),
        statement.binds().len(),
        duration_ms,
        outcome,
    );
}
