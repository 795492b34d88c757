// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Raw-SQL sessions
//!
//! Literal SQL with positional arguments, dispatched through the same
//! expansion/rebind/routing pipeline as built statements. Sequence
//! arguments bound to a single `?` expand to the right arity.

use sqlx::any::{AnyQueryResult, AnyRow};

use crate::client::DbClient;
use crate::error::DbResult;
use crate::params::Param;
use crate::row::Row;
use crate::scan;

pub struct RawSession {
    db: DbClient,
    query: String,
    vars: Vec<Param>,
}

impl RawSession {
    pub(crate) fn new(db: DbClient, query: String, vars: Vec<Param>) -> Self {
        RawSession { db, query, vars }
    }

    /// Pin this session's reads to the master.
    pub fn master(mut self) -> Self {
        self.db.is_master = true;
        self
    }

    /// All rows as records or tuples.
    pub async fn fetch<T>(&self) -> DbResult<Vec<T>>
    where
        T: for<'r> sqlx::FromRow<'r, AnyRow>,
    {
        let rows = self.query().await?;
        scan::rows_to(&rows)
    }

    /// Exactly one record; `RecordNotFound` when the result is empty.
    pub async fn fetch_one<T>(&self) -> DbResult<T>
    where
        T: for<'r> sqlx::FromRow<'r, AnyRow>,
    {
        let rows = self.query().await?;
        scan::single(&rows)
    }

    /// All rows as column -> value mappings.
    pub async fn fetch_maps(&self) -> DbResult<Vec<Row>> {
        let rows = self.query().await?;
        scan::rows_to_maps(&rows)
    }

    /// Exactly one mapping; `RecordNotFound` when the result is empty.
    pub async fn fetch_map(&self) -> DbResult<Row> {
        let rows = self.query().await?;
        scan::single_map(&rows)
    }

    /// First column of every row.
    pub async fn fetch_scalars<T>(&self) -> DbResult<Vec<T>>
    where
        T: for<'r> sqlx::Decode<'r, sqlx::Any> + sqlx::Type<sqlx::Any>,
    {
        let rows = self.query().await?;
        scan::rows_to_scalars(&rows)
    }

    /// First column of the first row; `RecordNotFound` when empty.
    pub async fn fetch_scalar<T>(&self) -> DbResult<T>
    where
        T: for<'r> sqlx::Decode<'r, sqlx::Any> + sqlx::Type<sqlx::Any>,
    {
        let rows = self.query().await?;
        scan::single_scalar(&rows)
    }

    /// Execute as a write; targets the master and pins the session to it.
    pub async fn exec(&mut self) -> DbResult<AnyQueryResult> {
        let query = self.query.clone();
        let vars = self.vars.clone();
        self.db.exec(&query, vars).await
    }

    /// The raw row set.
    pub async fn query(&self) -> DbResult<Vec<AnyRow>> {
        self.db.query(&self.query, self.vars.clone()).await
    }

    /// At most one raw row.
    pub async fn query_row(&self) -> DbResult<Option<AnyRow>> {
        self.db.query_row(&self.query, self.vars.clone()).await
    }
}
