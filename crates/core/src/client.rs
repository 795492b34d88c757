// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Execution wrapper
//!
//! [`DbClient`] carries an engine reference plus per-client routing state.
//! Every dispatch runs the same pre-execution pipeline: `IN (?)`-expansion
//! (skipped for INSERT statements), placeholder rebinding to the dialect's
//! style, master/slave routing, and the query-logging hook.
//!
//! Writes pin the client to the master for its remaining reads. Inside a
//! transaction every call uses the transaction's connection; dropping the
//! handle without committing rolls the transaction back.

use std::sync::Arc;
use std::time::Instant;

use sqlx::any::{AnyArguments, AnyQueryResult, AnyRow};
use sqlx::{Any, Arguments as _, Transaction};
use tokio::sync::Mutex;

use sqlgate_clause::Value;
use sqlgate_dialect::{Dialect, Queryer};

use crate::engine::ConnectionEngine;
use crate::error::DbResult;
use crate::logger::{QueryStatus, explain_sql};
use crate::params::{IntoParams, Param};
use crate::raw::RawSession;
use crate::session::Session;
use crate::utils::{expand_in_args, flatten_args, is_insert_sql, rebind};

type SharedTx = Arc<Mutex<Option<Transaction<'static, Any>>>>;

/// A routed executor over one engine, optionally bound to a transaction.
#[derive(Clone)]
pub struct DbClient {
    engine: Arc<ConnectionEngine>,
    tx: Option<SharedTx>,
    pub(crate) is_master: bool,
    logging: bool,
}

impl std::fmt::Debug for DbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbClient")
            .field("is_master", &self.is_master)
            .field("logging", &self.logging)
            .field("has_tx", &self.tx.is_some())
            .finish()
    }
}

impl DbClient {
    pub(crate) fn new(engine: Arc<ConnectionEngine>, logging: bool) -> Self {
        DbClient {
            engine,
            tx: None,
            is_master: false,
            logging,
        }
    }

    /// Start a fluent session bound to `table` (comma-separated tables,
    /// optional `AS` aliases).
    pub fn table(&self, table: &str) -> Session {
        Session::new(self.clone(), table)
    }

    /// A session over literal SQL, sharing the execution pipeline.
    pub fn raw(&self, query: impl Into<String>, args: impl IntoParams) -> RawSession {
        RawSession::new(self.clone(), query.into(), args.into_params())
    }

    pub fn dialect(&self) -> Arc<dyn Dialect> {
        self.engine.dialect()
    }

    pub fn driver_name(&self) -> &str {
        self.engine.driver_name()
    }

    /// Rewrite `?` placeholders to the dialect's style.
    pub fn rebind(&self, query: &str) -> String {
        rebind(self.engine.dialect().as_ref(), query)
    }

    /// The shared pre-execution pipeline: IN-expansion (non-INSERT only),
    /// then rebinding when markers remain.
    fn convert(&self, query: &str, args: Vec<Param>) -> (String, Vec<Value>) {
        let (expanded, values) = if is_insert_sql(query) {
            (query.to_owned(), flatten_args(args))
        } else {
            expand_in_args(query, args)
        };

        if expanded.contains('?') {
            (self.rebind(&expanded), values)
        } else {
            (expanded, values)
        }
    }

    /// Execute a write. Targets the master and pins this client to it.
    pub async fn exec(&mut self, query: &str, args: Vec<Param>) -> DbResult<AnyQueryResult> {
        self.is_master = true;

        let (query, values) = self.convert(query, args);
        let start = Instant::now();
        let result = self.run_execute(&query, &values).await;
        self.log(&query, &values, start, result.as_ref().err());
        Ok(result?)
    }

    /// Fetch all rows. Targets the picked slave unless pinned to master.
    pub async fn query(&self, query: &str, args: Vec<Param>) -> DbResult<Vec<AnyRow>> {
        let (query, values) = self.convert(query, args);
        let start = Instant::now();
        let result = self.run_fetch_all(&query, &values).await;
        self.log(&query, &values, start, result.as_ref().err());
        Ok(result?)
    }

    /// Fetch at most one row. Routing as [`query`](DbClient::query).
    pub async fn query_row(&self, query: &str, args: Vec<Param>) -> DbResult<Option<AnyRow>> {
        let (query, values) = self.convert(query, args);
        let start = Instant::now();
        let result = self.run_fetch_optional(&query, &values).await;
        self.log(&query, &values, start, result.as_ref().err());
        Ok(result?)
    }

    /// Run `f` with a client bound to a fresh transaction on the master;
    /// commit on success, roll back on error.
    pub async fn tx<F, Fut, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(DbClient) -> Fut,
        Fut: Future<Output = DbResult<T>>,
    {
        let client = self.begin().await?;
        let handle = client.tx.clone().expect("transaction just opened");

        match f(client).await {
            Ok(value) => {
                if let Some(tx) = handle.lock().await.take() {
                    tx.commit().await?;
                }
                Ok(value)
            }
            Err(err) => {
                if let Some(tx) = handle.lock().await.take() {
                    if let Err(rollback_err) = tx.rollback().await {
                        tracing::error!("sqlgate rollback error: {rollback_err}");
                    }
                }
                Err(err)
            }
        }
    }

    /// Open a transaction on the master and return a client bound to it.
    pub async fn begin(&self) -> DbResult<DbClient> {
        let tx = self.engine.master().pool().begin().await?;
        Ok(DbClient {
            engine: self.engine.clone(),
            tx: Some(Arc::new(Mutex::new(Some(tx)))),
            is_master: true,
            logging: self.logging,
        })
    }

    /// Commit the bound transaction.
    pub async fn commit(&self) -> DbResult<()> {
        match &self.tx {
            Some(handle) => match handle.lock().await.take() {
                Some(tx) => Ok(tx.commit().await?),
                None => Err(crate::error::DbError::NoActiveTransaction),
            },
            None => Err(crate::error::DbError::NoActiveTransaction),
        }
    }

    /// Roll back the bound transaction.
    pub async fn rollback(&self) -> DbResult<()> {
        match &self.tx {
            Some(handle) => match handle.lock().await.take() {
                Some(tx) => Ok(tx.rollback().await?),
                None => Err(crate::error::DbError::NoActiveTransaction),
            },
            None => Err(crate::error::DbError::NoActiveTransaction),
        }
    }

    fn log(&self, query: &str, values: &[Value], start: Instant, err: Option<&sqlx::Error>) {
        explain_sql(
            &QueryStatus {
                query,
                args: values,
                elapsed: start.elapsed(),
                err: err.map(|e| e.to_string()),
            },
            self.logging,
        );
    }

    async fn run_execute(
        &self,
        query: &str,
        values: &[Value],
    ) -> Result<AnyQueryResult, sqlx::Error> {
        let args = bind_arguments(values)?;
        if let Some(handle) = &self.tx {
            let mut guard = handle.lock().await;
            let tx = guard
                .as_mut()
                .ok_or_else(|| sqlx::Error::Configuration("transaction already finished".into()))?;
            sqlx::query_with(query, args).execute(&mut **tx).await
        } else {
            let conn = if self.is_master {
                self.engine.master()
            } else {
                self.engine.slave()
            };
            sqlx::query_with(query, args).execute(conn.pool()).await
        }
    }

    async fn run_fetch_all(
        &self,
        query: &str,
        values: &[Value],
    ) -> Result<Vec<AnyRow>, sqlx::Error> {
        let args = bind_arguments(values)?;
        if let Some(handle) = &self.tx {
            let mut guard = handle.lock().await;
            let tx = guard
                .as_mut()
                .ok_or_else(|| sqlx::Error::Configuration("transaction already finished".into()))?;
            sqlx::query_with(query, args).fetch_all(&mut **tx).await
        } else {
            let conn = if self.is_master {
                self.engine.master()
            } else {
                self.engine.slave()
            };
            sqlx::query_with(query, args).fetch_all(conn.pool()).await
        }
    }

    async fn run_fetch_optional(
        &self,
        query: &str,
        values: &[Value],
    ) -> Result<Option<AnyRow>, sqlx::Error> {
        let args = bind_arguments(values)?;
        if let Some(handle) = &self.tx {
            let mut guard = handle.lock().await;
            let tx = guard
                .as_mut()
                .ok_or_else(|| sqlx::Error::Configuration("transaction already finished".into()))?;
            sqlx::query_with(query, args).fetch_optional(&mut **tx).await
        } else {
            let conn = if self.is_master {
                self.engine.master()
            } else {
                self.engine.slave()
            };
            sqlx::query_with(query, args)
                .fetch_optional(conn.pool())
                .await
        }
    }
}

/// Encode the flattened values into driver arguments, in emission order.
fn bind_arguments<'q>(values: &'q [Value]) -> Result<AnyArguments<'q>, sqlx::Error> {
    let mut args = AnyArguments::default();
    for value in values {
        match value {
            Value::Null => args.add(None::<i64>),
            Value::Bool(v) => args.add(*v),
            Value::Int(v) => args.add(*v),
            Value::Float(v) => args.add(*v),
            Value::Text(v) => args.add(v.as_str()),
        }
        .map_err(sqlx::Error::Encode)?;
    }
    Ok(args)
}

#[async_trait::async_trait]
impl Queryer for DbClient {
    /// Single text column of a single row; `None` on any failure. Backs
    /// dialect primary-key discovery.
    async fn query_text(&self, sql: &str, args: &[Value]) -> Option<String> {
        let params = args.iter().cloned().map(Param::Value).collect();
        match self.query_row(sql, params).await {
            Ok(Some(row)) => sqlx::Row::try_get::<Option<String>, _>(&row, 0).ok().flatten(),
            _ => None,
        }
    }
}
