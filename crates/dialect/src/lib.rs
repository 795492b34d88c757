// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sqlgate - Dialect Layer
//!
//! A [`Dialect`] renders identifier quotes and bind placeholders and answers
//! the capability questions the execution layer needs: does the database
//! hand back the first or the last id of a batch insert, and can an INSERT
//! carry `RETURNING`. RETURNING-capable dialects additionally discover
//! primary-key columns through a [`Queryer`] the caller supplies.
//!
//! Dialects register under their driver name in a process-wide table that
//! is populated with the builtins on first use; user dialects may be added
//! during startup, before any engine is opened. Lookups are case-sensitive
//! to the driver string used at configuration time.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, RwLock};

use async_trait::async_trait;
use sqlgate_clause::{Value, Writer};

pub mod mysql;
pub mod postgres;
pub mod sqlite;

pub use mysql::MysqlDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

/// Minimal query capability handed to [`Dialect::pk_column_names`].
///
/// Implementations run the catalogue query and return the first column of
/// the first row as text; any driver failure surfaces as `None`.
#[async_trait]
pub trait Queryer: Send + Sync {
    async fn query_text(&self, sql: &str, args: &[Value]) -> Option<String>;
}

/// Rendering and capability strategy for one database flavour.
#[async_trait]
pub trait Dialect: Send + Sync {
    /// Write the quoted identifier.
    fn quote_to(&self, writer: &mut dyn Writer, ident: &str);

    /// Write the placeholder for the bind at `var_index` (1-based).
    fn bind_var_to(&self, writer: &mut dyn Writer, var_index: usize, value: &Value);

    /// Whether the driver reports the *last* id of a batch insert rather
    /// than the first.
    fn last_insert_id_reversed(&self) -> bool {
        false
    }

    /// Whether INSERT supports a `RETURNING` clause for id recovery.
    fn with_returning(&self) -> bool {
        false
    }

    /// Primary-key columns of `table`; consulted only when
    /// [`with_returning`](Dialect::with_returning) is true.
    async fn pk_column_names(&self, queryer: &dyn Queryer, table: &str) -> Vec<String> {
        let _ = (queryer, table);
        Vec::new()
    }
}

static DIALECTS: LazyLock<RwLock<HashMap<String, Arc<dyn Dialect>>>> = LazyLock::new(|| {
    let mut mapping: HashMap<String, Arc<dyn Dialect>> = HashMap::new();
    mapping.insert("mysql".to_owned(), Arc::new(MysqlDialect::default()));
    mapping.insert("postgres".to_owned(), Arc::new(PostgresDialect::default()));
    mapping.insert("sqlite".to_owned(), Arc::new(SqliteDialect::default()));
    RwLock::new(mapping)
});

/// Register a dialect under a driver name. Registration must happen during
/// startup, before engines are opened against that name.
pub fn register_dialect(name: impl Into<String>, dialect: Arc<dyn Dialect>) {
    DIALECTS
        .write()
        .expect("dialect registry poisoned")
        .insert(name.into(), dialect);
}

/// Look up the dialect registered for a driver name.
pub fn get_dialect(name: &str) -> Option<Arc<dyn Dialect>> {
    DIALECTS
        .read()
        .expect("dialect registry poisoned")
        .get(name)
        .cloned()
}
