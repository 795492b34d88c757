// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sqlgate
//!
//! A composable SQL statement builder with connection pooling and
//! master/slave routing on top of the runtime-generic sqlx driver.
//!
//! ## Architecture
//!
//! - [`EngineGroup`]: named aliases -> (master, slaves, picker, dialect)
//! - [`DbClient`]: routed executor with IN-expansion, rebinding,
//!   transactions, and query logging
//! - [`Session`]: fluent per-query builder over the clause layer
//! - [`Statement`]: clause accumulation and ordered emission
//! - [`RawSession`]: literal SQL through the same execution pipeline
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sqlgate::{DbConfig, EngineGroup};
//!
//! let conf: DbConfig = serde_yaml::from_str(config_text)?;
//! let engines = EngineGroup::open(conf, true).await?;
//!
//! let id = engines
//!     .table("auth_user")
//!     .create(&HashMap::from([
//!         ("username".to_owned(), Value::from("bin")),
//!         ("age".to_owned(), Value::from(18)),
//!     ]))
//!     .await?;
//!
//! let adults: Vec<AuthUser> = engines
//!     .table("auth_user")
//!     .where_("age >= ?", (18,))
//!     .desc(&["id"])
//!     .find()
//!     .await?;
//! ```

pub mod client;
pub mod conditions;
pub mod config;
pub mod engine;
pub mod error;
pub mod logger;
pub mod params;
pub mod policy;
pub mod raw;
pub mod row;
pub mod scan;
pub mod session;
pub mod statement;
pub mod utils;

// The clause and dialect layers, re-exported for extension points.
pub use sqlgate_clause as clause;
pub use sqlgate_dialect as dialect;

// Re-exports
pub use client::DbClient;
pub use config::{ClusterConfig, Config, DbConfig, EngineConfig, PolicyOptions};
pub use engine::{Connection, ConnectionEngine, DEFAULT_DB_ALIAS, EngineGroup};
pub use error::{DbError, DbResult};
pub use logger::QueryStatus;
pub use params::{IntoParams, Param};
pub use policy::{
    Policy, PolicyHandler, PolicyParams, get_policy_handler, least_conn_policy, random_policy,
    register_policy_handler, round_robin_policy, weight_random_policy, weight_round_robin_policy,
};
pub use raw::RawSession;
pub use row::{Row, ToRow};
pub use session::Session;
pub use statement::Statement;

pub use sqlgate_clause::{Value, Var, expr};

/// Open every engine in the configuration mapping.
///
/// Convenience alias for [`EngineGroup::open`].
pub async fn open_db_engine(conf: DbConfig, show_sql: bool) -> DbResult<EngineGroup> {
    EngineGroup::open(conf, show_sql).await
}
