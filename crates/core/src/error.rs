// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types
//!
//! Driver errors are forwarded verbatim; the sentinels
//! [`DbError::RecordNotFound`] and [`DbError::MissingWhereClause`] are unit
//! variants so callers can match on them.

use thiserror::Error;

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Errors surfaced by the builder and execution layers.
#[derive(Debug, Error)]
pub enum DbError {
    /// A single-row read matched nothing.
    #[error("record not found")]
    RecordNotFound,

    /// DELETE without any WHERE contribution.
    #[error("missing WHERE clause while deleting")]
    MissingWhereClause,

    /// A condition argument shape the normaliser cannot coerce.
    #[error("unsupported query args type: {0}")]
    UnsupportedQueryArgs(String),

    /// Invalid input to a builder operation.
    #[error("{0}")]
    Builder(String),

    /// Missing default alias, unknown driver, unknown policy mode.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Commit or rollback without an open transaction.
    #[error("no active transaction")]
    NoActiveTransaction,

    /// A result column whose value shape has no [`Value`] counterpart.
    ///
    /// [`Value`]: sqlgate_clause::Value
    #[error("failed to decode column `{0}`: unsupported value type")]
    Decode(String),

    /// Opaque driver error, forwarded with no alteration.
    #[error(transparent)]
    Driver(#[from] sqlx::Error),
}
