// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Result scanning
//!
//! Rows come back through the runtime-generic driver; these helpers decode
//! them into the destination families the terminal operations expose:
//! mappings of [`Value`], `FromRow` records/tuples, and bare scalars.
//!
//! NULL decodes to [`Value::Null`] regardless of the column type; a column
//! shape with no [`Value`] counterpart surfaces a decode error naming the
//! column.

use sqlx::any::AnyRow;
use sqlx::{Column as _, Row as _};

use sqlgate_clause::Value;

use crate::error::{DbError, DbResult};
use crate::row::Row;

/// Decode one column position into a [`Value`].
pub fn decode_value(row: &AnyRow, idx: usize) -> DbResult<Value> {
    if let Ok(v) = row.try_get::<Option<i64>, _>(idx) {
        return Ok(v.map(Value::Int).unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(idx) {
        return Ok(v.map(Value::Float).unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(idx) {
        return Ok(v.map(Value::Bool).unwrap_or(Value::Null));
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(idx) {
        return Ok(v.map(Value::Text).unwrap_or(Value::Null));
    }

    Err(DbError::Decode(row.column(idx).name().to_owned()))
}

/// Decode a whole row into a column -> value mapping.
pub fn row_to_map(row: &AnyRow) -> DbResult<Row> {
    let mut mapping = Row::with_capacity(row.len());
    for idx in 0..row.len() {
        mapping.insert(row.column(idx).name().to_owned(), decode_value(row, idx)?);
    }
    Ok(mapping)
}

/// Decode every row into a mapping.
pub fn rows_to_maps(rows: &[AnyRow]) -> DbResult<Vec<Row>> {
    rows.iter().map(row_to_map).collect()
}

/// The first row as a mapping; [`DbError::RecordNotFound`] when empty.
pub fn single_map(rows: &[AnyRow]) -> DbResult<Row> {
    match rows.first() {
        Some(row) => row_to_map(row),
        None => Err(DbError::RecordNotFound),
    }
}

/// Decode rows into `FromRow` destinations (records, tuples).
pub fn rows_to<T>(rows: &[AnyRow]) -> DbResult<Vec<T>>
where
    T: for<'r> sqlx::FromRow<'r, AnyRow>,
{
    rows.iter()
        .map(|row| T::from_row(row).map_err(DbError::from))
        .collect()
}

/// The first row as a `FromRow` destination; [`DbError::RecordNotFound`]
/// when empty.
pub fn single<T>(rows: &[AnyRow]) -> DbResult<T>
where
    T: for<'r> sqlx::FromRow<'r, AnyRow>,
{
    match rows.first() {
        Some(row) => T::from_row(row).map_err(DbError::from),
        None => Err(DbError::RecordNotFound),
    }
}

/// Decode the first column of every row.
pub fn rows_to_scalars<T>(rows: &[AnyRow]) -> DbResult<Vec<T>>
where
    T: for<'r> sqlx::Decode<'r, sqlx::Any> + sqlx::Type<sqlx::Any>,
{
    rows.iter()
        .map(|row| row.try_get::<T, _>(0).map_err(DbError::from))
        .collect()
}

/// The first column of the first row; [`DbError::RecordNotFound`] when empty.
pub fn single_scalar<T>(rows: &[AnyRow]) -> DbResult<T>
where
    T: for<'r> sqlx::Decode<'r, sqlx::Any> + sqlx::Type<sqlx::Any>,
{
    match rows.first() {
        Some(row) => row.try_get::<T, _>(0).map_err(DbError::from),
        None => Err(DbError::RecordNotFound),
    }
}
