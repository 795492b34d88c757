// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Condition normalisation
//!
//! Coerces the shapes `Where`/`Having`/`Not`/`Or` accept into expression
//! nodes:
//!
//! 1. string with named `@` markers, or without arguments -> raw fragment
//! 2. string with `?` markers -> raw fragment after the `in ?` rewrite
//! 3. string column with exactly one argument -> equality
//! 4. mapping -> one equality per entry (ascending key order)
//!
//! A query string that parses as an integer is not a condition; it falls
//! through to the unsupported-argument error, as do multi-argument strings
//! without placeholders.

use std::collections::HashMap;

use sqlgate_clause::{Comparison, Expression, Value, expr};

use crate::error::{DbError, DbResult};
use crate::params::Param;
use crate::utils::convert_in_sql;

pub fn build_condition(query: &str, args: Vec<Param>) -> DbResult<Vec<Expression>> {
    if query.parse::<i64>().is_ok() {
        return Err(DbError::UnsupportedQueryArgs("string".to_owned()));
    }

    if args.is_empty() && query.is_empty() {
        return Ok(Vec::new());
    }
    if args.is_empty() || query.contains('@') {
        return Ok(vec![Expression::Raw(expr(query, params_to_vars(args)))]);
    }
    if query.contains('?') {
        return Ok(vec![Expression::Raw(expr(
            convert_in_sql(query),
            params_to_vars(args),
        ))]);
    }
    if args.len() == 1 {
        let mut vars = params_to_vars(args);
        return Ok(vec![Expression::Eq(Comparison {
            column: query.into(),
            value: vars.remove(0),
        })]);
    }

    Err(DbError::UnsupportedQueryArgs("string".to_owned()))
}

/// Mapping form: one equality per entry, in ascending key order so the
/// emitted SQL is deterministic.
pub fn conditions_from_map(mapping: HashMap<String, Value>) -> Vec<Expression> {
    let mut pairs: Vec<(String, Value)> = mapping.into_iter().collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    pairs
        .into_iter()
        .map(|(column, value)| {
            Expression::Eq(Comparison {
                column: column.into(),
                value: value.into(),
            })
        })
        .collect()
}

fn params_to_vars(args: Vec<Param>) -> Vec<sqlgate_clause::Var> {
    args.into_iter().map(Param::into_var).collect()
}
