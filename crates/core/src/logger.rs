// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Per-query logging sink
//!
//! Each driver call is wrapped in a [`QueryStatus`] carrying the dispatched
//! SQL, the flattened arguments, wall-clock timing and the outcome. When
//! query logging is enabled the status renders one line per field through
//! `tracing`.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use sqlgate_clause::Value;

static INVISIBLE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\r\n\t]+").expect("static pattern"));

/// One executed query, ready for explanation.
pub struct QueryStatus<'a> {
    pub query: &'a str,
    pub args: &'a [Value],
    pub elapsed: Duration,
    pub err: Option<String>,
}

impl std::fmt::Display for QueryStatus<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.query.is_empty() {
            let query = INVISIBLE_CHARS.replace_all(self.query, " ");
            writeln!(f, "Query: {}", query.trim())?;
        }

        if !self.args.is_empty() {
            writeln!(f, "Args:  {:?}", self.args)?;
        }

        if let Some(err) = &self.err {
            writeln!(f, "Error: {err}")?;
        }

        write!(f, "Time:  {:.5}s", self.elapsed.as_secs_f64())
    }
}

/// Emit the status through the log sink when query logging is on.
pub(crate) fn explain_sql(status: &QueryStatus<'_>, show: bool) {
    if !show {
        return;
    }

    if status.err.is_some() {
        tracing::error!(target: "sqlgate::sql", "\n{status}");
    } else {
        tracing::info!(target: "sqlgate::sql", "\n{status}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_rendering_collapses_whitespace() {
        let status = QueryStatus {
            query: "select *\n\t from user  where id = ?",
            args: &[Value::Int(1)],
            elapsed: Duration::from_micros(120),
            err: None,
        };
        let rendered = status.to_string();
        assert_eq!(
            rendered,
            "Query: select * from user where id = ?\nArgs:  [Int(1)]\nTime:  0.00012s"
        );
    }

    #[test]
    fn test_status_rendering_skips_empty_args() {
        let status = QueryStatus {
            query: "select 1",
            args: &[],
            elapsed: Duration::from_secs(1),
            err: Some("boom".to_owned()),
        };
        let rendered = status.to_string();
        assert_eq!(rendered, "Query: select 1\nError: boom\nTime:  1.00000s");
    }
}
