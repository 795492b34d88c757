// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # SQL text utilities
//!
//! Identifier tokenisation for `Table(...)`/`Select(...)` input strings,
//! the `in ?` -> `in (?)` rewrite, INSERT detection, the exec-level
//! `IN (?)`-expansion pass, and dialect rebinding.

use std::sync::LazyLock;

use regex::Regex;
use sqlgate_clause::{Column, Table, Value};
use sqlgate_dialect::Dialect;

use crate::params::Param;

static IN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+in[\s|(]*\?[\s|)]*").expect("static pattern"));

static INSERT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*insert\s+").expect("static pattern"));

/// Rewrite the literal `in ?` (any bracket/space shape) to `in (?)` so the
/// expansion pass has a uniform target.
pub fn convert_in_sql(sql: &str) -> String {
    IN_PATTERN.replace_all(sql, " in (?) ").into_owned()
}

/// Whether the statement is an INSERT; those skip `IN`-expansion because
/// the VALUES clause already produced the right arity.
pub fn is_insert_sql(sql: &str) -> bool {
    INSERT_PATTERN.is_match(sql)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '*'
}

fn tokenize(part: &str) -> Vec<&str> {
    part.split(|c: char| !is_ident_char(c))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Tokenise a comma-separated table string: `name`, `name AS alias`, or
/// anything else kept verbatim as a raw (unquoted) table.
pub(crate) fn parse_tables(input: &str) -> Vec<Table> {
    input
        .split(',')
        .map(|part| {
            let tokens = tokenize(part);
            match tokens.as_slice() {
                [name] => Table::new(*name),
                [name, as_token, alias] if as_token.eq_ignore_ascii_case("as") => Table {
                    name: (*name).to_owned(),
                    alias: Some((*alias).to_owned()),
                    raw: false,
                },
                _ => Table {
                    name: part.to_owned(),
                    alias: None,
                    raw: true,
                },
            }
        })
        .collect()
}

/// Tokenise one comma-split select column with the same rule as tables.
pub(crate) fn parse_column(part: &str) -> Column {
    let tokens = tokenize(part);
    match tokens.as_slice() {
        [name] => Column::new(*name),
        [name, as_token, alias] if as_token.eq_ignore_ascii_case("as") => Column {
            table: None,
            name: (*name).to_owned(),
            alias: Some((*alias).to_owned()),
            raw: false,
        },
        _ => Column {
            table: None,
            name: part.to_owned(),
            alias: None,
            raw: true,
        },
    }
}

/// Expand each `?` bound to a sequence into a comma-separated placeholder
/// run of the right arity and flatten the arguments. An empty sequence
/// renders `NULL` in place of its marker.
pub(crate) fn expand_in_args(sql: &str, args: Vec<Param>) -> (String, Vec<Value>) {
    let mut expanded = String::with_capacity(sql.len());
    let mut values = Vec::with_capacity(args.len());
    let mut args = args.into_iter();

    for c in sql.chars() {
        if c != '?' {
            expanded.push(c);
            continue;
        }
        match args.next() {
            Some(Param::Value(v)) => {
                expanded.push('?');
                values.push(v);
            }
            Some(Param::List(items)) if items.is_empty() => expanded.push_str("NULL"),
            Some(Param::List(items)) => {
                for (idx, item) in items.into_iter().enumerate() {
                    if idx > 0 {
                        expanded.push(',');
                    }
                    expanded.push('?');
                    values.push(item);
                }
            }
            // More markers than arguments: keep the tail verbatim.
            None => expanded.push('?'),
        }
    }

    for leftover in args {
        match leftover {
            Param::Value(v) => values.push(v),
            Param::List(items) => values.extend(items),
        }
    }

    (expanded, values)
}

/// Flatten arguments without touching the SQL (the INSERT path).
pub(crate) fn flatten_args(args: Vec<Param>) -> Vec<Value> {
    let mut values = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            Param::Value(v) => values.push(v),
            Param::List(items) => values.extend(items),
        }
    }
    values
}

/// Rewrite `?` markers to the dialect's placeholder style (identity for
/// `?`-style dialects, `$N` numbering for PostgreSQL).
pub(crate) fn rebind(dialect: &dyn Dialect, sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut index = 0;
    for c in sql.chars() {
        if c == '?' {
            index += 1;
            dialect.bind_var_to(&mut out, index, &Value::Null);
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlgate_dialect::{MysqlDialect, PostgresDialect};

    #[test]
    fn test_convert_in_sql() {
        assert_eq!(
            convert_in_sql("select * from t where id in ?"),
            "select * from t where id in (?) "
        );
        assert_eq!(
            convert_in_sql("select * from t where id IN (?)"),
            "select * from t where id in (?) "
        );
        assert_eq!(
            convert_in_sql("select * from t where id = ?"),
            "select * from t where id = ?"
        );
    }

    #[test]
    fn test_is_insert_sql_is_anchored() {
        assert!(is_insert_sql("insert into t values (?)"));
        assert!(is_insert_sql("  INSERT INTO t VALUES (?)"));
        assert!(!is_insert_sql("select * from t where note = 'insert '"));
        assert!(!is_insert_sql("update t set a = 1"));
    }

    #[test]
    fn test_parse_tables() {
        assert_eq!(parse_tables("user"), vec![Table::new("user")]);
        assert_eq!(
            parse_tables("user AS u"),
            vec![Table {
                name: "user".to_owned(),
                alias: Some("u".to_owned()),
                raw: false,
            }]
        );
        assert_eq!(
            parse_tables("user,profile"),
            vec![Table::new("user"), Table::new("profile")]
        );
        assert_eq!(
            parse_tables("(select * from t)"),
            vec![Table {
                name: "(select * from t)".to_owned(),
                alias: None,
                raw: true,
            }]
        );
    }

    #[test]
    fn test_parse_column() {
        assert_eq!(parse_column("id"), Column::new("id"));
        assert_eq!(
            parse_column("id as uid"),
            Column {
                table: None,
                name: "id".to_owned(),
                alias: Some("uid".to_owned()),
                raw: false,
            }
        );
        assert_eq!(
            parse_column("count(id)"),
            Column {
                table: None,
                name: "count(id)".to_owned(),
                alias: None,
                raw: true,
            }
        );
    }

    #[test]
    fn test_expand_in_args() {
        let (sql, values) = expand_in_args(
            "select * from t where id in (?) and age > ?",
            vec![Param::List(vec![Value::Int(1), Value::Int(2)]), 18.into()],
        );
        assert_eq!(sql, "select * from t where id in (?,?) and age > ?");
        assert_eq!(values, vec![Value::Int(1), Value::Int(2), Value::Int(18)]);
    }

    #[test]
    fn test_expand_in_args_empty_list() {
        let (sql, values) =
            expand_in_args("select * from t where id in (?)", vec![Param::List(vec![])]);
        assert_eq!(sql, "select * from t where id in (NULL)");
        assert!(values.is_empty());
    }

    #[test]
    fn test_rebind_styles() {
        let mysql = MysqlDialect;
        let postgres = PostgresDialect;
        let sql = "select * from t where a = ? and b in (?,?)";
        assert_eq!(rebind(&mysql, sql), sql);
        assert_eq!(
            rebind(&postgres, sql),
            "select * from t where a = $1 and b in ($2,$3)"
        );
    }
}
