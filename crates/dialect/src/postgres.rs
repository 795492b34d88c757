// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! PostgreSQL dialect: double-quote quoting, `$N` placeholders, RETURNING
//! support, and primary-key discovery through `pg_indexes`.

use async_trait::async_trait;
use sqlgate_clause::{Value, Writer};

use crate::{Dialect, Queryer};

#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

#[async_trait]
impl Dialect for PostgresDialect {
    fn quote_to(&self, writer: &mut dyn Writer, ident: &str) {
        writer.write_byte('"');
        writer.write_str(ident);
        writer.write_byte('"');
    }

    fn bind_var_to(&self, writer: &mut dyn Writer, var_index: usize, _value: &Value) {
        writer.write_byte('$');
        writer.write_str(&var_index.to_string());
    }

    fn with_returning(&self) -> bool {
        true
    }

    /// Look up the `<table>_pkey` (or `primary`) index and parse its column
    /// list out of the index definition.
    async fn pk_column_names(&self, queryer: &dyn Queryer, table: &str) -> Vec<String> {
        let sql = "SELECT indexdef FROM pg_indexes WHERE tablename=$1 and indexname in ($2,'primary') limit 1";
        let args = [
            Value::Text(table.to_owned()),
            Value::Text(format!("{table}_pkey")),
        ];
        match queryer.query_text(sql, &args).await {
            Some(indexdef) => parse_index_columns(&indexdef),
            None => Vec::new(),
        }
    }
}

/// Extract the column names from an index definition such as
/// `CREATE UNIQUE INDEX user_pkey ON public.user USING btree (id, tenant)`.
fn parse_index_columns(indexdef: &str) -> Vec<String> {
    let Some(open) = indexdef.find('(') else {
        return Vec::new();
    };
    let inner = &indexdef[open + 1..];
    let inner = match inner.find(')') {
        Some(close) => &inner[..close],
        None => inner,
    };

    inner
        .split(',')
        .map(|part| {
            part.trim_start()
                .split(' ')
                .next()
                .unwrap_or_default()
                .to_owned()
        })
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedQueryer(Option<String>);

    #[async_trait]
    impl Queryer for FixedQueryer {
        async fn query_text(&self, _sql: &str, _args: &[Value]) -> Option<String> {
            self.0.clone()
        }
    }

    #[test]
    fn test_quote() {
        let dialect = PostgresDialect;
        let mut buf = String::new();
        dialect.quote_to(&mut buf, "user");
        assert_eq!(buf, "\"user\"");
    }

    #[test]
    fn test_numbered_placeholders() {
        let dialect = PostgresDialect;
        let mut buf = String::new();
        dialect.bind_var_to(&mut buf, 1, &Value::Int(1));
        dialect.bind_var_to(&mut buf, 12, &Value::Int(2));
        assert_eq!(buf, "$1$12");
    }

    #[test]
    fn test_parse_index_columns() {
        let cols = parse_index_columns(
            "CREATE UNIQUE INDEX auth_user_pkey ON public.auth_user USING btree (id)",
        );
        assert_eq!(cols, vec!["id".to_owned()]);

        let cols = parse_index_columns(
            "CREATE UNIQUE INDEX t_pkey ON public.t USING btree (tenant_id, id DESC)",
        );
        assert_eq!(cols, vec!["tenant_id".to_owned(), "id".to_owned()]);

        assert!(parse_index_columns("garbage").is_empty());
    }

    #[tokio::test]
    async fn test_pk_discovery_swallows_missing_index() {
        let dialect = PostgresDialect;
        let cols = dialect.pk_column_names(&FixedQueryer(None), "auth_user").await;
        assert!(cols.is_empty());
    }

    #[tokio::test]
    async fn test_pk_discovery_parses_definition() {
        let dialect = PostgresDialect;
        let queryer = FixedQueryer(Some(
            "CREATE UNIQUE INDEX auth_user_pkey ON public.auth_user USING btree (id)".to_owned(),
        ));
        let cols = dialect.pk_column_names(&queryer, "auth_user").await;
        assert_eq!(cols, vec!["id".to_owned()]);
    }
}
