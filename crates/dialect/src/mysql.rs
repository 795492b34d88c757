// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! MySQL dialect: backtick quoting, `?` placeholders, first-id batch
//! semantics, no RETURNING.

use sqlgate_clause::{Value, Writer};

use crate::Dialect;

#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlDialect;

#[async_trait::async_trait]
impl Dialect for MysqlDialect {
    fn quote_to(&self, writer: &mut dyn Writer, ident: &str) {
        writer.write_byte('`');
        writer.write_str(ident);
        writer.write_byte('`');
    }

    fn bind_var_to(&self, writer: &mut dyn Writer, _var_index: usize, _value: &Value) {
        writer.write_byte('?');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote() {
        let dialect = MysqlDialect;
        let mut buf = String::new();
        dialect.quote_to(&mut buf, "user");
        assert_eq!(buf, "`user`");
    }

    #[test]
    fn test_bind_ignores_index() {
        let dialect = MysqlDialect;
        let mut buf = String::new();
        dialect.bind_var_to(&mut buf, 1, &Value::Int(1));
        dialect.bind_var_to(&mut buf, 9, &Value::Int(9));
        assert_eq!(buf, "??");
    }

    #[test]
    fn test_capabilities() {
        let dialect = MysqlDialect;
        assert!(!dialect.last_insert_id_reversed());
        assert!(!dialect.with_returning());
    }
}
