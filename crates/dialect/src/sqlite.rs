// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! SQLite dialect: backtick quoting, `?` placeholders. SQLite reports the
//! *last* rowid of a batch insert, so id reconstruction walks backwards.

use sqlgate_clause::{Value, Writer};

use crate::Dialect;

#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

#[async_trait::async_trait]
impl Dialect for SqliteDialect {
    fn quote_to(&self, writer: &mut dyn Writer, ident: &str) {
        writer.write_byte('`');
        writer.write_str(ident);
        writer.write_byte('`');
    }

    fn bind_var_to(&self, writer: &mut dyn Writer, _var_index: usize, _value: &Value) {
        writer.write_byte('?');
    }

    fn last_insert_id_reversed(&self) -> bool {
        true
    }
}
