// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! INSERT and VALUES clause bodies.

use crate::expression::Expression;
use crate::value::Var;
use crate::{Builder, Clause, ClauseItem, ClauseName, Column, Quoted, Table, current_table};

/// `[<modifier> ]INTO <table>`; the `INSERT` keyword comes from the slot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Insert {
    pub table: Option<Table>,
    pub modifier: Option<String>,
}

impl Insert {
    pub fn build(&self, builder: &mut dyn Builder) {
        if let Some(modifier) = &self.modifier {
            builder.write_str(modifier);
            builder.write_byte(' ');
        }

        builder.write_str("INTO ");
        match &self.table {
            Some(table) => builder.write_quoted(Quoted::Table(table)),
            None => builder.write_quoted(Quoted::Table(&current_table())),
        }
    }
}

impl ClauseItem for Insert {
    fn name(&self) -> ClauseName {
        ClauseName::Insert
    }

    fn merge_into(mut self, clause: &mut Clause) {
        if let Some(Expression::Insert(prev)) = clause.expression.take() {
            if self.modifier.is_none() {
                self.modifier = prev.modifier;
            }
            if self.table.is_none() {
                self.table = prev.table;
            }
        }
        clause.expression = Some(Expression::Insert(self));
    }
}

/// `(col…) VALUES (?…),(?…)`; writes its own `VALUES` keyword.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Values {
    pub columns: Vec<Column>,
    pub values: Vec<Vec<Var>>,
}

impl Values {
    pub fn build(&self, builder: &mut dyn Builder) {
        if self.columns.is_empty() {
            return;
        }

        builder.write_byte('(');
        for (idx, column) in self.columns.iter().enumerate() {
            if idx > 0 {
                builder.write_byte(',');
            }
            builder.write_quoted(Quoted::Column(column));
        }
        builder.write_byte(')');

        builder.write_str(" VALUES ");

        for (idx, row) in self.values.iter().enumerate() {
            if idx > 0 {
                builder.write_byte(',');
            }
            builder.write_byte('(');
            builder.add_vars(row);
            builder.write_byte(')');
        }
    }
}

impl ClauseItem for Values {
    fn name(&self) -> ClauseName {
        ClauseName::Values
    }

    fn merge_into(mut self, clause: &mut Clause) {
        clause.name = None;
        if let Some(Expression::Values(prev)) = clause.expression.take() {
            self.values = [prev.values, self.values].concat();
        }
        clause.expression = Some(Expression::Values(self));
    }
}
