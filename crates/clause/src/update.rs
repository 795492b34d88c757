// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! UPDATE and SET clause bodies.

use crate::expression::Expression;
use crate::value::Var;
use crate::{Builder, Clause, ClauseItem, ClauseName, Column, Quoted, Table, current_table};

/// `[<modifier> ]<table>`; the `UPDATE` keyword comes from the slot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Update {
    pub modifier: Option<String>,
    pub table: Option<Table>,
}

impl Update {
    pub fn build(&self, builder: &mut dyn Builder) {
        if let Some(modifier) = &self.modifier {
            builder.write_str(modifier);
            builder.write_byte(' ');
        }

        match &self.table {
            Some(table) => builder.write_quoted(Quoted::Table(table)),
            None => builder.write_quoted(Quoted::Table(&current_table())),
        }
    }
}

impl ClauseItem for Update {
    fn name(&self) -> ClauseName {
        ClauseName::Update
    }

    fn merge_into(mut self, clause: &mut Clause) {
        if let Some(Expression::Update(prev)) = clause.expression.take() {
            if self.modifier.is_none() {
                self.modifier = prev.modifier;
            }
            if self.table.is_none() {
                self.table = prev.table;
            }
        }
        clause.expression = Some(Expression::Update(self));
    }
}

/// One `column=?` assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: Column,
    pub value: Var,
}

/// Comma-separated assignments.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Set {
    pub assignments: Vec<Assignment>,
}

impl Set {
    pub fn build(&self, builder: &mut dyn Builder) {
        for (idx, assignment) in self.assignments.iter().enumerate() {
            if idx > 0 {
                builder.write_byte(',');
            }
            builder.write_quoted(Quoted::Column(&assignment.column));
            builder.write_byte('=');
            builder.add_var(&assignment.value);
        }
    }
}

impl ClauseItem for Set {
    fn name(&self) -> ClauseName {
        ClauseName::Set
    }

    fn merge_into(mut self, clause: &mut Clause) {
        if let Some(Expression::Set(prev)) = clause.expression.take() {
            self.assignments = [prev.assignments, self.assignments].concat();
        }
        clause.expression = Some(Expression::Set(self));
    }
}
