// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! FOR (row locking) clause body.

use crate::expression::Expression;
use crate::{Builder, Clause, ClauseItem, ClauseName, Quoted, Table};

/// One `FOR <strength>[ OF <table>][ <options>]` entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Lock {
    pub strength: String,
    pub table: Option<Table>,
    pub options: Option<String>,
}

/// Space-separated lock entries; writes its own `FOR` keywords.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct For {
    pub locks: Vec<Lock>,
}

impl For {
    pub fn build(&self, builder: &mut dyn Builder) {
        for (idx, lock) in self.locks.iter().enumerate() {
            if idx > 0 {
                builder.write_byte(' ');
            }

            builder.write_str("FOR ");
            builder.write_str(&lock.strength);
            if let Some(table) = &lock.table {
                builder.write_str(" OF ");
                builder.write_quoted(Quoted::Table(table));
            }

            if let Some(options) = &lock.options {
                builder.write_byte(' ');
                builder.write_str(options);
            }
        }
    }
}

impl ClauseItem for For {
    fn name(&self) -> ClauseName {
        ClauseName::For
    }

    fn merge_into(mut self, clause: &mut Clause) {
        clause.name = None;

        if let Some(Expression::For(prev)) = clause.expression.take() {
            self.locks = [prev.locks, self.locks].concat();
        }

        clause.expression = Some(Expression::For(self));
    }
}
