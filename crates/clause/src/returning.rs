// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! RETURNING clause body.

use crate::expression::Expression;
use crate::{Builder, Clause, ClauseItem, ClauseName, Column, Quoted};

/// `*` without columns, otherwise a comma-separated quoted column list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Returning {
    pub columns: Vec<Column>,
}

impl Returning {
    pub fn build(&self, builder: &mut dyn Builder) {
        if self.columns.is_empty() {
            builder.write_byte('*');
            return;
        }

        for (idx, column) in self.columns.iter().enumerate() {
            if idx > 0 {
                builder.write_byte(',');
            }
            builder.write_quoted(Quoted::Column(column));
        }
    }
}

impl ClauseItem for Returning {
    fn name(&self) -> ClauseName {
        ClauseName::Returning
    }

    fn merge_into(mut self, clause: &mut Clause) {
        if let Some(Expression::Returning(prev)) = clause.expression.take() {
            self.columns = [prev.columns, self.columns].concat();
        }
        clause.expression = Some(Expression::Returning(self));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestStatement;

    #[test]
    fn test_returning_star_when_empty() {
        let mut stmt = TestStatement::new();
        stmt.add(Returning::default());
        let (sql, _) = stmt.build();
        assert_eq!(sql, "RETURNING *");
    }

    #[test]
    fn test_returning_columns_merge() {
        let mut stmt = TestStatement::new();
        stmt.add(Returning {
            columns: vec![Column::new("id")],
        })
        .add(Returning {
            columns: vec![Column::new("name")],
        });
        let (sql, _) = stmt.build();
        assert_eq!(sql, "RETURNING `id`,`name`");
    }
}
