// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! ORDER BY clause body.

use crate::expression::Expression;
use crate::{Builder, Clause, ClauseItem, ClauseName, Column, Quoted};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderByColumn {
    pub column: Column,
    pub desc: bool,
}

/// Comma-separated order columns; descending columns carry ` DESC`,
/// ascending ones no suffix.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderBy {
    pub columns: Vec<OrderByColumn>,
}

impl OrderBy {
    pub fn build(&self, builder: &mut dyn Builder) {
        for (idx, column) in self.columns.iter().enumerate() {
            if idx > 0 {
                builder.write_byte(',');
            }
            builder.write_quoted(Quoted::Column(&column.column));
            if column.desc {
                builder.write_str(" DESC");
            }
        }
    }
}

impl ClauseItem for OrderBy {
    fn name(&self) -> ClauseName {
        ClauseName::OrderBy
    }

    fn merge_into(mut self, clause: &mut Clause) {
        if let Some(Expression::OrderBy(prev)) = clause.expression.take() {
            self.columns = [prev.columns, self.columns].concat();
        }
        clause.expression = Some(Expression::OrderBy(self));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestStatement;

    fn order(name: &str, desc: bool) -> OrderByColumn {
        OrderByColumn {
            column: Column::new(name),
            desc,
        }
    }

    #[test]
    fn test_order_by_directions() {
        let mut stmt = TestStatement::new();
        stmt.add(OrderBy {
            columns: vec![order("created_at", true), order("id", false)],
        });
        let (sql, _) = stmt.build();
        assert_eq!(sql, "ORDER BY `created_at` DESC,`id`");
    }

    #[test]
    fn test_order_by_merge_concatenates() {
        let mut stmt = TestStatement::new();
        stmt.add(OrderBy {
            columns: vec![order("age", true)],
        })
        .add(OrderBy {
            columns: vec![order("id", false)],
        });
        let (sql, _) = stmt.build();
        assert_eq!(sql, "ORDER BY `age` DESC,`id`");
    }
}
