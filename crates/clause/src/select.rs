// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! SELECT clause body.

use crate::expression::Expression;
use crate::{Builder, Clause, ClauseItem, ClauseName, Column, Quoted};

/// Column list plus free-form select expressions. With neither, `*` is
/// emitted. `distinct` is sticky across merges.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Select {
    pub columns: Vec<Column>,
    pub expressions: Vec<Expression>,
    pub distinct: bool,
}

impl Select {
    pub fn build(&self, builder: &mut dyn Builder) {
        let column_count = self.columns.len();
        if column_count > 0 {
            if self.distinct {
                builder.write_str("DISTINCT ");
            }
            for (idx, column) in self.columns.iter().enumerate() {
                if idx > 0 {
                    builder.write_byte(',');
                }
                builder.write_quoted(Quoted::Column(column));
            }
        }

        for (idx, expr) in self.expressions.iter().enumerate() {
            if column_count > 0 || idx > 0 {
                builder.write_byte(',');
            }
            expr.build(builder);
        }
        if column_count == 0 && self.expressions.is_empty() {
            builder.write_byte('*');
        }
    }
}

impl ClauseItem for Select {
    fn name(&self) -> ClauseName {
        ClauseName::Select
    }

    fn merge_into(mut self, clause: &mut Clause) {
        if let Some(Expression::Select(prev)) = clause.expression.take() {
            if !self.distinct && prev.distinct {
                self.distinct = true;
            }
            self.expressions = [prev.expressions, self.expressions].concat();
            self.columns = [prev.columns, self.columns].concat();
        }
        clause.expression = Some(Expression::Select(self));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::expr;
    use crate::test_support::TestStatement;
    use crate::value::Value;
    use crate::From;

    #[test]
    fn test_select_star_when_empty() {
        let mut stmt = TestStatement::new();
        stmt.add(Select::default()).add(From::default());
        let (sql, vars) = stmt.build();
        assert_eq!(sql, "SELECT * FROM `user`");
        assert!(vars.is_empty());
    }

    #[test]
    fn test_select_columns() {
        let mut stmt = TestStatement::new();
        stmt.add(Select {
            columns: vec![Column::new("id"), Column::new("name")],
            ..Select::default()
        })
        .add(From::default());
        let (sql, _) = stmt.build();
        assert_eq!(sql, "SELECT `id`,`name` FROM `user`");
    }

    #[test]
    fn test_select_distinct_sticky_across_merges() {
        let mut stmt = TestStatement::new();
        stmt.add(Select {
            columns: vec![Column::new("id")],
            distinct: true,
            ..Select::default()
        })
        .add(Select {
            columns: vec![Column::new("name")],
            ..Select::default()
        })
        .add(From::default());
        let (sql, _) = stmt.build();
        assert_eq!(sql, "SELECT DISTINCT `id`,`name` FROM `user`");
    }

    #[test]
    fn test_select_merge_accumulates_without_dedup() {
        let mut stmt = TestStatement::new();
        stmt.add(Select {
            columns: vec![Column::new("id")],
            ..Select::default()
        })
        .add(Select {
            columns: vec![Column::new("id")],
            ..Select::default()
        })
        .add(From::default());
        let (sql, _) = stmt.build();
        assert_eq!(sql, "SELECT `id`,`id` FROM `user`");
    }

    #[test]
    fn test_select_expressions_follow_columns() {
        let mut stmt = TestStatement::new();
        stmt.add(Select {
            columns: vec![Column::new("id")],
            expressions: vec![Expression::Raw(expr("count(*) as total", vec![]))],
            ..Select::default()
        })
        .add(From::default());
        let (sql, vars) = stmt.build();
        assert_eq!(sql, "SELECT `id`,count(*) as total FROM `user`");
        assert_eq!(vars, Vec::<Value>::new());
    }
}
