// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! GROUP BY clause body, including HAVING.

use crate::expression::Expression;
use crate::where_clause::Where;
use crate::{Builder, Clause, ClauseItem, ClauseName, Column, Quoted};

/// Comma-separated grouping columns; the having expressions render as a
/// WHERE-style conjunction after ` HAVING `.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupBy {
    pub columns: Vec<Column>,
    pub having: Vec<Expression>,
}

impl GroupBy {
    pub fn build(&self, builder: &mut dyn Builder) {
        for (idx, column) in self.columns.iter().enumerate() {
            if idx > 0 {
                builder.write_byte(',');
            }
            builder.write_quoted(Quoted::Column(column));
        }

        if !self.having.is_empty() {
            builder.write_str(" HAVING ");
            Where {
                exprs: self.having.clone(),
            }
            .build(builder);
        }
    }
}

impl ClauseItem for GroupBy {
    fn name(&self) -> ClauseName {
        ClauseName::GroupBy
    }

    fn merge_into(mut self, clause: &mut Clause) {
        if let Some(Expression::GroupBy(prev)) = clause.expression.take() {
            self.columns = [prev.columns, self.columns].concat();
            self.having = [prev.having, self.having].concat();
        }
        clause.expression = Some(Expression::GroupBy(self));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::gt;
    use crate::test_support::TestStatement;
    use crate::value::Value;

    #[test]
    fn test_group_by_columns() {
        let mut stmt = TestStatement::new();
        stmt.add(GroupBy {
            columns: vec![Column::new("role")],
            ..GroupBy::default()
        });
        let (sql, _) = stmt.build();
        assert_eq!(sql, "GROUP BY `role`");
    }

    #[test]
    fn test_group_by_having() {
        let mut stmt = TestStatement::new();
        stmt.add(GroupBy {
            columns: vec![Column::new("role")],
            having: vec![gt("age", 18)],
        });
        let (sql, vars) = stmt.build();
        assert_eq!(sql, "GROUP BY `role` HAVING `age` > ?");
        assert_eq!(vars, vec![Value::Int(18)]);
    }

    #[test]
    fn test_group_by_merge_concatenates() {
        let mut stmt = TestStatement::new();
        stmt.add(GroupBy {
            columns: vec![Column::new("role")],
            ..GroupBy::default()
        })
        .add(GroupBy {
            columns: vec![Column::new("city")],
            having: vec![gt("age", 18)],
        });
        let (sql, _) = stmt.build();
        assert_eq!(sql, "GROUP BY `role`,`city` HAVING `age` > ?");
    }
}
