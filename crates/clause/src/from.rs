// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! FROM clause body: table list and joins.

use crate::expression::Expression;
use crate::where_clause::Where;
use crate::{Builder, Clause, ClauseItem, ClauseName, Quoted, Table, current_table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Cross,
    Inner,
    Left,
    Right,
}

impl JoinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinType::Cross => "CROSS",
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
        }
    }
}

/// One join entry. A raw `expression` replaces the whole body; otherwise the
/// body is `[<type> ]JOIN <table>[ ON <where>][ USING (cols…)]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Join {
    pub join_type: Option<JoinType>,
    pub table: Table,
    pub on: Where,
    pub using: Vec<String>,
    pub expression: Option<Expression>,
}

impl Join {
    pub fn build(&self, builder: &mut dyn Builder) {
        if let Some(expr) = &self.expression {
            expr.build(builder);
            return;
        }

        if let Some(join_type) = self.join_type {
            builder.write_str(join_type.as_str());
            builder.write_byte(' ');
        }

        builder.write_str("JOIN ");
        builder.write_quoted(Quoted::Table(&self.table));

        if !self.on.exprs.is_empty() {
            builder.write_str(" ON ");
            self.on.build(builder);
        } else if !self.using.is_empty() {
            builder.write_str(" USING ");
            builder.write_quoted(Quoted::IdentList(&self.using));
        }
    }
}

/// With no tables the current table is emitted; otherwise a comma-separated
/// quoted table list, followed by the joins.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct From {
    pub tables: Vec<Table>,
    pub joins: Vec<Join>,
}

impl From {
    pub fn build(&self, builder: &mut dyn Builder) {
        if self.tables.is_empty() {
            builder.write_quoted(Quoted::Table(&current_table()));
        } else {
            for (idx, table) in self.tables.iter().enumerate() {
                if idx > 0 {
                    builder.write_byte(',');
                }
                builder.write_quoted(Quoted::Table(table));
            }
        }

        for join in &self.joins {
            builder.write_byte(' ');
            join.build(builder);
        }
    }
}

impl ClauseItem for From {
    fn name(&self) -> ClauseName {
        ClauseName::From
    }

    fn merge_into(mut self, clause: &mut Clause) {
        if let Some(Expression::From(prev)) = clause.expression.take() {
            self.tables = [prev.tables, self.tables].concat();
            self.joins = [prev.joins, self.joins].concat();
        }
        clause.expression = Some(Expression::From(self));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Column;
    use crate::expression::{eq, expr};
    use crate::test_support::TestStatement;
    use crate::value::Value;

    #[test]
    fn test_from_defaults_to_current_table() {
        let mut stmt = TestStatement::new();
        stmt.add(From::default());
        let (sql, _) = stmt.build();
        assert_eq!(sql, "FROM `user`");
    }

    #[test]
    fn test_from_tables_with_alias() {
        let mut stmt = TestStatement::new();
        stmt.add(From {
            tables: vec![
                Table::new("users"),
                Table {
                    name: "profiles".to_owned(),
                    alias: Some("p".to_owned()),
                    raw: false,
                },
            ],
            ..From::default()
        });
        let (sql, _) = stmt.build();
        assert_eq!(sql, "FROM `users`,`profiles` AS `p`");
    }

    #[test]
    fn test_from_join_on() {
        let mut stmt = TestStatement::new();
        stmt.add(From {
            joins: vec![Join {
                join_type: Some(JoinType::Left),
                table: Table::new("profile"),
                on: Where {
                    exprs: vec![eq(
                        Column {
                            table: Some("profile".to_owned()),
                            name: "user_id".to_owned(),
                            ..Column::default()
                        },
                        10,
                    )],
                },
                ..Join::default()
            }],
            ..From::default()
        });
        let (sql, vars) = stmt.build();
        assert_eq!(sql, "FROM `user` LEFT JOIN `profile` ON `profile`.`user_id` = ?");
        assert_eq!(vars, vec![Value::Int(10)]);
    }

    #[test]
    fn test_from_join_using() {
        let mut stmt = TestStatement::new();
        stmt.add(From {
            joins: vec![Join {
                table: Table::new("profile"),
                using: vec!["user_id".to_owned()],
                ..Join::default()
            }],
            ..From::default()
        });
        let (sql, _) = stmt.build();
        assert_eq!(sql, "FROM `user` JOIN `profile` USING (`user_id`)");
    }

    #[test]
    fn test_from_raw_join_expression() {
        let mut stmt = TestStatement::new();
        stmt.add(From {
            joins: vec![Join {
                expression: Some(crate::Expression::Raw(expr(
                    "left join profile on profile.user_id = user.id and profile.id = ?",
                    vec![2.into()],
                ))),
                ..Join::default()
            }],
            ..From::default()
        });
        let (sql, vars) = stmt.build();
        assert_eq!(
            sql,
            "FROM `user` left join profile on profile.user_id = user.id and profile.id = ?"
        );
        assert_eq!(vars, vec![Value::Int(2)]);
    }

    #[test]
    fn test_from_merge_prepends_previous() {
        let mut stmt = TestStatement::new();
        stmt.add(From {
            tables: vec![Table::new("a")],
            ..From::default()
        })
        .add(From {
            tables: vec![Table::new("b")],
            ..From::default()
        });
        let (sql, _) = stmt.build();
        assert_eq!(sql, "FROM `a`,`b`");
    }
}
