// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! ON CONFLICT clause body (upserts).

use std::collections::HashMap;

use crate::expression::Expression;
use crate::update::Assignment;
use crate::value::Value;
use crate::where_clause::Where;
use crate::{Builder, Clause, ClauseItem, ClauseName, Column, Quoted};

/// `ON CONFLICT [ (cols…) ][ WHERE … ] ( DO NOTHING | DO UPDATE SET a=?,… )`.
/// Writes its own keyword; the slot keyword is suppressed on merge.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OnConflict {
    pub columns: Vec<Column>,
    pub r#where: Where,
    pub do_nothing: bool,
    pub do_updates: Vec<Assignment>,
}

impl OnConflict {
    pub fn build(&self, builder: &mut dyn Builder) {
        builder.write_str("ON CONFLICT");

        if !self.columns.is_empty() {
            builder.write_str(" (");
            for (idx, column) in self.columns.iter().enumerate() {
                if idx > 0 {
                    builder.write_byte(',');
                }
                builder.write_quoted(Quoted::Column(column));
            }
            builder.write_byte(')');
        }

        if !self.r#where.exprs.is_empty() {
            builder.write_str(" WHERE ");
            self.r#where.build(builder);
        }

        if self.do_nothing {
            builder.write_str(" DO NOTHING");
        } else if !self.do_updates.is_empty() {
            builder.write_str(" DO UPDATE SET ");
            for (idx, assignment) in self.do_updates.iter().enumerate() {
                if idx > 0 {
                    builder.write_byte(',');
                }
                builder.write_quoted(Quoted::Column(&assignment.column));
                builder.write_byte('=');
                builder.add_var(&assignment.value);
            }
        }
    }
}

impl ClauseItem for OnConflict {
    fn name(&self) -> ClauseName {
        ClauseName::OnConflict
    }

    fn merge_into(self, clause: &mut Clause) {
        clause.name = None;
        clause.expression = Some(Expression::OnConflict(self));
    }
}

/// Build an update list from a mapping, in ascending key order so the
/// emitted SQL is deterministic.
pub fn assignments(values: HashMap<String, Value>) -> Vec<Assignment> {
    let mut keys: Vec<&String> = values.keys().collect();
    keys.sort();
    keys.into_iter()
        .map(|key| Assignment {
            column: Column::new(key.clone()),
            value: values[key].clone().into(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::eq;
    use crate::insert::{Insert, Values};
    use crate::test_support::TestStatement;
    use crate::value::Var;

    #[test]
    fn test_on_conflict_do_update() {
        let mut stmt = TestStatement::new();
        stmt.add(Insert::default())
            .add(Values {
                columns: vec![Column::new("name"), Column::new("age")],
                values: vec![vec![Var::from("bin"), Var::from(18)]],
            })
            .add(OnConflict {
                columns: vec![Column::new("name")],
                r#where: Where {
                    exprs: vec![eq("id", 1)],
                },
                do_updates: assignments(HashMap::from([(
                    "name".to_owned(),
                    Value::from("upsert-name"),
                )])),
                ..OnConflict::default()
            });
        let (sql, vars) = stmt.build();
        assert_eq!(
            sql,
            "INSERT INTO `user` (`name`,`age`) VALUES (?,?) ON CONFLICT (`name`) WHERE `id` = ? DO UPDATE SET `name`=?"
        );
        assert_eq!(
            vars,
            vec![
                Value::from("bin"),
                Value::Int(18),
                Value::Int(1),
                Value::from("upsert-name")
            ]
        );
    }

    #[test]
    fn test_on_conflict_do_nothing() {
        let mut stmt = TestStatement::new();
        stmt.add(Insert::default())
            .add(Values {
                columns: vec![Column::new("name"), Column::new("age")],
                values: vec![vec![Var::from("bin"), Var::from(18)]],
            })
            .add(OnConflict {
                do_nothing: true,
                ..OnConflict::default()
            });
        let (sql, vars) = stmt.build();
        assert_eq!(
            sql,
            "INSERT INTO `user` (`name`,`age`) VALUES (?,?) ON CONFLICT DO NOTHING"
        );
        assert_eq!(vars, vec![Value::from("bin"), Value::Int(18)]);
    }
}
