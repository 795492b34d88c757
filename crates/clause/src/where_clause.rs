// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # WHERE clause body
//!
//! A `Where` holds an ordered expression list. Callers express "join with
//! OR" by wrapping a single expression in an `Or` composite; a multi-child
//! `Or` stays a parenthesised group. Before emission the first expression
//! that is *not* a singleton-OR swaps into position 0 so the rendered clause
//! never starts with an operator, then positions after the first join with
//! ` OR ` (singleton-OR) or ` AND ` (everything else).

use crate::expression::Expression;
use crate::{Builder, Clause, ClauseItem, ClauseName};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Where {
    pub exprs: Vec<Expression>,
}

fn is_singleton_or(expr: &Expression) -> bool {
    matches!(expr, Expression::Or(exprs) if exprs.len() == 1)
}

impl Where {
    pub fn build(&self, builder: &mut dyn Builder) {
        let mut order: Vec<&Expression> = self.exprs.iter().collect();
        if let Some(pos) = order.iter().position(|e| !is_singleton_or(e)) {
            order.swap(0, pos);
        }

        for (idx, expr) in order.iter().enumerate() {
            if idx > 0 {
                if is_singleton_or(expr) {
                    builder.write_str(" OR ");
                } else {
                    builder.write_str(" AND ");
                }
            }
            expr.build(builder);
        }
    }
}

impl ClauseItem for Where {
    fn name(&self) -> ClauseName {
        ClauseName::Where
    }

    fn merge_into(mut self, clause: &mut Clause) {
        if let Some(Expression::Where(prev)) = clause.expression.take() {
            self.exprs = [prev.exprs, self.exprs].concat();
        }
        clause.expression = Some(Expression::Where(self));
    }
}

/// AND composite; parenthesised iff it holds more than one child.
pub fn and(exprs: Vec<Expression>) -> Expression {
    Expression::And(exprs)
}

/// OR composite; a single child marks "join with OR" at the WHERE level.
pub fn or(exprs: Vec<Expression>) -> Expression {
    Expression::Or(exprs)
}

/// NOT composite; children with a negation dual render through it.
pub fn not(exprs: Vec<Expression>) -> Expression {
    Expression::Not(exprs)
}
