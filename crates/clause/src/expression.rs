// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Expression nodes
//!
//! The render tree for statement bodies: raw SQL fragments with `?` markers,
//! column comparisons with negation duals, `IN` lists, boolean composites,
//! and the per-clause bodies themselves.

use crate::delete::Delete;
use crate::from::From;
use crate::group_by::GroupBy;
use crate::insert::{Insert, Values};
use crate::limit::Limit;
use crate::lock::For;
use crate::on_conflict::OnConflict;
use crate::order_by::OrderBy;
use crate::returning::Returning;
use crate::select::Select;
use crate::update::{Set, Update};
use crate::value::{Value, Var};
use crate::where_clause::Where;
use crate::{Builder, Column};

/// Raw SQL fragment. Each `?` binds the next var; a `?` directly following
/// `(` whose var is a sequence expands to a comma-separated placeholder list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Expr {
    pub sql: String,
    pub vars: Vec<Var>,
}

impl Expr {
    pub fn build(&self, builder: &mut dyn Builder) {
        let mut idx = 0;
        let mut has_brackets = false;
        for c in self.sql.chars() {
            if c == '?' {
                match self.vars.get(idx) {
                    Some(Var::List(items)) if has_brackets => {
                        for (i, item) in items.iter().enumerate() {
                            if i > 0 {
                                builder.write_byte(',');
                            }
                            builder.add_var(item);
                        }
                    }
                    Some(var) => builder.add_var(var),
                    // More markers than vars: leave the marker in place.
                    None => builder.write_byte('?'),
                }
                idx += 1;
            } else {
                has_brackets = c == '(';
                builder.write_byte(c);
            }
        }
    }
}

/// Build a raw fragment expression.
pub fn expr(sql: impl Into<String>, vars: Vec<Var>) -> Expr {
    Expr {
        sql: sql.into(),
        vars,
    }
}

/// A column/value pair shared by all comparison operators.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub column: Column,
    pub value: Var,
}

/// `IN` over an ordered sequence. Empty renders `IN (NULL)`, a single value
/// collapses to `= ?`, more become `IN (?,…,?)`.
#[derive(Debug, Clone, PartialEq)]
pub struct In {
    pub column: Column,
    pub values: Vec<Var>,
}

impl In {
    pub fn build(&self, builder: &mut dyn Builder) {
        builder.write_quoted(crate::Quoted::Column(&self.column));
        match self.values.len() {
            0 => builder.write_str(" IN (NULL)"),
            1 => {
                builder.write_str(" = ");
                builder.add_vars(&self.values);
            }
            _ => {
                builder.write_str(" IN (");
                builder.add_vars(&self.values);
                builder.write_byte(')');
            }
        }
    }

    pub fn negation_build(&self, builder: &mut dyn Builder) {
        match self.values.len() {
            0 => {}
            1 => {
                builder.write_quoted(crate::Quoted::Column(&self.column));
                builder.write_str(" <> ");
                builder.add_vars(&self.values);
            }
            _ => {
                builder.write_quoted(crate::Quoted::Column(&self.column));
                builder.write_str(" NOT IN (");
                builder.add_vars(&self.values);
                builder.write_byte(')');
            }
        }
    }
}

/// The composable expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Raw(Expr),
    Eq(Comparison),
    Neq(Comparison),
    Gt(Comparison),
    Gte(Comparison),
    Lt(Comparison),
    Lte(Comparison),
    Like(Comparison),
    In(In),
    And(Vec<Expression>),
    Or(Vec<Expression>),
    Not(Vec<Expression>),
    Select(Select),
    From(From),
    Where(Where),
    GroupBy(GroupBy),
    OrderBy(OrderBy),
    Limit(Limit),
    For(For),
    Insert(Insert),
    Values(Values),
    Update(Update),
    Set(Set),
    Delete(Delete),
    OnConflict(OnConflict),
    Returning(Returning),
}

impl Expression {
    pub fn build(&self, builder: &mut dyn Builder) {
        match self {
            Expression::Raw(e) => e.build(builder),
            Expression::Eq(c) => eq_build(c, builder),
            Expression::Neq(c) => neq_build(c, builder),
            Expression::Gt(c) => op_build(c, " > ", builder),
            Expression::Gte(c) => op_build(c, " >= ", builder),
            Expression::Lt(c) => op_build(c, " < ", builder),
            Expression::Lte(c) => op_build(c, " <= ", builder),
            Expression::Like(c) => op_build(c, " LIKE ", builder),
            Expression::In(i) => i.build(builder),
            Expression::And(exprs) => composite_build(exprs, " AND ", builder),
            Expression::Or(exprs) => composite_build(exprs, " OR ", builder),
            Expression::Not(exprs) => not_build(exprs, builder),
            Expression::Select(c) => c.build(builder),
            Expression::From(c) => c.build(builder),
            Expression::Where(c) => c.build(builder),
            Expression::GroupBy(c) => c.build(builder),
            Expression::OrderBy(c) => c.build(builder),
            Expression::Limit(c) => c.build(builder),
            Expression::For(c) => c.build(builder),
            Expression::Insert(c) => c.build(builder),
            Expression::Values(c) => c.build(builder),
            Expression::Update(c) => c.build(builder),
            Expression::Set(c) => c.build(builder),
            Expression::Delete(c) => c.build(builder),
            Expression::OnConflict(c) => c.build(builder),
            Expression::Returning(c) => c.build(builder),
        }
    }

    /// Render the negated form when the node has a dual (comparisons, `IN`).
    /// Returns `false` when the node has no negation build.
    pub fn negation_build(&self, builder: &mut dyn Builder) -> bool {
        match self {
            Expression::Eq(c) => neq_build(c, builder),
            Expression::Neq(c) => eq_build(c, builder),
            Expression::Gt(c) => op_build(c, " <= ", builder),
            Expression::Gte(c) => op_build(c, " < ", builder),
            Expression::Lt(c) => op_build(c, " >= ", builder),
            Expression::Lte(c) => op_build(c, " > ", builder),
            Expression::Like(c) => op_build(c, " NOT LIKE ", builder),
            Expression::In(i) => i.negation_build(builder),
            _ => return false,
        }
        true
    }
}

fn eq_build(c: &Comparison, builder: &mut dyn Builder) {
    builder.write_quoted(crate::Quoted::Column(&c.column));
    match &c.value {
        Var::Value(Value::Null) => builder.write_str(" IS NULL"),
        Var::List(_) => {
            builder.write_str(" IN ");
            builder.add_var(&c.value);
        }
        _ => {
            builder.write_str(" = ");
            builder.add_var(&c.value);
        }
    }
}

fn neq_build(c: &Comparison, builder: &mut dyn Builder) {
    builder.write_quoted(crate::Quoted::Column(&c.column));
    match &c.value {
        Var::Value(Value::Null) => builder.write_str(" IS NOT NULL"),
        Var::List(_) => {
            builder.write_str(" NOT IN ");
            builder.add_var(&c.value);
        }
        _ => {
            builder.write_str(" <> ");
            builder.add_var(&c.value);
        }
    }
}

fn op_build(c: &Comparison, op: &str, builder: &mut dyn Builder) {
    builder.write_quoted(crate::Quoted::Column(&c.column));
    builder.write_str(op);
    builder.add_var(&c.value);
}

/// Composites wrap in parentheses iff they hold more than one child.
fn composite_build(exprs: &[Expression], op: &str, builder: &mut dyn Builder) {
    if exprs.len() > 1 {
        builder.write_byte('(');
    }
    for (idx, expr) in exprs.iter().enumerate() {
        if idx > 0 {
            builder.write_str(op);
        }
        expr.build(builder);
    }
    if exprs.len() > 1 {
        builder.write_byte(')');
    }
}

fn not_build(exprs: &[Expression], builder: &mut dyn Builder) {
    if exprs.len() > 1 {
        builder.write_byte('(');
    }
    for (idx, expr) in exprs.iter().enumerate() {
        if idx > 0 {
            builder.write_str(" AND ");
        }
        if !expr.negation_build(builder) {
            builder.write_str(" NOT ");
            expr.build(builder);
        }
    }
    if exprs.len() > 1 {
        builder.write_byte(')');
    }
}

/// `column = value` (NULL-aware, sequence-aware).
pub fn eq(column: impl Into<Column>, value: impl Into<Var>) -> Expression {
    Expression::Eq(Comparison {
        column: column.into(),
        value: value.into(),
    })
}

/// `column <> value` (NULL-aware, sequence-aware).
pub fn neq(column: impl Into<Column>, value: impl Into<Var>) -> Expression {
    Expression::Neq(Comparison {
        column: column.into(),
        value: value.into(),
    })
}

/// `column > value`.
pub fn gt(column: impl Into<Column>, value: impl Into<Var>) -> Expression {
    Expression::Gt(Comparison {
        column: column.into(),
        value: value.into(),
    })
}

/// `column >= value`.
pub fn gte(column: impl Into<Column>, value: impl Into<Var>) -> Expression {
    Expression::Gte(Comparison {
        column: column.into(),
        value: value.into(),
    })
}

/// `column < value`.
pub fn lt(column: impl Into<Column>, value: impl Into<Var>) -> Expression {
    Expression::Lt(Comparison {
        column: column.into(),
        value: value.into(),
    })
}

/// `column <= value`.
pub fn lte(column: impl Into<Column>, value: impl Into<Var>) -> Expression {
    Expression::Lte(Comparison {
        column: column.into(),
        value: value.into(),
    })
}

/// `column LIKE value`.
pub fn like(column: impl Into<Column>, value: impl Into<Var>) -> Expression {
    Expression::Like(Comparison {
        column: column.into(),
        value: value.into(),
    })
}

/// `column IN (values…)`.
pub fn in_values<T: Into<Var>>(column: impl Into<Column>, values: Vec<T>) -> Expression {
    Expression::In(In {
        column: column.into(),
        values: values.into_iter().map(Into::into).collect(),
    })
}
