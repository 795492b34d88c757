// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # sqlgate - Clause Layer
//!
//! This crate provides the clause and expression model used by the sqlgate
//! SQL builder. A statement is assembled from named [`Clause`] slots; each
//! slot accumulates contributions through a per-clause merge rule and renders
//! deterministically through a [`Builder`] capability.
//!
//! ## Architecture
//!
//! - [`ClauseName`]: the closed set of clause slots with their emit keywords
//! - [`Clause`]: one slot (surrounding expressions, keyword flag, main body)
//! - [`Expression`]: the composable render tree (raw fragments, comparisons,
//!   boolean composites, clause bodies)
//! - [`Writer`] / [`Builder`]: the narrow capabilities expressions write
//!   through; the statement type in the core crate implements both, which
//!   keeps the clause tree independent of dialects and bind bookkeeping
//!
//! ## Bind model
//!
//! [`Value`] is the driver-level scalar; [`Var`] layers named arguments,
//! identifier references, raw fragments, and ordered sequences on top. A
//! sequence written as a bind expands to a parenthesised placeholder list,
//! or to `(NULL)` when empty.

pub mod delete;
pub mod expression;
pub mod from;
pub mod group_by;
pub mod insert;
pub mod limit;
pub mod lock;
pub mod on_conflict;
pub mod order_by;
pub mod returning;
pub mod select;
pub mod update;
pub mod value;
pub mod where_clause;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports
pub use delete::Delete;
pub use expression::{
    Comparison, Expr, Expression, In, eq, expr, gt, gte, in_values, like, lt, lte, neq,
};
pub use from::{From, Join, JoinType};
pub use group_by::GroupBy;
pub use insert::{Insert, Values};
pub use limit::Limit;
pub use lock::{For, Lock};
pub use on_conflict::{OnConflict, assignments};
pub use order_by::{OrderBy, OrderByColumn};
pub use returning::Returning;
pub use select::Select;
pub use update::{Assignment, Set, Update};
pub use value::{Value, Var};
pub use where_clause::{Where, and, not, or};

/// Sentinel table name resolving to the statement's first declared table at
/// render time.
pub const CURRENT_TABLE: &str = "@@@table@@@";

/// The closed set of clause slots.
///
/// Each variant doubles as the lookup key in the statement's clause map and,
/// via [`ClauseName::as_str`], as the keyword token emitted ahead of the
/// clause body (unless the merge rule suppressed it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseName {
    Select,
    From,
    Where,
    GroupBy,
    OrderBy,
    Limit,
    For,
    Insert,
    Values,
    Update,
    Set,
    Delete,
    OnConflict,
    Returning,
    Hint,
}

impl ClauseName {
    /// The keyword token written when the clause still owns its keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClauseName::Select => "SELECT",
            ClauseName::From => "FROM",
            ClauseName::Where => "WHERE",
            ClauseName::GroupBy => "GROUP BY",
            ClauseName::OrderBy => "ORDER BY",
            ClauseName::Limit => "LIMIT",
            ClauseName::For => "FOR",
            ClauseName::Insert => "INSERT",
            ClauseName::Values => "VALUES",
            ClauseName::Update => "UPDATE",
            ClauseName::Set => "SET",
            ClauseName::Delete => "DELETE",
            ClauseName::OnConflict => "ON_CONFLICT",
            ClauseName::Returning => "RETURNING",
            ClauseName::Hint => "HINT",
        }
    }
}

impl std::fmt::Display for ClauseName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A table reference. With `raw` set the name is emitted verbatim; otherwise
/// the dialect quotes it. The alias renders as ` AS <quoted-alias>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub name: String,
    pub alias: Option<String>,
    pub raw: bool,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Table {
            name: name.into(),
            alias: None,
            raw: false,
        }
    }
}

impl std::convert::From<&str> for Table {
    fn from(name: &str) -> Self {
        Table::new(name)
    }
}

/// The sentinel table; resolves to the statement's first table when quoted.
pub fn current_table() -> Table {
    Table::new(CURRENT_TABLE)
}

/// A column reference, optionally table-qualified and aliased.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Column {
    pub table: Option<String>,
    pub name: String,
    pub alias: Option<String>,
    pub raw: bool,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Column {
            table: None,
            name: name.into(),
            alias: None,
            raw: false,
        }
    }
}

impl std::convert::From<&str> for Column {
    fn from(name: &str) -> Self {
        Column::new(name)
    }
}

impl std::convert::From<String> for Column {
    fn from(name: String) -> Self {
        Column::new(name)
    }
}

/// Something that can receive raw SQL bytes.
pub trait Writer {
    fn write_byte(&mut self, c: char);
    fn write_str(&mut self, s: &str);
}

impl Writer for String {
    fn write_byte(&mut self, c: char) {
        self.push(c);
    }

    fn write_str(&mut self, s: &str) {
        self.push_str(s);
    }
}

/// Identifier shapes accepted by [`Builder::write_quoted`].
#[derive(Debug, Clone, Copy)]
pub enum Quoted<'a> {
    Table(&'a Table),
    Column(&'a Column),
    Ident(&'a str),
    /// Parenthesised comma-separated identifier list (`USING (a,b)`).
    IdentList(&'a [String]),
}

/// The capability expressions render through: raw bytes, quoted identifiers,
/// and placeholder emission with bind bookkeeping.
///
/// Bind values are appended in emission order; their 1-based positional index
/// is what the dialect receives for placeholder rendering.
pub trait Builder: Writer {
    fn write_quoted(&mut self, target: Quoted<'_>);

    /// Write one or more vars, comma-separated, appending binds as needed.
    fn add_vars(&mut self, vars: &[Var]);

    fn add_var(&mut self, var: &Var) {
        self.add_vars(std::slice::from_ref(var));
    }
}

/// Full takeover of a clause slot's rendering.
pub trait ClauseBuilder: Send + Sync {
    fn build(&self, clause: &Clause, builder: &mut dyn Builder);
}

/// One clause slot in a statement.
#[derive(Clone, Default)]
pub struct Clause {
    pub name: Option<ClauseName>,
    pub priority: f64,
    pub before_exprs: Vec<Expression>,
    pub after_name_exprs: Vec<Expression>,
    pub after_exprs: Vec<Expression>,
    pub expression: Option<Expression>,
    pub builder: Option<std::sync::Arc<dyn ClauseBuilder>>,
}

impl Clause {
    pub fn new(name: ClauseName) -> Self {
        Clause {
            name: Some(name),
            ..Clause::default()
        }
    }

    /// Render the slot: surrounding expressions, the keyword (when still
    /// owned), then the main expression, all space-separated. A custom
    /// builder takes over fully.
    pub fn build(&self, builder: &mut dyn Builder) {
        if let Some(custom) = &self.builder {
            custom.build(self, builder);
            return;
        }

        let mut wrote = false;
        for expr in &self.before_exprs {
            if wrote {
                builder.write_byte(' ');
            }
            wrote = true;
            expr.build(builder);
        }
        if let Some(name) = self.name {
            if wrote {
                builder.write_byte(' ');
            }
            wrote = true;
            builder.write_str(name.as_str());
        }
        for expr in &self.after_name_exprs {
            if wrote {
                builder.write_byte(' ');
            }
            wrote = true;
            expr.build(builder);
        }
        if let Some(expr) = &self.expression {
            if wrote {
                builder.write_byte(' ');
            }
            wrote = true;
            expr.build(builder);
        }
        for expr in &self.after_exprs {
            if wrote {
                builder.write_byte(' ');
            }
            wrote = true;
            expr.build(builder);
        }
    }
}

/// A contribution to a named clause slot.
///
/// `merge_into` receives the current slot and may replace the main
/// expression, combine fields with the previous contribution, or clear
/// `name` so the keyword is not re-emitted.
pub trait ClauseItem {
    fn name(&self) -> ClauseName;
    fn merge_into(self, clause: &mut Clause);
}
