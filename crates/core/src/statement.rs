// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Statement assembly
//!
//! The [`Statement`] aggregates clause contributions, then walks a fixed
//! lexical order writing the SQL buffer and the bind vector. It implements
//! the clause layer's `Writer`/`Builder` capabilities, delegating identifier
//! quoting and placeholder rendering to the active dialect.
//!
//! Clauses omitted from the order list contribute neither bytes nor binds.

use std::collections::HashMap;
use std::sync::Arc;

use sqlgate_clause::{
    Builder, CURRENT_TABLE, Clause, ClauseItem, ClauseName, Column, Quoted, Table, Value, Var,
    Writer,
};
use sqlgate_dialect::Dialect;

use crate::params::Param;

pub struct Statement {
    pub dialect: Arc<dyn Dialect>,
    pub tables: Vec<Table>,
    pub clauses: HashMap<ClauseName, Clause>,
    pub sql: String,
    pub sql_vars: Vec<Param>,
    pub named_vars: Vec<(String, Value)>,
    /// Literal prefix (e.g. a database-middleware directive) written before
    /// any clause.
    pub hint: String,
}

impl Statement {
    pub fn new(dialect: Arc<dyn Dialect>, tables: Vec<Table>) -> Self {
        Statement {
            dialect,
            tables,
            clauses: HashMap::new(),
            sql: String::new(),
            sql_vars: Vec::new(),
            named_vars: Vec::new(),
            hint: String::new(),
        }
    }

    /// Merge a contribution into its named slot, installing a fresh slot on
    /// first contact.
    pub fn add_clause<C: ClauseItem>(&mut self, item: C) {
        let name = item.name();
        let clause = self
            .clauses
            .entry(name)
            .or_insert_with(|| Clause::new(name));
        item.merge_into(clause);
    }

    pub fn add_clause_if_not_exists<C: ClauseItem>(&mut self, item: C) {
        if !self.clauses.contains_key(&item.name()) {
            self.add_clause(item);
        }
    }

    pub fn has_clause(&self, name: ClauseName) -> bool {
        self.clauses.contains_key(&name)
    }

    /// Emit the hint prefix, then each present clause in the requested
    /// order, space-separated.
    pub fn build(&mut self, order: &[ClauseName]) {
        if !self.hint.is_empty() {
            let Statement { sql, hint, .. } = self;
            sql.push_str(hint);
        }

        let mut first_written = false;
        for name in order {
            let Some(clause) = self.clauses.get(name).cloned() else {
                continue;
            };
            if first_written {
                self.sql.push(' ');
            }
            first_written = true;
            clause.build(self);
        }
    }

    /// Quote into a fresh string (diagnostics, subqueries).
    pub fn quote(&self, target: Quoted<'_>) -> String {
        let mut out = String::new();
        quote_into(self.dialect.as_ref(), &self.tables, &mut out, target);
        out
    }

    /// Reset for reuse after a terminal operation.
    pub fn re_init(&mut self) {
        self.tables.clear();
        self.sql.clear();
        self.sql_vars.clear();
        self.named_vars.clear();
        self.hint.clear();
        self.clauses.clear();
    }
}

impl Writer for Statement {
    fn write_byte(&mut self, c: char) {
        self.sql.push(c);
    }

    fn write_str(&mut self, s: &str) {
        self.sql.push_str(s);
    }
}

impl Builder for Statement {
    fn write_quoted(&mut self, target: Quoted<'_>) {
        let Statement {
            dialect,
            tables,
            sql,
            ..
        } = self;
        quote_into(dialect.as_ref(), tables, sql, target);
    }

    fn add_vars(&mut self, vars: &[Var]) {
        let Statement {
            dialect,
            tables,
            sql,
            sql_vars,
            named_vars,
            ..
        } = self;
        add_vars_into(dialect.as_ref(), tables, sql, sql_vars, named_vars, vars);
    }
}

fn quote_ident(dialect: &dyn Dialect, tables: &[Table], writer: &mut dyn Writer, ident: &str) {
    if ident == CURRENT_TABLE {
        match tables.first() {
            Some(table) => dialect.quote_to(writer, &table.name),
            None => dialect.quote_to(writer, ident),
        }
    } else {
        dialect.quote_to(writer, ident);
    }
}

fn quote_table(dialect: &dyn Dialect, tables: &[Table], writer: &mut dyn Writer, table: &Table) {
    if table.raw {
        writer.write_str(&table.name);
    } else {
        quote_ident(dialect, tables, writer, &table.name);
    }
    if let Some(alias) = &table.alias {
        writer.write_str(" AS ");
        dialect.quote_to(writer, alias);
    }
}

fn quote_column(dialect: &dyn Dialect, tables: &[Table], writer: &mut dyn Writer, column: &Column) {
    if let Some(table) = &column.table {
        quote_ident(dialect, tables, writer, table);
        writer.write_byte('.');
    }

    if column.raw {
        writer.write_str(&column.name);
    } else {
        dialect.quote_to(writer, &column.name);
    }

    if let Some(alias) = &column.alias {
        writer.write_str(" AS ");
        dialect.quote_to(writer, alias);
    }
}

fn quote_into(dialect: &dyn Dialect, tables: &[Table], writer: &mut dyn Writer, target: Quoted<'_>) {
    match target {
        Quoted::Table(table) => quote_table(dialect, tables, writer, table),
        Quoted::Column(column) => quote_column(dialect, tables, writer, column),
        Quoted::Ident(ident) => quote_ident(dialect, tables, writer, ident),
        Quoted::IdentList(idents) => {
            writer.write_byte('(');
            for (idx, ident) in idents.iter().enumerate() {
                if idx > 0 {
                    writer.write_byte(',');
                }
                dialect.quote_to(writer, ident);
            }
            writer.write_byte(')');
        }
    }
}

fn add_vars_into(
    dialect: &dyn Dialect,
    tables: &[Table],
    sql: &mut String,
    sql_vars: &mut Vec<Param>,
    named_vars: &mut Vec<(String, Value)>,
    vars: &[Var],
) {
    for (idx, var) in vars.iter().enumerate() {
        if idx > 0 {
            sql.push(',');
        }

        match var {
            Var::Named { name, value } if !name.is_empty() => {
                named_vars.push((name.clone(), value.clone()));
                sql.push('@');
                sql.push_str(name);
            }
            Var::Named { value, .. } => {
                sql_vars.push(Param::Value(value.clone()));
                dialect.bind_var_to(sql, sql_vars.len(), value);
            }
            Var::Column(column) => quote_column(dialect, tables, sql, column),
            Var::Table(table) => quote_table(dialect, tables, sql, table),
            Var::Raw(expr) => {
                sql.push_str(&expr.sql);
                for var in &expr.vars {
                    push_raw_var(sql_vars, var);
                }
            }
            Var::List(items) => {
                if items.is_empty() {
                    sql.push_str("(NULL)");
                } else {
                    sql.push('(');
                    add_vars_into(dialect, tables, sql, sql_vars, named_vars, items);
                    sql.push(')');
                }
            }
            Var::Value(value) => {
                sql_vars.push(Param::Value(value.clone()));
                dialect.bind_var_to(sql, sql_vars.len(), value);
            }
        }
    }
}

/// A raw fragment's vars bypass placeholder rendering; sequences stay whole
/// so the execution wrapper can expand them against the fragment's own `?`.
fn push_raw_var(sql_vars: &mut Vec<Param>, var: &Var) {
    match var {
        Var::Value(value) => sql_vars.push(Param::Value(value.clone())),
        Var::Named { value, .. } => sql_vars.push(Param::Value(value.clone())),
        Var::List(items) => {
            let mut flat = Vec::with_capacity(items.len());
            flatten_values(items, &mut flat);
            sql_vars.push(Param::List(flat));
        }
        Var::Raw(expr) => {
            for nested in &expr.vars {
                push_raw_var(sql_vars, nested);
            }
        }
        Var::Column(_) | Var::Table(_) => {}
    }
}

fn flatten_values(items: &[Var], out: &mut Vec<Value>) {
    for item in items {
        match item {
            Var::Value(value) => out.push(value.clone()),
            Var::Named { value, .. } => out.push(value.clone()),
            Var::List(nested) => flatten_values(nested, out),
            Var::Raw(_) | Var::Column(_) | Var::Table(_) => {}
        }
    }
}
