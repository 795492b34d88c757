// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! In-crate stand-in for the statement builder: backtick quoting, `?`
//! placeholders, a `user` table as the current table. Lets the clause tests
//! assert emitted SQL and bind order without the core crate.

use std::collections::HashMap;

use crate::value::{Value, Var};
use crate::{Builder, Clause, ClauseItem, ClauseName, Column, Expression, Quoted, Table, Writer};

pub(crate) struct TestBuilder {
    pub sql: String,
    pub vars: Vec<Value>,
    pub tables: Vec<Table>,
}

impl TestBuilder {
    pub fn new() -> Self {
        TestBuilder {
            sql: String::new(),
            vars: Vec::new(),
            tables: vec![Table::new("user")],
        }
    }

    fn quote_ident(&mut self, ident: &str) {
        self.sql.push('`');
        self.sql.push_str(ident);
        self.sql.push('`');
    }

    fn quote_table(&mut self, table: &Table) {
        if table.raw {
            self.sql.push_str(&table.name);
        } else if table.name == crate::CURRENT_TABLE {
            let name = self.tables[0].name.clone();
            self.quote_ident(&name);
        } else {
            self.quote_ident(&table.name);
        }
        if let Some(alias) = &table.alias {
            self.sql.push_str(" AS ");
            self.quote_ident(alias);
        }
    }

    fn quote_column(&mut self, column: &Column) {
        if let Some(table) = &column.table {
            if table == crate::CURRENT_TABLE {
                let name = self.tables[0].name.clone();
                self.quote_ident(&name);
            } else {
                self.quote_ident(table);
            }
            self.sql.push('.');
        }
        if column.raw {
            self.sql.push_str(&column.name);
        } else {
            self.quote_ident(&column.name);
        }
        if let Some(alias) = &column.alias {
            self.sql.push_str(" AS ");
            self.quote_ident(alias);
        }
    }
}

impl Writer for TestBuilder {
    fn write_byte(&mut self, c: char) {
        self.sql.push(c);
    }

    fn write_str(&mut self, s: &str) {
        self.sql.push_str(s);
    }
}

impl Builder for TestBuilder {
    fn write_quoted(&mut self, target: Quoted<'_>) {
        match target {
            Quoted::Table(t) => self.quote_table(t),
            Quoted::Column(c) => self.quote_column(c),
            Quoted::Ident(s) => self.quote_ident(s),
            Quoted::IdentList(idents) => {
                self.sql.push('(');
                for (idx, ident) in idents.iter().enumerate() {
                    if idx > 0 {
                        self.sql.push(',');
                    }
                    let ident = ident.clone();
                    self.quote_ident(&ident);
                }
                self.sql.push(')');
            }
        }
    }

    fn add_vars(&mut self, vars: &[Var]) {
        for (idx, var) in vars.iter().enumerate() {
            if idx > 0 {
                self.sql.push(',');
            }
            match var {
                Var::Named { name, .. } if !name.is_empty() => {
                    self.sql.push('@');
                    self.sql.push_str(name);
                }
                Var::Named { value, .. } => {
                    self.vars.push(value.clone());
                    self.sql.push('?');
                }
                Var::Column(c) => {
                    let c = c.clone();
                    self.quote_column(&c);
                }
                Var::Table(t) => {
                    let t = t.clone();
                    self.quote_table(&t);
                }
                Var::Raw(e) => {
                    self.sql.push_str(&e.sql);
                    for v in &e.vars {
                        if let Var::Value(v) = v {
                            self.vars.push(v.clone());
                        }
                    }
                }
                Var::List(items) => {
                    if items.is_empty() {
                        self.sql.push_str("(NULL)");
                    } else {
                        self.sql.push('(');
                        self.add_vars(items);
                        self.sql.push(')');
                    }
                }
                Var::Value(v) => {
                    self.vars.push(v.clone());
                    self.sql.push('?');
                }
            }
        }
    }
}

/// Render a single expression; returns the SQL text and flattened binds.
pub(crate) fn build_expression(expr: Expression) -> (String, Vec<Value>) {
    let mut builder = TestBuilder::new();
    expr.build(&mut builder);
    (builder.sql, builder.vars)
}

/// Miniature statement: clause slots merged through [`ClauseItem`] and
/// emitted in first-contribution order, mirroring the core statement's
/// accumulation contract.
pub(crate) struct TestStatement {
    clauses: HashMap<ClauseName, Clause>,
    order: Vec<ClauseName>,
    builder: TestBuilder,
}

impl TestStatement {
    pub fn new() -> Self {
        TestStatement {
            clauses: HashMap::new(),
            order: Vec::new(),
            builder: TestBuilder::new(),
        }
    }

    pub fn add<C: ClauseItem>(&mut self, item: C) -> &mut Self {
        let name = item.name();
        if !self.clauses.contains_key(&name) {
            self.order.push(name);
            self.clauses.insert(name, Clause::new(name));
        }
        item.merge_into(self.clauses.get_mut(&name).expect("slot just inserted"));
        self
    }

    pub fn build(mut self) -> (String, Vec<Value>) {
        let mut first = true;
        for name in &self.order {
            let clause = self.clauses[name].clone();
            if !first {
                self.builder.write_byte(' ');
            }
            first = false;
            clause.build(&mut self.builder);
        }
        (self.builder.sql.trim().to_owned(), self.builder.vars)
    }
}
