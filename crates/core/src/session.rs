// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Fluent sessions
//!
//! A [`Session`] is a short-lived builder bound to one logical query: chain
//! clause contributions, then finish with a terminal operation (`find`,
//! `first`, `count`, `create`, `update`, `delete`, …). Terminal operations
//! reset the statement afterwards so the session object is reusable.
//!
//! Builder-phase failures park the first error on the session; terminal
//! operations short-circuit and return it.
//!
//! ```rust,ignore
//! let users: Vec<AuthUser> = db
//!     .table("auth_user")
//!     .where_("age > ?", (18,))
//!     .or("is_superuser", (true,))
//!     .desc(&["id"])
//!     .limit(10)
//!     .find()
//!     .await?;
//! ```

use std::collections::HashMap;

use sqlx::any::AnyRow;

use sqlgate_clause::{
    Assignment, ClauseName, Column, Delete, Expression, From, GroupBy, Insert, Join, Limit,
    OnConflict, OrderBy, OrderByColumn, Returning, Select, Set, Table, Update, Value, Values, Var,
    Where, expr, not, or,
};

use crate::client::DbClient;
use crate::conditions::{build_condition, conditions_from_map};
use crate::error::{DbError, DbResult};
use crate::params::{IntoParams, Param};
use crate::row::{Row, ToRow, convert_create_values};
use crate::scan;
use crate::statement::Statement;
use crate::utils::{parse_column, parse_tables};

const QUERY_CLAUSES: &[ClauseName] = &[
    ClauseName::Hint,
    ClauseName::Select,
    ClauseName::From,
    ClauseName::Where,
    ClauseName::GroupBy,
    ClauseName::OrderBy,
    ClauseName::Limit,
    ClauseName::For,
];

const INSERT_CLAUSES: &[ClauseName] = &[
    ClauseName::Insert,
    ClauseName::Values,
    ClauseName::OnConflict,
    ClauseName::Returning,
];

const UPDATE_CLAUSES: &[ClauseName] = &[ClauseName::Update, ClauseName::Set, ClauseName::Where];

const DELETE_CLAUSES: &[ClauseName] = &[ClauseName::Delete, ClauseName::From, ClauseName::Where];

pub struct Session {
    db: DbClient,
    statement: Statement,
    error: Option<DbError>,
}

impl Session {
    pub(crate) fn new(db: DbClient, table: &str) -> Self {
        let tables = parse_tables(table);
        let statement = Statement::new(db.dialect(), tables);
        Session {
            db,
            statement,
            error: None,
        }
    }

    /// The accumulated statement (diagnostics, tests).
    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    /// The first builder-phase error, if any.
    pub fn error(&self) -> Option<&DbError> {
        self.error.as_ref()
    }

    fn add_error(&mut self, err: DbError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// Reset the statement for reuse; runs after every terminal operation.
    pub fn clear(&mut self) {
        self.statement.re_init();
    }

    // ---- clause contributions -------------------------------------------

    /// Select columns; each argument may hold a comma-separated list with
    /// optional `AS` aliases. Without columns the statement selects `*`.
    pub fn select(mut self, columns: &[&str]) -> Self {
        if columns.is_empty() {
            self.statement.add_clause(Select::default());
            return self;
        }

        let mut select = Select::default();
        for column in columns {
            for part in column.split(',') {
                select.columns.push(parse_column(part));
            }
        }
        self.statement.add_clause(select);
        self
    }

    /// A free-form select expression with `?` markers.
    pub fn select_expr(mut self, sql: &str, args: impl IntoParams) -> Self {
        self.statement.add_clause(Select {
            expressions: vec![Expression::Raw(expr(sql, params_to_vars(args.into_params())))],
            ..Select::default()
        });
        self
    }

    /// `SELECT DISTINCT` over the given columns.
    pub fn distinct(mut self, columns: &[&str]) -> Self {
        self.statement.add_clause(Select {
            distinct: true,
            ..Select::default()
        });
        self.select(columns)
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.statement.add_clause(Limit { limit, offset: 0 });
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.statement.add_clause(Limit { limit: 0, offset });
        self
    }

    pub fn group_by(mut self, name: &str) -> Self {
        self.statement.add_clause(GroupBy {
            columns: vec![Column::new(name)],
            ..GroupBy::default()
        });
        self
    }

    /// HAVING conditions, same input shapes as [`where_`](Session::where_).
    pub fn having(mut self, query: &str, args: impl IntoParams) -> Self {
        match build_condition(query, args.into_params()) {
            Ok(conditions) if !conditions.is_empty() => {
                self.statement.add_clause(GroupBy {
                    having: conditions,
                    ..GroupBy::default()
                });
            }
            Ok(_) => {}
            Err(err) => self.add_error(err),
        }
        self
    }

    /// HAVING from an already-built expression node.
    pub fn having_expr(mut self, expression: Expression) -> Self {
        self.statement.add_clause(GroupBy {
            having: vec![expression],
            ..GroupBy::default()
        });
        self
    }

    /// Free-form ordering term, emitted verbatim.
    pub fn order_by(mut self, order: &str) -> Self {
        self.statement.add_clause(OrderBy {
            columns: vec![OrderByColumn {
                column: Column {
                    name: order.to_owned(),
                    raw: true,
                    ..Column::default()
                },
                desc: false,
            }],
        });
        self
    }

    /// Descending order on each column.
    pub fn desc(mut self, columns: &[&str]) -> Self {
        let mut order = OrderBy::default();
        for column in columns {
            order.columns.push(OrderByColumn {
                column: Column::new(*column),
                desc: true,
            });
        }
        self.statement.add_clause(order);
        self
    }

    /// Ascending order on each column.
    pub fn asc(mut self, columns: &[&str]) -> Self {
        let mut order = OrderBy::default();
        for column in columns {
            order.columns.push(OrderByColumn {
                column: Column::new(*column),
                desc: false,
            });
        }
        self.statement.add_clause(order);
        self
    }

    /// AND-join conditions: a raw fragment with `?`/`@name` markers, or a
    /// bare column name with exactly one argument.
    pub fn where_(mut self, query: &str, args: impl IntoParams) -> Self {
        match build_condition(query, args.into_params()) {
            Ok(conditions) if !conditions.is_empty() => {
                self.statement.add_clause(Where { exprs: conditions });
            }
            Ok(_) => {}
            Err(err) => self.add_error(err),
        }
        self
    }

    /// AND-join an already-built expression node.
    pub fn where_expr(mut self, expression: Expression) -> Self {
        self.statement.add_clause(Where {
            exprs: vec![expression],
        });
        self
    }

    /// One equality per mapping entry, AND-joined.
    pub fn where_map(mut self, mapping: HashMap<String, Value>) -> Self {
        let conditions = conditions_from_map(mapping);
        if !conditions.is_empty() {
            self.statement.add_clause(Where { exprs: conditions });
        }
        self
    }

    /// Negated conditions; comparisons render through their duals.
    pub fn not(mut self, query: &str, args: impl IntoParams) -> Self {
        match build_condition(query, args.into_params()) {
            Ok(conditions) if !conditions.is_empty() => {
                self.statement.add_clause(Where {
                    exprs: vec![not(conditions)],
                });
            }
            Ok(_) => {}
            Err(err) => self.add_error(err),
        }
        self
    }

    pub fn not_expr(mut self, expression: Expression) -> Self {
        self.statement.add_clause(Where {
            exprs: vec![not(vec![expression])],
        });
        self
    }

    pub fn not_map(mut self, mapping: HashMap<String, Value>) -> Self {
        let conditions = conditions_from_map(mapping);
        if !conditions.is_empty() {
            self.statement.add_clause(Where {
                exprs: vec![not(conditions)],
            });
        }
        self
    }

    /// OR-join conditions with what came before.
    pub fn or(mut self, query: &str, args: impl IntoParams) -> Self {
        match build_condition(query, args.into_params()) {
            Ok(conditions) if !conditions.is_empty() => {
                self.statement.add_clause(Where {
                    exprs: vec![or(conditions)],
                });
            }
            Ok(_) => {}
            Err(err) => self.add_error(err),
        }
        self
    }

    pub fn or_expr(mut self, expression: Expression) -> Self {
        self.statement.add_clause(Where {
            exprs: vec![or(vec![expression])],
        });
        self
    }

    pub fn or_map(mut self, mapping: HashMap<String, Value>) -> Self {
        let conditions = conditions_from_map(mapping);
        if !conditions.is_empty() {
            self.statement.add_clause(Where {
                exprs: vec![or(conditions)],
            });
        }
        self
    }

    /// A literal join fragment appended to FROM.
    pub fn join(mut self, condition: &str, args: impl IntoParams) -> Self {
        self.statement.add_clause(From {
            joins: vec![Join {
                expression: Some(Expression::Raw(expr(
                    condition,
                    params_to_vars(args.into_params()),
                ))),
                ..Join::default()
            }],
            ..From::default()
        });
        self
    }

    /// Upsert behaviour for the pending INSERT.
    pub fn on_conflict(mut self, on_conflict: OnConflict) -> Self {
        self.statement.add_clause(on_conflict);
        self
    }

    /// RETURNING columns for the pending INSERT (RETURNING-capable
    /// dialects).
    pub fn returning(mut self, columns: &[&str]) -> Self {
        self.statement.add_clause(Returning {
            columns: columns.iter().map(|c| Column::new(*c)).collect(),
        });
        self
    }

    /// Literal prefix emitted before any clause (database-middleware
    /// directives).
    pub fn hint(mut self, hint: &str) -> Self {
        self.statement.hint = hint.to_owned();
        self
    }

    /// Pin this session's reads to the master.
    pub fn master(mut self) -> Self {
        self.db.is_master = true;
        self
    }

    // ---- terminal operations --------------------------------------------

    /// All rows as records or tuples.
    pub async fn find<T>(&mut self) -> DbResult<Vec<T>>
    where
        T: for<'r> sqlx::FromRow<'r, AnyRow>,
    {
        let result = self.run_query_rows().await;
        self.clear();
        scan::rows_to(&result?)
    }

    /// The first row as a record; forces `LIMIT 1` and surfaces
    /// `RecordNotFound` on an empty result.
    pub async fn first<T>(&mut self) -> DbResult<T>
    where
        T: for<'r> sqlx::FromRow<'r, AnyRow>,
    {
        self.statement.add_clause(Limit { limit: 1, offset: 0 });
        let result = self.run_query_rows().await;
        self.clear();
        scan::single(&result?)
    }

    /// All rows as column -> value mappings.
    pub async fn find_maps(&mut self) -> DbResult<Vec<Row>> {
        let result = self.run_query_rows().await;
        self.clear();
        scan::rows_to_maps(&result?)
    }

    /// The first row as a mapping; forces `LIMIT 1`.
    pub async fn first_map(&mut self) -> DbResult<Row> {
        self.statement.add_clause(Limit { limit: 1, offset: 0 });
        let result = self.run_query_rows().await;
        self.clear();
        scan::single_map(&result?)
    }

    /// First column of every row.
    pub async fn find_scalars<T>(&mut self) -> DbResult<Vec<T>>
    where
        T: for<'r> sqlx::Decode<'r, sqlx::Any> + sqlx::Type<sqlx::Any>,
    {
        let result = self.run_query_rows().await;
        self.clear();
        scan::rows_to_scalars(&result?)
    }

    /// First column of the first row; forces `LIMIT 1`.
    pub async fn first_scalar<T>(&mut self) -> DbResult<T>
    where
        T: for<'r> sqlx::Decode<'r, sqlx::Any> + sqlx::Type<sqlx::Any>,
    {
        self.statement.add_clause(Limit { limit: 1, offset: 0 });
        let result = self.run_query_rows().await;
        self.clear();
        scan::single_scalar(&result?)
    }

    /// `count(*)` unless an explicit column selection is present.
    pub async fn count(&mut self) -> DbResult<i64> {
        let result = self.run_count().await;
        self.clear();
        result
    }

    async fn run_count(&mut self) -> DbResult<i64> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }

        let has_columns = matches!(
            self.statement
                .clauses
                .get(&ClauseName::Select)
                .and_then(|c| c.expression.as_ref()),
            Some(Expression::Select(select)) if !select.columns.is_empty()
        );
        if !has_columns {
            self.statement.add_clause(Select {
                expressions: vec![Expression::Raw(expr("count(*)", vec![]))],
                ..Select::default()
            });
        }

        if self.statement.sql.is_empty() {
            self.build_query_sql();
        }

        let sql = self.statement.sql.clone();
        let vars = self.statement.sql_vars.clone();
        match self.db.query_row(&sql, vars).await? {
            Some(row) => Ok(sqlx::Row::try_get::<i64, _>(&row, 0)?),
            None => Err(DbError::RecordNotFound),
        }
    }

    /// Whether any row matches.
    pub async fn exist(&mut self) -> DbResult<bool> {
        Ok(self.count().await? > 0)
    }

    /// Insert one record or mapping; returns the first generated id (0 when
    /// the driver reports none).
    pub async fn create<T: ToRow>(&mut self, data: &T) -> DbResult<i64> {
        if let Some(err) = self.error.take() {
            self.clear();
            return Err(err);
        }
        let values = convert_create_values(std::slice::from_ref(data));
        let result = self.insert_rows(values, 1).await;
        self.clear();
        Ok(result?.first().copied().unwrap_or(0))
    }

    /// Insert a batch; returns the ordered id list. Empty input fails.
    pub async fn bulk_create<T: ToRow>(&mut self, data: &[T]) -> DbResult<Vec<i64>> {
        if let Some(err) = self.error.take() {
            self.clear();
            return Err(err);
        }
        if data.is_empty() {
            self.clear();
            return Err(DbError::Builder(
                "bulk create data cannot be empty".to_owned(),
            ));
        }
        let values = convert_create_values(data);
        let result = self.insert_rows(values, data.len()).await;
        self.clear();
        result
    }

    async fn insert_rows(&mut self, values: Values, row_count: usize) -> DbResult<Vec<i64>> {
        let table_name = self
            .statement
            .tables
            .first()
            .map(|t| t.name.clone())
            .unwrap_or_default();
        self.statement.add_clause_if_not_exists(Insert {
            table: Some(Table::new(table_name.clone())),
            modifier: None,
        });
        self.statement.add_clause(values);

        let dialect = self.db.dialect();
        let mut has_returning = false;
        if dialect.with_returning() {
            has_returning = matches!(
                self.statement
                    .clauses
                    .get(&ClauseName::Returning)
                    .and_then(|c| c.expression.as_ref()),
                Some(Expression::Returning(returning)) if !returning.columns.is_empty()
            );
            if !has_returning {
                let pk_columns = dialect.pk_column_names(&self.db, &table_name).await;
                if pk_columns.len() == 1 {
                    self.statement.add_clause(Returning {
                        columns: vec![Column::new(pk_columns[0].clone())],
                    });
                    has_returning = true;
                }
            }
        }

        self.statement.build(INSERT_CLAUSES);
        let sql = self.statement.sql.clone();
        let vars = self.statement.sql_vars.clone();

        if has_returning {
            let rows = self.db.query(&sql, vars).await?;
            return scan::rows_to_scalars(&rows);
        }

        let result = self.db.exec(&sql, vars).await?;
        let Some(last_id) = result.last_insert_id() else {
            return Ok(Vec::new());
        };

        // The driver reports one id per batch; reconstruct the sequence in
        // the direction the dialect documents.
        let count = row_count as i64;
        let mut ids = Vec::with_capacity(row_count);
        if dialect.last_insert_id_reversed() {
            for offset in (0..count).rev() {
                ids.push(last_id - offset);
            }
        } else {
            for offset in 0..count {
                ids.push(last_id + offset);
            }
        }
        Ok(ids)
    }

    /// Single-column update; returns rows affected.
    pub async fn update(&mut self, column: &str, value: impl Into<Value>) -> DbResult<u64> {
        let assignments = vec![Assignment {
            column: Column::new(column),
            value: Var::Value(value.into()),
        }];
        self.update_with(assignments).await
    }

    /// Multi-column update in ascending key order; returns rows affected.
    pub async fn bulk_update(&mut self, data: HashMap<String, Value>) -> DbResult<u64> {
        let mut pairs: Vec<(String, Value)> = data.into_iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        let assignments = pairs
            .into_iter()
            .map(|(column, value)| Assignment {
                column: Column::new(column),
                value: Var::Value(value),
            })
            .collect();
        self.update_with(assignments).await
    }

    async fn update_with(&mut self, assignments: Vec<Assignment>) -> DbResult<u64> {
        let result = self.run_update(assignments).await;
        self.clear();
        result
    }

    async fn run_update(&mut self, assignments: Vec<Assignment>) -> DbResult<u64> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }

        let table = self.statement.tables.first().cloned();
        self.statement.add_clause_if_not_exists(Update {
            modifier: None,
            table,
        });
        self.statement.add_clause(Set { assignments });
        self.statement.build(UPDATE_CLAUSES);

        let sql = self.statement.sql.clone();
        let vars = self.statement.sql_vars.clone();
        let result = self.db.exec(&sql, vars).await?;
        Ok(result.rows_affected())
    }

    /// Delete matching rows; refuses to run without a WHERE contribution.
    pub async fn delete(&mut self) -> DbResult<u64> {
        let result = self.run_delete().await;
        self.clear();
        result
    }

    async fn run_delete(&mut self) -> DbResult<u64> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        if !self.statement.has_clause(ClauseName::Where) {
            return Err(DbError::MissingWhereClause);
        }

        let tables = self.statement.tables.clone();
        self.statement.add_clause_if_not_exists(Delete::default());
        self.statement.add_clause_if_not_exists(From {
            tables,
            ..From::default()
        });
        self.statement.build(DELETE_CLAUSES);

        let sql = self.statement.sql.clone();
        let vars = self.statement.sql_vars.clone();
        let result = self.db.exec(&sql, vars).await?;
        Ok(result.rows_affected())
    }

    /// The raw row set of the built query.
    pub async fn query(&mut self) -> DbResult<Vec<AnyRow>> {
        let result = self.run_query_rows().await;
        self.clear();
        result
    }

    /// At most one raw row of the built query.
    pub async fn query_row(&mut self) -> DbResult<Option<AnyRow>> {
        let result = self.run_query_row().await;
        self.clear();
        result
    }

    // ---- internals -------------------------------------------------------

    fn build_query_sql(&mut self) {
        let from_has_tables = matches!(
            self.statement
                .clauses
                .get(&ClauseName::From)
                .and_then(|c| c.expression.as_ref()),
            Some(Expression::From(from)) if !from.tables.is_empty()
        );
        if !from_has_tables {
            self.statement.add_clause(From {
                tables: self.statement.tables.clone(),
                ..From::default()
            });
        }

        self.statement.add_clause_if_not_exists(Select::default());
        self.statement.build(QUERY_CLAUSES);
    }

    async fn run_query_rows(&mut self) -> DbResult<Vec<AnyRow>> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        if self.statement.sql.is_empty() {
            self.build_query_sql();
        }
        let sql = self.statement.sql.clone();
        let vars = self.statement.sql_vars.clone();
        self.db.query(&sql, vars).await
    }

    async fn run_query_row(&mut self) -> DbResult<Option<AnyRow>> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        if self.statement.sql.is_empty() {
            self.build_query_sql();
        }
        let sql = self.statement.sql.clone();
        let vars = self.statement.sql_vars.clone();
        self.db.query_row(&sql, vars).await
    }
}

fn params_to_vars(params: Vec<Param>) -> Vec<Var> {
    params.into_iter().map(Param::into_var).collect()
}
