// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Test fixtures
//!
//! An in-memory SQLite engine group plus the `auth_user` schema and model
//! the integration tests work against. The pool is capped at one connection
//! so every statement sees the same in-memory database.

use std::collections::HashMap;

use sqlgate::{Config, DbConfig, EngineConfig, EngineGroup, Row, ToRow, Value};

/// The schema the CRUD tests run against.
pub const AUTH_USER_DDL: &str = "CREATE TABLE auth_user (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL,
    password TEXT NOT NULL DEFAULT '',
    age INTEGER NOT NULL DEFAULT 0,
    is_superuser INTEGER NOT NULL DEFAULT 0
)";

/// A row of `auth_user`.
#[derive(Debug, Clone, PartialEq, Default, sqlx::FromRow)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub age: i64,
    pub is_superuser: i64,
}

impl ToRow for AuthUser {
    fn to_row(&self) -> Vec<(String, Value)> {
        vec![
            ("id".to_owned(), self.id.into()),
            ("username".to_owned(), self.username.clone().into()),
            ("password".to_owned(), self.password.clone().into()),
            ("age".to_owned(), self.age.into()),
            ("is_superuser".to_owned(), self.is_superuser.into()),
        ]
    }
}

/// Open an engine group backed by a shared in-memory SQLite database with
/// the test schema applied.
pub async fn setup_engine_group() -> EngineGroup {
    let conf: DbConfig = HashMap::from([(
        "default".to_owned(),
        EngineConfig::Single(Config {
            driver: "sqlite".to_owned(),
            dns: "sqlite::memory:".to_owned(),
            max_conns: 1,
            max_idle_conns: 1,
            ..Config::default()
        }),
    )]);

    let engines = EngineGroup::open(conf, false)
        .await
        .expect("in-memory engine group");
    engines
        .exec(AUTH_USER_DDL, ())
        .await
        .expect("schema bootstrap");
    engines
}

/// Insert one user per given id, named `user<id>`, with `age = id * 10`.
pub async fn insert_auth_users(engines: &EngineGroup, ids: &[i64]) {
    for id in ids {
        engines
            .exec(
                "insert into auth_user (id, username, password, age) values (?, ?, ?, ?)",
                (*id, format!("user{id}"), "pass", *id * 10),
            )
            .await
            .expect("seed row");
    }
}

/// Pull a typed copy of a mapping value for assertions.
pub fn map_int(row: &Row, key: &str) -> i64 {
    match row.get(key) {
        Some(Value::Int(v)) => *v,
        other => panic!("expected integer at `{key}`, got {other:?}"),
    }
}
