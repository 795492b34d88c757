// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Raw-SQL sessions: scanning families, `IN (?)`-expansion, and the
//! execution pipeline, against a shared in-memory SQLite database.

use sqlgate::{DbError, Value};
use sqlgate_test_utils::{AuthUser, insert_auth_users, map_int, setup_engine_group};

#[tokio::test]
async fn test_fetch_map_families() {
    let engines = setup_engine_group().await;
    insert_auth_users(&engines, &[1, 2, 3]).await;

    let row = engines
        .raw("select * from auth_user where id = ?", (2,))
        .fetch_map()
        .await
        .expect("single map");
    assert_eq!(map_int(&row, "id"), 2);

    let rows = engines
        .raw("select id, username from auth_user order by id limit 2", ())
        .fetch_maps()
        .await
        .expect("map slice");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["username"], Value::from("user2"));

    let err = engines
        .raw("select * from auth_user where id = ?", (-1,))
        .fetch_map()
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::RecordNotFound));
}

#[tokio::test]
async fn test_fetch_records_and_scalars() {
    let engines = setup_engine_group().await;
    insert_auth_users(&engines, &[1, 2, 3]).await;

    let users: Vec<AuthUser> = engines
        .raw("select * from auth_user order by id", ())
        .fetch()
        .await
        .expect("records");
    assert_eq!(users.len(), 3);
    assert_eq!(users[2].username, "user3");

    let user: AuthUser = engines
        .raw("select * from auth_user where id = ?", (1,))
        .fetch_one()
        .await
        .expect("one record");
    assert_eq!(user.id, 1);

    let ids: Vec<i64> = engines
        .raw("select id from auth_user order by id", ())
        .fetch_scalars()
        .await
        .expect("scalars");
    assert_eq!(ids, vec![1, 2, 3]);

    let total: i64 = engines
        .raw("select count(*) from auth_user", ())
        .fetch_scalar()
        .await
        .expect("scalar");
    assert_eq!(total, 3);
}

#[tokio::test]
async fn test_in_expansion_through_dispatch() {
    let engines = setup_engine_group().await;
    insert_auth_users(&engines, &[1, 2, 3, 4]).await;

    let ids: Vec<i64> = engines
        .raw(
            "select id from auth_user where id in (?) order by id",
            (vec![1, 3, 4],),
        )
        .fetch_scalars()
        .await
        .expect("expanded in");
    assert_eq!(ids, vec![1, 3, 4]);

    // The bare `in ?` shape works the same at the raw layer.
    let ids: Vec<i64> = engines
        .raw(
            "select id from auth_user where id in (?) and age > ? order by id",
            (vec![1, 2, 3], 15),
        )
        .fetch_scalars()
        .await
        .expect("expanded with trailing arg");
    assert_eq!(ids, vec![2, 3]);
}

#[tokio::test]
async fn test_raw_exec_and_rows() {
    let engines = setup_engine_group().await;

    let result = engines
        .raw(
            "insert into auth_user (username, password, age) values (?, ?, ?)",
            ("bin", "pass", 18),
        )
        .exec()
        .await
        .expect("raw insert");
    assert_eq!(result.rows_affected(), 1);

    let rows = engines
        .raw("select * from auth_user", ())
        .query()
        .await
        .expect("rows");
    assert_eq!(rows.len(), 1);

    let row = engines
        .raw("select username from auth_user where id = ?", (1,))
        .query_row()
        .await
        .expect("row");
    assert!(row.is_some());

    let affected = engines
        .exec("update auth_user set age = ? where id = ?", (21, 1))
        .await
        .expect("group exec")
        .rows_affected();
    assert_eq!(affected, 1);
}

#[tokio::test]
async fn test_master_pinning_on_raw_session() {
    let engines = setup_engine_group().await;
    insert_auth_users(&engines, &[1]).await;

    let row = engines
        .raw("select * from auth_user", ())
        .master()
        .fetch_map()
        .await
        .expect("master read");
    assert_eq!(map_int(&row, "id"), 1);
}
