// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Engine-group lifecycle: configuration validation, alias lookup, and
//! slave-selection behaviour over in-memory SQLite pools.

use std::collections::HashMap;

use sqlgate::{
    ClusterConfig, Config, DbConfig, DbError, EngineConfig, EngineGroup, PolicyOptions,
    PolicyParams, round_robin_policy, weight_round_robin_policy,
};
use sqlgate_test_utils::setup_engine_group;

fn memory_config() -> Config {
    Config {
        driver: "sqlite".to_owned(),
        dns: "sqlite::memory:".to_owned(),
        max_conns: 1,
        max_idle_conns: 1,
        ..Config::default()
    }
}

fn cluster_config(slave_count: usize, policy: Option<PolicyOptions>) -> DbConfig {
    HashMap::from([(
        "default".to_owned(),
        EngineConfig::Cluster(ClusterConfig {
            driver: "sqlite".to_owned(),
            master: memory_config(),
            slaves: (0..slave_count).map(|_| memory_config()).collect(),
            policy,
        }),
    )])
}

#[tokio::test]
async fn test_open_rejects_empty_config() {
    let err = EngineGroup::open(HashMap::new(), false).await.unwrap_err();
    assert!(matches!(err, DbError::Config(_)));
}

#[tokio::test]
async fn test_open_requires_default_alias() {
    let conf: DbConfig = HashMap::from([(
        "reporting".to_owned(),
        EngineConfig::Single(memory_config()),
    )]);
    let err = EngineGroup::open(conf, false).await.unwrap_err();
    assert!(matches!(err, DbError::Config(_)));
}

#[tokio::test]
async fn test_open_rejects_unknown_driver() {
    let conf: DbConfig = HashMap::from([(
        "default".to_owned(),
        EngineConfig::Single(Config {
            driver: "oracle".to_owned(),
            dns: "oracle://nowhere/db".to_owned(),
            ..Config::default()
        }),
    )]);
    let err = EngineGroup::open(conf, false).await.unwrap_err();
    assert!(matches!(err, DbError::Config(_)));
}

#[tokio::test]
async fn test_open_rejects_unknown_policy_mode() {
    let conf = cluster_config(
        2,
        Some(PolicyOptions {
            mode: "nosuch".to_owned(),
            params: PolicyParams::default(),
        }),
    );
    let err = EngineGroup::open(conf, false).await.unwrap_err();
    assert!(matches!(err, DbError::Config(_)));
}

#[tokio::test]
async fn test_use_db_alias_lookup() {
    let engines = setup_engine_group().await;

    assert!(engines.use_db("default").is_ok());
    let err = engines.use_db("nosuch").unwrap_err();
    assert!(matches!(err, DbError::Config(_)));
}

#[tokio::test]
async fn test_driver_name_and_rebind() {
    let engines = setup_engine_group().await;

    assert_eq!(engines.driver_name(), "sqlite");
    assert_eq!(
        engines.rebind("select * from t where id = ?"),
        "select * from t where id = ?"
    );
}

#[tokio::test]
async fn test_multiple_aliases() {
    let conf: DbConfig = HashMap::from([
        ("default".to_owned(), EngineConfig::Single(memory_config())),
        ("reporting".to_owned(), EngineConfig::Single(memory_config())),
    ]);
    let engines = EngineGroup::open(conf, false).await.expect("open");

    let reporting = engines.use_db("reporting").expect("alias");
    reporting
        .raw("create table t (id integer primary key)", ())
        .exec()
        .await
        .expect("ddl on alias");

    // The table only exists on the aliased engine.
    let err = engines.raw("select * from t", ()).query().await;
    assert!(err.is_err());

    engines.close().await;
}

#[tokio::test]
async fn test_slave_selection_shortcuts_and_policies() {
    let engines = EngineGroup::open(cluster_config(3, None), false)
        .await
        .expect("open cluster");
    let engine = engines.engine("default").expect("engine");

    // Round-robin cycles in order.
    engine.set_policy(round_robin_policy());
    for expected in [0usize, 1, 2, 0, 1] {
        let picked = engine.slave();
        assert!(
            std::ptr::eq(picked, &engine.slaves()[expected]),
            "expected slave {expected}"
        );
    }

    // Weighted round-robin follows the expanded weights, clamping indices
    // that point past the replica list.
    engine.set_policy(weight_round_robin_policy(PolicyParams {
        weights: vec![2, 1, 0, 5],
    }));
    let expected = [0usize, 0, 1, 2, 2, 2, 2, 2, 0];
    for (step, expected) in expected.into_iter().enumerate() {
        let picked = engine.slave();
        assert!(
            std::ptr::eq(picked, &engine.slaves()[expected]),
            "step {step}: expected slave {expected}"
        );
    }
}

#[tokio::test]
async fn test_single_slave_bypasses_policy() {
    let engines = EngineGroup::open(cluster_config(1, None), false)
        .await
        .expect("open cluster");
    let engine = engines.engine("default").expect("engine");

    for _ in 0..3 {
        assert!(std::ptr::eq(engine.slave(), &engine.slaves()[0]));
    }
}

#[tokio::test]
async fn test_zero_slaves_use_master() {
    let engines = EngineGroup::open(cluster_config(0, None), false)
        .await
        .expect("open cluster");
    let engine = engines.engine("default").expect("engine");

    assert!(std::ptr::eq(engine.slave(), engine.master()));
}

#[tokio::test]
async fn test_random_policy_picks_a_replica() {
    let engines = EngineGroup::open(cluster_config(3, None), false)
        .await
        .expect("open cluster");
    let engine = engines.engine("default").expect("engine");

    for _ in 0..10 {
        let picked = engine.slave();
        assert!(
            engine
                .slaves()
                .iter()
                .any(|slave| std::ptr::eq(picked, slave))
        );
    }
}
