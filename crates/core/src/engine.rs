// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Engines and the engine group
//!
//! A [`ConnectionEngine`] bundles one master pool, its replica pools, the
//! slave-selection policy and the dialect. An [`EngineGroup`] maps alias
//! names to engines, resolved from a [`DbConfig`]; the mapping must contain
//! the `"default"` alias, whose client also backs the group-level
//! passthrough methods.

use std::collections::HashMap;
use std::sync::{Arc, Once, RwLock};
use std::time::Duration;

use sqlx::AnyPool;
use sqlx::any::{AnyPoolOptions, AnyQueryResult, AnyRow};

use sqlgate_dialect::{Dialect, get_dialect};

use crate::client::DbClient;
use crate::config::{ClusterConfig, Config, DbConfig, EngineConfig};
use crate::error::{DbError, DbResult};
use crate::params::IntoParams;
use crate::policy::{Policy, get_policy_handler, random_policy};
use crate::raw::RawSession;
use crate::session::Session;

/// The alias every configuration mapping must define.
pub const DEFAULT_DB_ALIAS: &str = "default";

/// One pooled database endpoint.
pub struct Connection {
    pool: AnyPool,
    driver: String,
}

impl Connection {
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub fn driver_name(&self) -> &str {
        &self.driver
    }

    /// Currently open connections; feeds the least-connections policy.
    pub fn open_connections(&self) -> u32 {
        self.pool.size()
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Master, replicas, picker and dialect for one logical database.
pub struct ConnectionEngine {
    master: Connection,
    slaves: Vec<Connection>,
    policy: RwLock<Arc<dyn Policy>>,
    dialect: Arc<dyn Dialect>,
    driver: String,
}

impl ConnectionEngine {
    pub fn master(&self) -> &Connection {
        &self.master
    }

    pub fn slaves(&self) -> &[Connection] {
        &self.slaves
    }

    /// The read target: the master with no replicas, the sole replica
    /// without consulting the picker, otherwise the picker's choice.
    pub fn slave(&self) -> &Connection {
        match self.slaves.len() {
            0 => &self.master,
            1 => &self.slaves[0],
            _ => {
                let policy = self.policy.read().expect("policy lock poisoned").clone();
                policy.slave(self)
            }
        }
    }

    pub fn dialect(&self) -> Arc<dyn Dialect> {
        self.dialect.clone()
    }

    pub fn driver_name(&self) -> &str {
        &self.driver
    }

    pub fn set_policy(&self, policy: Arc<dyn Policy>) {
        *self.policy.write().expect("policy lock poisoned") = policy;
    }

    async fn close(&self) {
        self.master.close().await;
        for slave in &self.slaves {
            slave.close().await;
        }
    }
}

async fn open_connection(driver: &str, conf: &Config) -> DbResult<Connection> {
    let mut options = AnyPoolOptions::new();
    if conf.max_conns > 0 {
        options = options.max_connections(conf.max_conns);
    }
    if conf.max_idle_conns > 0 {
        options = options.min_connections(conf.max_idle_conns);
    }
    if conf.max_lifetime > 0 {
        options = options.max_lifetime(Duration::from_secs(conf.max_lifetime));
    }

    let pool = options.connect(&conf.dns).await?;
    Ok(Connection {
        pool,
        driver: driver.to_owned(),
    })
}

async fn resolve_cluster(alias: &str, conf: &ClusterConfig) -> DbResult<ConnectionEngine> {
    if conf.driver.is_empty() {
        return Err(DbError::Config(format!(
            "database alias `{alias}` has no driver configured"
        )));
    }

    let dialect = get_dialect(&conf.driver)
        .ok_or_else(|| DbError::Config(format!("dialect `{}` not found", conf.driver)))?;

    let master = open_connection(&conf.driver, &conf.master).await?;

    let mut slaves = Vec::with_capacity(conf.slaves.len());
    for slave_conf in &conf.slaves {
        slaves.push(open_connection(&conf.driver, slave_conf).await?);
    }

    // Without replicas the picker is bypassed entirely; a configured policy
    // only resolves when there is something to pick from.
    let policy = if slaves.is_empty() {
        random_policy()
    } else {
        match &conf.policy {
            None => random_policy(),
            Some(options) if options.mode.is_empty() => random_policy(),
            Some(options) => {
                let handler = get_policy_handler(&options.mode).ok_or_else(|| {
                    DbError::Config(format!("the policy `{}` doesn't exist", options.mode))
                })?;
                handler(options.params.clone())
            }
        }
    };

    Ok(ConnectionEngine {
        master,
        slaves,
        policy: RwLock::new(policy),
        dialect,
        driver: conf.driver.clone(),
    })
}

/// Named engines sharing a default alias.
pub struct EngineGroup {
    engines: HashMap<String, Arc<ConnectionEngine>>,
    default_client: DbClient,
    show_sql: bool,
}

impl std::fmt::Debug for EngineGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineGroup")
            .field("engines", &self.engines.keys().collect::<Vec<_>>())
            .field("show_sql", &self.show_sql)
            .finish()
    }
}

impl EngineGroup {
    /// Open every configured engine. The mapping must be non-empty and
    /// contain the [`DEFAULT_DB_ALIAS`] entry.
    pub async fn open(conf: DbConfig, show_sql: bool) -> DbResult<EngineGroup> {
        static INSTALL_DRIVERS: Once = Once::new();
        INSTALL_DRIVERS.call_once(sqlx::any::install_default_drivers);

        if conf.is_empty() {
            return Err(DbError::Config(
                "database connection configuration cannot be empty".to_owned(),
            ));
        }
        if !conf.contains_key(DEFAULT_DB_ALIAS) {
            return Err(DbError::Config(format!(
                "you must define a `{DEFAULT_DB_ALIAS}` database"
            )));
        }

        let mut engines = HashMap::with_capacity(conf.len());
        for (alias, engine_conf) in &conf {
            let engine = match engine_conf {
                EngineConfig::Single(single) => {
                    let cluster = ClusterConfig {
                        driver: single.driver.clone(),
                        master: single.clone(),
                        slaves: Vec::new(),
                        policy: None,
                    };
                    resolve_cluster(alias, &cluster).await?
                }
                EngineConfig::Cluster(cluster) => resolve_cluster(alias, cluster).await?,
            };
            engines.insert(alias.clone(), Arc::new(engine));
        }

        let default_engine = engines[DEFAULT_DB_ALIAS].clone();
        Ok(EngineGroup {
            engines,
            default_client: DbClient::new(default_engine, show_sql),
            show_sql,
        })
    }

    /// The engine registered under `alias`.
    pub fn engine(&self, alias: &str) -> Option<Arc<ConnectionEngine>> {
        self.engines.get(alias).cloned()
    }

    /// A client bound to the engine registered under `alias`.
    pub fn use_db(&self, alias: &str) -> DbResult<DbClient> {
        let engine = self.engines.get(alias).ok_or_else(|| {
            DbError::Config(format!("the database alias `{alias}` is not configured"))
        })?;
        Ok(DbClient::new(engine.clone(), self.show_sql))
    }

    /// Replace the slave-selection policy of one alias.
    pub fn set_policy(&self, alias: &str, policy: Arc<dyn Policy>) -> DbResult<()> {
        let engine = self.engines.get(alias).ok_or_else(|| {
            DbError::Config(format!("the database alias `{alias}` is not configured"))
        })?;
        engine.set_policy(policy);
        Ok(())
    }

    /// Close every pool in every engine.
    pub async fn close(&self) {
        for engine in self.engines.values() {
            engine.close().await;
        }
    }

    /// A session on the default engine.
    pub fn table(&self, table: &str) -> Session {
        self.default_client.table(table)
    }

    /// A raw-SQL session on the default engine.
    pub fn raw(&self, query: impl Into<String>, args: impl IntoParams) -> RawSession {
        self.default_client.raw(query, args)
    }

    pub fn rebind(&self, query: &str) -> String {
        self.default_client.rebind(query)
    }

    pub async fn exec(&self, query: &str, args: impl IntoParams) -> DbResult<AnyQueryResult> {
        let mut client = self.default_client.clone();
        client.exec(query, args.into_params()).await
    }

    pub async fn query(&self, query: &str, args: impl IntoParams) -> DbResult<Vec<AnyRow>> {
        self.default_client.query(query, args.into_params()).await
    }

    pub async fn query_row(&self, query: &str, args: impl IntoParams) -> DbResult<Option<AnyRow>> {
        self.default_client
            .query_row(query, args.into_params())
            .await
    }

    /// Run `f` inside a transaction on the default engine's master.
    pub async fn tx<F, Fut, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(DbClient) -> Fut,
        Fut: Future<Output = DbResult<T>>,
    {
        self.default_client.tx(f).await
    }

    /// An explicit transaction handle on the default engine's master.
    pub async fn begin(&self) -> DbResult<DbClient> {
        self.default_client.begin().await
    }

    pub fn driver_name(&self) -> &str {
        self.default_client.driver_name()
    }
}
