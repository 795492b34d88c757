// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Engine configuration
//!
//! The configuration surface mirrors the deployment shapes: a bare
//! [`Config`] for a single database, a [`ClusterConfig`] for a master with
//! replicas and a slave-selection policy, and [`DbConfig`] mapping aliases
//! to either. The mapping must contain the `"default"` alias.
//!
//! All structs derive serde, so a config can be loaded from YAML or JSON:
//!
//! ```yaml
//! default:
//!   driver: mysql
//!   dns: mysql://root@localhost:3306/app
//!   max_conns: 20
//! reporting:
//!   driver: postgres
//!   master:
//!     dns: postgres://root@localhost:5432/reporting
//!   slaves:
//!     - dns: postgres://root@replica:5432/reporting
//!   policy:
//!     mode: weightrandom
//!     params:
//!       weights: [2, 1]
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::policy::PolicyParams;

/// Connection settings for one physical database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Driver name; selects the dialect. May be inherited from the
    /// enclosing cluster.
    #[serde(default)]
    pub driver: String,
    /// Connection URL handed to the driver.
    pub dns: String,
    /// Pool capacity; `0` keeps the driver default.
    #[serde(default)]
    pub max_conns: u32,
    /// Connections kept open when idle; `0` keeps the driver default.
    #[serde(default)]
    pub max_idle_conns: u32,
    /// Maximum connection lifetime in seconds; `0` keeps the driver default.
    #[serde(default)]
    pub max_lifetime: u64,
}

/// Slave-selection policy choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PolicyOptions {
    pub mode: String,
    #[serde(default)]
    pub params: PolicyParams,
}

/// A master with replicas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    pub driver: String,
    pub master: Config,
    #[serde(default)]
    pub slaves: Vec<Config>,
    #[serde(default)]
    pub policy: Option<PolicyOptions>,
}

/// One alias entry: a single database or a cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EngineConfig {
    Cluster(ClusterConfig),
    Single(Config),
}

/// Alias -> engine configuration. Must contain [`DEFAULT_DB_ALIAS`].
///
/// [`DEFAULT_DB_ALIAS`]: crate::engine::DEFAULT_DB_ALIAS
pub type DbConfig = HashMap<String, EngineConfig>;
