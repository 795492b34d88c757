// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Slave-selection policies
//!
//! A [`Policy`] picks one replica per read. Five strategies ship built in
//! (`random`, `weightrandom`, `roundrobin`, `weightroundrobin`, `leastconn`)
//! and user constructors may be registered under additional mode names.
//! With zero replicas the engine bypasses the policy and uses the master;
//! with exactly one, that replica is returned without consulting it.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, RwLock};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::engine::{Connection, ConnectionEngine};

/// Picks one replica for a read.
pub trait Policy: Send + Sync {
    fn slave<'a>(&self, engine: &'a ConnectionEngine) -> &'a Connection;
}

/// Structured policy input; `weights[i]` weighs `slaves[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PolicyParams {
    #[serde(default)]
    pub weights: Vec<u32>,
}

/// Constructor registered under a policy mode name.
pub type PolicyHandler = fn(PolicyParams) -> Arc<dyn Policy>;

static POLICY_HANDLERS: LazyLock<RwLock<HashMap<String, PolicyHandler>>> = LazyLock::new(|| {
    let mut mapping: HashMap<String, PolicyHandler> = HashMap::new();
    mapping.insert("random".to_owned(), |_| random_policy());
    mapping.insert("weightrandom".to_owned(), weight_random_policy);
    mapping.insert("roundrobin".to_owned(), |_| round_robin_policy());
    mapping.insert("weightroundrobin".to_owned(), weight_round_robin_policy);
    mapping.insert("leastconn".to_owned(), |_| least_conn_policy());
    RwLock::new(mapping)
});

/// Register a policy constructor; the mode name is lowercased.
pub fn register_policy_handler(name: &str, handler: PolicyHandler) {
    POLICY_HANDLERS
        .write()
        .expect("policy registry poisoned")
        .insert(name.to_lowercase(), handler);
}

/// Look up a policy constructor by mode name (case-insensitive).
pub fn get_policy_handler(name: &str) -> Option<PolicyHandler> {
    POLICY_HANDLERS
        .read()
        .expect("policy registry poisoned")
        .get(&name.to_lowercase())
        .copied()
}

/// Expand weights into `[i repeated weights[i] times]`.
fn expand_weights(weights: &[u32]) -> Vec<usize> {
    let mut expanded = Vec::new();
    for (idx, weight) in weights.iter().enumerate() {
        for _ in 0..*weight {
            expanded.push(idx);
        }
    }
    expanded
}

fn clamp_index(index: usize, count: usize) -> usize {
    if index >= count { count - 1 } else { index }
}

struct RandomPolicy {
    rng: Mutex<StdRng>,
}

impl Policy for RandomPolicy {
    fn slave<'a>(&self, engine: &'a ConnectionEngine) -> &'a Connection {
        let slaves = engine.slaves();
        let idx = self
            .rng
            .lock()
            .expect("rng poisoned")
            .gen_range(0..slaves.len());
        &slaves[idx]
    }
}

/// Uniform random pick, seeded once at construction.
pub fn random_policy() -> Arc<dyn Policy> {
    Arc::new(RandomPolicy {
        rng: Mutex::new(StdRng::from_entropy()),
    })
}

struct WeightRandomPolicy {
    expanded: Vec<usize>,
    rng: Mutex<StdRng>,
}

impl Policy for WeightRandomPolicy {
    fn slave<'a>(&self, engine: &'a ConnectionEngine) -> &'a Connection {
        let slaves = engine.slaves();
        if self.expanded.is_empty() {
            return &slaves[0];
        }
        let pick = self
            .rng
            .lock()
            .expect("rng poisoned")
            .gen_range(0..self.expanded.len());
        &slaves[clamp_index(self.expanded[pick], slaves.len())]
    }
}

/// Weighted random pick over the pre-expanded index sequence.
pub fn weight_random_policy(params: PolicyParams) -> Arc<dyn Policy> {
    Arc::new(WeightRandomPolicy {
        expanded: expand_weights(&params.weights),
        rng: Mutex::new(StdRng::from_entropy()),
    })
}

struct RoundRobinPolicy {
    pos: Mutex<i64>,
}

impl Policy for RoundRobinPolicy {
    fn slave<'a>(&self, engine: &'a ConnectionEngine) -> &'a Connection {
        let slaves = engine.slaves();
        let mut pos = self.pos.lock().expect("counter poisoned");
        *pos += 1;
        if *pos as usize >= slaves.len() {
            *pos = 0;
        }
        &slaves[*pos as usize]
    }
}

/// Monotonic counter modulo the replica count.
pub fn round_robin_policy() -> Arc<dyn Policy> {
    Arc::new(RoundRobinPolicy { pos: Mutex::new(-1) })
}

struct WeightRoundRobinPolicy {
    expanded: Vec<usize>,
    pos: Mutex<i64>,
}

impl Policy for WeightRoundRobinPolicy {
    fn slave<'a>(&self, engine: &'a ConnectionEngine) -> &'a Connection {
        let slaves = engine.slaves();
        if self.expanded.is_empty() {
            return &slaves[0];
        }
        let mut pos = self.pos.lock().expect("counter poisoned");
        *pos += 1;
        if *pos as usize >= self.expanded.len() {
            *pos = 0;
        }
        &slaves[clamp_index(self.expanded[*pos as usize], slaves.len())]
    }
}

/// Weighted round-robin over the pre-expanded index sequence. Indices that
/// refer past the replica count clamp to the last replica.
pub fn weight_round_robin_policy(params: PolicyParams) -> Arc<dyn Policy> {
    Arc::new(WeightRoundRobinPolicy {
        expanded: expand_weights(&params.weights),
        pos: Mutex::new(-1),
    })
}

struct LeastConnPolicy;

impl Policy for LeastConnPolicy {
    fn slave<'a>(&self, engine: &'a ConnectionEngine) -> &'a Connection {
        let slaves = engine.slaves();
        let mut best = 0;
        let mut connections = u32::MAX;
        for (idx, slave) in slaves.iter().enumerate() {
            let open = slave.open_connections();
            if open < connections {
                connections = open;
                best = idx;
            }
        }
        &slaves[best]
    }
}

/// Smallest open-connection count; ties keep the first seen.
pub fn least_conn_policy() -> Arc<dyn Policy> {
    Arc::new(LeastConnPolicy)
}
