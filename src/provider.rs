//! Connection records and the data-provider boundary.
//!
//! Fetching connections is the one asynchronous step in the system. The
//! model only sees it through [`ConnectionProvider`]; hosts that fetch over
//! the network drive [`crate::model::Model::begin_update`] and
//! [`crate::model::Model::apply_connections`] themselves.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::config::Thresholds;
use crate::error::Result;
use crate::graph::{EdgeAttrs, EdgeKind};

// ─── Connection ───────────────────────────────────────────────────────────────

/// One raw connection record as returned by the data provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub pre: String,
    pub post: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    #[serde(default)]
    pub synapses: BTreeMap<String, u32>,
    #[serde(default)]
    pub annotations: Vec<String>,
}

impl Connection {
    pub fn new(pre: impl Into<String>, post: impl Into<String>, kind: EdgeKind) -> Self {
        Self {
            pre: pre.into(),
            post: post.into(),
            kind,
            synapses: BTreeMap::new(),
            annotations: Vec::new(),
        }
    }

    pub fn with_synapses(mut self, dataset: &str, count: u32) -> Self {
        self.synapses.insert(dataset.to_string(), count);
        self
    }

    pub fn with_annotation(mut self, tag: &str) -> Self {
        self.annotations.push(tag.to_string());
        self
    }

    /// Edge attributes carried by this record.
    pub fn attrs(&self) -> EdgeAttrs {
        EdgeAttrs {
            synapses: self.synapses.clone(),
            annotations: self.annotations.iter().cloned().collect(),
        }
    }

    /// Mean synapse count over `datasets`, or over every dataset present
    /// when `datasets` is empty.
    pub fn mean_synapses(&self, datasets: &[String]) -> f64 {
        mean_synapses(&self.synapses, datasets)
    }
}

/// Mean of `synapses` over `datasets` (absent datasets count as zero).
pub fn mean_synapses(synapses: &BTreeMap<String, u32>, datasets: &[String]) -> f64 {
    if datasets.is_empty() {
        if synapses.is_empty() {
            return 0.0;
        }
        let total: u64 = synapses.values().map(|&c| u64::from(c)).sum();
        return total as f64 / synapses.len() as f64;
    }
    let total: u64 = datasets
        .iter()
        .map(|d| synapses.get(d).map_or(0, |&c| u64::from(c)))
        .sum();
    total as f64 / datasets.len() as f64
}

// ─── Request ──────────────────────────────────────────────────────────────────

/// What the model asks the data provider for.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRequest {
    /// Input ids plus the classes and members they imply.
    pub cells: Vec<String>,
    pub datasets: Vec<String>,
    pub thresholds: Thresholds,
    /// Also return connections among the neighbours of `cells`.
    pub include_linked: bool,
}

impl ConnectionRequest {
    pub fn threshold(&self, kind: EdgeKind) -> u32 {
        match kind {
            EdgeKind::Chemical => self.thresholds.chemical,
            EdgeKind::Electrical => self.thresholds.electrical,
        }
    }
}

// ─── Provider ─────────────────────────────────────────────────────────────────

/// Source of connection records.
pub trait ConnectionProvider {
    /// Fetch the connections for `request`. Failures surface unchanged as
    /// [`crate::error::NetworkError::Fetch`].
    fn fetch(&self, request: &ConnectionRequest) -> Result<Vec<Connection>>;
}

/// Provider over a fixed in-memory list of connections.
#[derive(Debug, Clone, Default)]
pub struct StaticConnections {
    connections: Vec<Connection>,
}

impl StaticConnections {
    pub fn new(connections: Vec<Connection>) -> Self {
        let connections = connections
            .into_iter()
            .map(|mut c| {
                c.pre = c.pre.to_uppercase();
                c.post = c.post.to_uppercase();
                c
            })
            .collect();
        Self { connections }
    }
}

impl ConnectionProvider for StaticConnections {
    fn fetch(&self, request: &ConnectionRequest) -> Result<Vec<Connection>> {
        let cells: BTreeSet<&str> = request.cells.iter().map(String::as_str).collect();
        let strong: Vec<&Connection> = self
            .connections
            .iter()
            .filter(|c| c.mean_synapses(&request.datasets) >= request.threshold(c.kind) as f64)
            .collect();

        let touches = |c: &Connection| cells.contains(c.pre.as_str()) || cells.contains(c.post.as_str());
        let mut neighbors: BTreeSet<&str> = BTreeSet::new();
        for c in strong.iter().filter(|c| touches(c)) {
            neighbors.insert(c.pre.as_str());
            neighbors.insert(c.post.as_str());
        }

        Ok(strong
            .into_iter()
            .filter(|c| {
                touches(c)
                    || (request.include_linked
                        && neighbors.contains(c.pre.as_str())
                        && neighbors.contains(c.post.as_str()))
            })
            .cloned()
            .collect())
    }
}
