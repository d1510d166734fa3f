//! DualEdgeGraph: one directed (chemical) and one undirected (electrical)
//! edge set over a shared set of string-identified nodes.
//!
//! Wraps `petgraph::stable_graph::StableDiGraph` and keeps a
//! `HashMap<String, NodeIndex>` for O(1) lookup by id. A stable graph keeps
//! the indices of surviving nodes valid across `remove_node`, which the
//! compiler does a lot of.
//!
//! Electrical edges are stored once, oriented from the lexicographically
//! smaller id to the larger one, and looked up from either side.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};

// ─── Edge kinds and attributes ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Directed synaptic connection.
    Chemical,
    /// Undirected gap junction.
    Electrical,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Chemical => "chemical",
            EdgeKind::Electrical => "electrical",
        }
    }
}

/// Attribute payload carried by every edge.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EdgeAttrs {
    /// Synapse count per dataset id.
    pub synapses: BTreeMap<String, u32>,
    pub annotations: BTreeSet<String>,
}

impl EdgeAttrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_synapses<I, S>(mut self, synapses: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        self.synapses = synapses.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self
    }

    pub fn with_annotations<I, S>(mut self, annotations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.annotations = annotations.into_iter().map(Into::into).collect();
        self
    }

    /// Fold `other` into `self`: synapse counts add up per dataset
    /// (saturating at `u32::MAX`) and annotation tags are unioned.
    pub fn merge(&mut self, other: &EdgeAttrs) {
        for (dataset, count) in &other.synapses {
            let total = self.synapses.entry(dataset.clone()).or_insert(0);
            *total = total.saturating_add(*count);
        }
        self.annotations.extend(other.annotations.iter().cloned());
    }
}

/// An owned snapshot of one stored edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
    pub attrs: EdgeAttrs,
}

// ─── Graph ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct NodeData<N> {
    id: String,
    attrs: N,
}

#[derive(Debug, Clone)]
struct EdgeData {
    kind: EdgeKind,
    attrs: EdgeAttrs,
}

/// Adjacency graph with a chemical and an electrical edge set.
///
/// `N` is a caller-defined node payload; the graph never inspects it.
#[derive(Debug, Clone)]
pub struct DualEdgeGraph<N = ()> {
    graph: StableDiGraph<NodeData<N>, EdgeData>,
    node_index: HashMap<String, NodeIndex>,
}

impl<N> Default for DualEdgeGraph<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Storage orientation of an edge. Electrical edges are canonicalized.
fn oriented<'a>(u: &'a str, v: &'a str, kind: EdgeKind) -> (&'a str, &'a str) {
    match kind {
        EdgeKind::Electrical if v < u => (v, u),
        _ => (u, v),
    }
}

impl<N> DualEdgeGraph<N> {
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::new(),
            node_index: HashMap::new(),
        }
    }

    /// Add a node. No-op returning `false` if the id already exists; the
    /// first payload wins.
    pub fn add_node(&mut self, id: &str, attrs: N) -> bool {
        if self.node_index.contains_key(id) {
            return false;
        }
        let idx = self.graph.add_node(NodeData {
            id: id.to_string(),
            attrs,
        });
        self.node_index.insert(id.to_string(), idx);
        true
    }

    /// Remove a node and every chemical and electrical edge touching it.
    /// Returns the node payload, or `None` if it was absent.
    pub fn remove_node(&mut self, id: &str) -> Option<N> {
        let idx = self.node_index.remove(id)?;
        self.graph.remove_node(idx).map(|data| data.attrs)
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn node_attrs(&self, id: &str) -> Option<&N> {
        let idx = *self.node_index.get(id)?;
        self.graph.node_weight(idx).map(|data| &data.attrs)
    }

    /// All node ids, sorted.
    pub fn nodes(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.node_index.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn find_edge(&self, u: &str, v: &str, kind: EdgeKind) -> Option<EdgeIndex> {
        let (a, b) = oriented(u, v, kind);
        let a_idx = *self.node_index.get(a)?;
        let b_idx = *self.node_index.get(b)?;
        self.graph
            .edges_directed(a_idx, Direction::Outgoing)
            .find(|e| e.target() == b_idx && e.weight().kind == kind)
            .map(|e| e.id())
    }

    pub fn has_edge(&self, u: &str, v: &str, kind: EdgeKind) -> bool {
        self.find_edge(u, v, kind).is_some()
    }

    /// Attributes of the edge `u → v` (or `u – v` for electrical).
    pub fn edge(&self, u: &str, v: &str, kind: EdgeKind) -> Option<&EdgeAttrs> {
        let idx = self.find_edge(u, v, kind)?;
        self.graph.edge_weight(idx).map(|data| &data.attrs)
    }

    /// Remove one edge, returning its attributes.
    pub fn remove_edge(&mut self, u: &str, v: &str, kind: EdgeKind) -> Option<EdgeAttrs> {
        let idx = self.find_edge(u, v, kind)?;
        self.graph.remove_edge(idx).map(|data| data.attrs)
    }

    fn snapshot_edge(&self, idx: EdgeIndex) -> Option<Edge> {
        let (a, b) = self.graph.edge_endpoints(idx)?;
        let data = self.graph.edge_weight(idx)?;
        Some(Edge {
            source: self.graph[a].id.clone(),
            target: self.graph[b].id.clone(),
            kind: data.kind,
            attrs: data.attrs.clone(),
        })
    }

    /// Edges of one kind, optionally restricted to those touching `node`.
    ///
    /// Each electrical pair is returned once, in storage orientation. The
    /// result is sorted by `(source, target)`. An absent `node` yields an
    /// empty list.
    pub fn edges(&self, kind: EdgeKind, node: Option<&str>) -> Vec<Edge> {
        let indices: Vec<EdgeIndex> = match node {
            None => self.graph.edge_indices().collect(),
            Some(id) => {
                let Some(&idx) = self.node_index.get(id) else {
                    return Vec::new();
                };
                let mut seen = HashSet::new();
                self.graph
                    .edges_directed(idx, Direction::Outgoing)
                    .chain(self.graph.edges_directed(idx, Direction::Incoming))
                    .map(|e| e.id())
                    .filter(|e| seen.insert(*e))
                    .collect()
            }
        };
        let mut edges: Vec<Edge> = indices
            .into_iter()
            .filter_map(|idx| self.snapshot_edge(idx))
            .filter(|e| e.kind == kind)
            .collect();
        edges.sort_by(|a, b| (&a.source, &a.target).cmp(&(&b.source, &b.target)));
        edges
    }

    /// Sorted ids adjacent to `id` through any edge of either kind.
    pub fn neighbors(&self, id: &str) -> Result<Vec<String>> {
        let idx = *self
            .node_index
            .get(id)
            .ok_or_else(|| NetworkError::UnknownNode(id.to_string()))?;
        let set: BTreeSet<String> = self
            .graph
            .neighbors_undirected(idx)
            .map(|n| self.graph[n].id.clone())
            .collect();
        Ok(set.into_iter().collect())
    }

    /// True if no edge of either kind touches `id`. A self-loop counts as
    /// adjacency.
    ///
    /// Fails with [`NetworkError::UnknownNode`] for an absent node.
    pub fn is_isolated(&self, id: &str) -> Result<bool> {
        let idx = *self
            .node_index
            .get(id)
            .ok_or_else(|| NetworkError::UnknownNode(id.to_string()))?;
        Ok(self.graph.neighbors_undirected(idx).next().is_none())
    }
}

impl<N: Default> DualEdgeGraph<N> {
    /// Ensure a node exists, creating it with a default payload.
    pub fn ensure_node(&mut self, id: &str) {
        if !self.node_index.contains_key(id) {
            self.add_node(id, N::default());
        }
    }

    /// Insert or replace the edge `u → v` (`u – v` for electrical). Missing
    /// endpoints are created. The attributes are copied.
    pub fn add_edge(&mut self, u: &str, v: &str, kind: EdgeKind, attrs: &EdgeAttrs) {
        if let Some(idx) = self.find_edge(u, v, kind) {
            self.graph[idx].attrs = attrs.clone();
            return;
        }
        self.insert_edge(u, v, kind, attrs.clone());
    }

    /// Like [`add_edge`](Self::add_edge) but folds into an existing edge with
    /// [`EdgeAttrs::merge`] instead of replacing it.
    pub fn merge_edge(&mut self, u: &str, v: &str, kind: EdgeKind, attrs: &EdgeAttrs) {
        if let Some(idx) = self.find_edge(u, v, kind) {
            self.graph[idx].attrs.merge(attrs);
            return;
        }
        self.insert_edge(u, v, kind, attrs.clone());
    }

    fn insert_edge(&mut self, u: &str, v: &str, kind: EdgeKind, attrs: EdgeAttrs) {
        let (a, b) = oriented(u, v, kind);
        self.ensure_node(a);
        self.ensure_node(b);
        let a_idx = self.node_index[a];
        let b_idx = self.node_index[b];
        self.graph.add_edge(a_idx, b_idx, EdgeData { kind, attrs });
    }
}

#[cfg(test)]
#[path = "../tests/rust/test_graph.rs"]
mod tests;
