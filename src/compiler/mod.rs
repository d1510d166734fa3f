//! NetworkCompiler: turns model state plus a raw connection list into
//! render records.
//!
//! Pipeline (each step in its own module):
//!   1. build  : transient [`DualEdgeGraph`] from input ids and connections
//!   2. filter : class/member display rules, orphan pruning
//!   3. merge  : group nodes; closed groups absorb their members' edges
//!   4. hide   : hidden nodes and members of hidden groups
//!   5. render : node and edge records
//!   6. place  : saved positions, grid for the rest, or a full layout
//!
//! [`compile`] is pure: identical arguments give identical output.

pub mod filter;
pub mod merge;
pub mod placement;
pub mod render;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalogue::Catalogue;
use crate::config::{DisplayOptions, LayoutKind};
use crate::error::Result;
use crate::graph::{DualEdgeGraph, EdgeKind};
use crate::layout::Position;
use crate::model::NetworkState;
use crate::provider::Connection;

pub use render::{AnnotationClass, ColorBuckets, EdgeRecord, NodeRecord};

/// What a rendered node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    #[default]
    Cell,
    Class,
    Group,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledNetwork {
    /// Groups first, then everything else, each by id.
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
    /// Ids removed because they are hidden.
    pub hidden: Vec<String>,
    pub positions: BTreeMap<String, Position>,
    pub hidden_positions: BTreeMap<String, Position>,
    pub layout: LayoutKind,
    pub run_layout: bool,
}

impl CompiledNetwork {
    pub fn node(&self, id: &str) -> Option<&NodeRecord> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    pub fn edge(&self, source: &str, target: &str, kind: EdgeKind) -> Option<&EdgeRecord> {
        let (source, target) = match kind {
            EdgeKind::Electrical if target < source => (target, source),
            _ => (source, target),
        };
        self.edges
            .iter()
            .find(|e| e.kind == kind && e.source == source && e.target == target)
    }
}

fn role_of(catalogue: &Catalogue, id: &str) -> NodeRole {
    if catalogue.is_class(id) {
        NodeRole::Class
    } else {
        NodeRole::Cell
    }
}

/// Step 1: input nodes plus both endpoints of every connection.
pub fn build_graph(
    connections: &[Connection],
    state: &NetworkState,
    catalogue: &Catalogue,
) -> DualEdgeGraph<NodeRole> {
    let mut graph = DualEdgeGraph::new();
    for id in &state.input {
        graph.add_node(id, role_of(catalogue, id));
    }
    for connection in connections {
        let pre = connection.pre.to_uppercase();
        let post = connection.post.to_uppercase();
        graph.add_node(&pre, role_of(catalogue, &pre));
        graph.add_node(&post, role_of(catalogue, &post));
        graph.merge_edge(&pre, &post, connection.kind, &connection.attrs());
    }
    graph
}

pub fn compile(
    connections: &[Connection],
    options: &DisplayOptions,
    state: &NetworkState,
    catalogue: &Catalogue,
) -> Result<CompiledNetwork> {
    let mut graph = build_graph(connections, state, catalogue);
    filter::filter_nodes(&mut graph, options, state, catalogue)?;
    let shown: BTreeSet<String> = graph.nodes().into_iter().collect();
    let mut parents = merge::materialize_groups(&mut graph, &state.groups);
    let hidden = merge::hide_nodes(&mut graph, state, &mut parents)?;

    // ── Render records ──
    let mut nodes = Vec::new();
    for id in graph.nodes() {
        let role = graph.node_attrs(&id).copied().unwrap_or_default();
        nodes.push(node_record(&id, role, options, state, catalogue, &parents, &shown));
    }
    nodes.sort_by(|a, b| {
        (a.role != NodeRole::Group, &a.id).cmp(&(b.role != NodeRole::Group, &b.id))
    });

    let mut edges: Vec<EdgeRecord> = [EdgeKind::Chemical, EdgeKind::Electrical]
        .into_iter()
        .flat_map(|kind| graph.edges(kind, None))
        .map(|edge| EdgeRecord::from_edge(edge, options))
        .collect();
    edges.sort_by(|a, b| {
        (&a.source, &a.target, a.kind).cmp(&(&b.source, &b.target, b.kind))
    });

    // ── Positions ──
    // Open groups are compound nodes; the renderer sizes them from members.
    let placeable: Vec<String> = nodes
        .iter()
        .filter(|n| !(n.role == NodeRole::Group && n.open))
        .map(|n| n.id.clone())
        .collect();
    let placement = placement::resolve(&placeable, &state.positions);
    let hidden_positions = hidden
        .iter()
        .filter_map(|id| state.positions.get(id).map(|p| (id.clone(), p)))
        .collect();

    tracing::debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        hidden = hidden.len(),
        run_layout = placement.run_layout,
        "compiled network"
    );

    Ok(CompiledNetwork {
        nodes,
        edges,
        hidden: hidden.into_iter().collect(),
        positions: placement.positions,
        hidden_positions,
        layout: options.layout,
        run_layout: placement.run_layout,
    })
}

fn node_record(
    id: &str,
    role: NodeRole,
    options: &DisplayOptions,
    state: &NetworkState,
    catalogue: &Catalogue,
    parents: &BTreeMap<String, String>,
    shown: &BTreeSet<String>,
) -> NodeRecord {
    let (name, open, members, color) = match state.groups.get(id) {
        Ok(group) if role == NodeRole::Group => {
            // Only members that survived filtering tint the group.
            let codes = group
                .members()
                .iter()
                .filter(|m| shown.contains(*m))
                .map(|m| render::color_code(catalogue, m, options.node_color));
            (
                group.name.clone(),
                group.open,
                group.members().to_vec(),
                render::color_buckets(codes),
            )
        }
        _ => (
            catalogue.name(id),
            false,
            Vec::new(),
            render::color_buckets([render::color_code(catalogue, id, options.node_color)]),
        ),
    };
    NodeRecord {
        id: id.to_string(),
        name,
        role,
        parent: parents.get(id).cloned(),
        color,
        input: state.input.iter().any(|i| i == id),
        selected: state.selected.iter().any(|s| s == id),
        locked: state.positions.is_locked(id),
        open,
        members,
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_compiler.rs"]
mod tests;
