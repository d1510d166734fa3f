//! Filter step: decide which fetched nodes stay in the scene.
//!
//! Input nodes always stay. Every other node is checked against the
//! class/member display rules, then nodes left without any edge are pruned.

use std::collections::HashSet;

use crate::catalogue::Catalogue;
use crate::config::DisplayOptions;
use crate::error::Result;
use crate::graph::{DualEdgeGraph, EdgeKind};
use crate::model::NetworkState;

use super::NodeRole;

/// Whether a node that is not in the input survives the display rules.
///
/// A class and its members are never shown together: a cell is dropped
/// when its class is in the input or joined, a class is dropped when one of
/// its members is in the input or it is split. Otherwise the split/joined
/// overrides win over the `show_individual` default.
pub fn keep_node(
    id: &str,
    input: &HashSet<&str>,
    options: &DisplayOptions,
    state: &NetworkState,
    catalogue: &Catalogue,
) -> bool {
    let toggles = options.toggles;
    if !toggles.show_postemb && catalogue.is_postembryonic(id) {
        return false;
    }
    if let Some(class) = catalogue.class_of(id) {
        if input.contains(class) || state.joined.contains(class) {
            return false;
        }
        return state.split.contains(class) || toggles.show_individual;
    }
    if catalogue.is_class(id) && catalogue.has_members(id) {
        let member_in_input = catalogue
            .members_of(id)
            .iter()
            .any(|m| input.contains(m.as_str()));
        if member_in_input || state.split.contains(id) {
            return false;
        }
        return state.joined.contains(id) || !toggles.show_individual;
    }
    true
}

/// Apply the display rules, drop unlinked edges when `show_linked` is off,
/// then prune orphans.
pub fn filter_nodes(
    graph: &mut DualEdgeGraph<NodeRole>,
    options: &DisplayOptions,
    state: &NetworkState,
    catalogue: &Catalogue,
) -> Result<()> {
    let input: HashSet<&str> = state.input.iter().map(String::as_str).collect();

    for id in graph.nodes() {
        if !input.contains(id.as_str()) && !keep_node(&id, &input, options, state, catalogue) {
            graph.remove_node(&id);
        }
    }

    if !options.toggles.show_linked {
        for kind in [EdgeKind::Chemical, EdgeKind::Electrical] {
            for edge in graph.edges(kind, None) {
                if !input.contains(edge.source.as_str()) && !input.contains(edge.target.as_str()) {
                    graph.remove_edge(&edge.source, &edge.target, kind);
                }
            }
        }
    }

    prune_orphans(graph, &input)
}

/// Remove every non-input, non-group node that has no edge left.
pub fn prune_orphans(graph: &mut DualEdgeGraph<NodeRole>, input: &HashSet<&str>) -> Result<()> {
    for id in graph.nodes() {
        if input.contains(id.as_str()) || graph.node_attrs(&id) == Some(&NodeRole::Group) {
            continue;
        }
        if graph.is_isolated(&id)? {
            graph.remove_node(&id);
        }
    }
    Ok(())
}
