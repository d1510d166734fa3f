//! Group materialization and hiding.
//!
//! Closed groups swallow their members: every member edge is re-homed onto
//! the group id and edges that land on the same (source, target, kind)
//! are merged. Open groups only become compound parents.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::error::Result;
use crate::graph::{DualEdgeGraph, EdgeKind};
use crate::model::NetworkState;
use crate::model::groups::GroupRegistry;

use super::NodeRole;
use super::filter::prune_orphans;

/// Move every edge of `member` onto `group_id` and drop `member`.
pub fn collapse_member(graph: &mut DualEdgeGraph<NodeRole>, member: &str, group_id: &str) {
    for kind in [EdgeKind::Chemical, EdgeKind::Electrical] {
        for edge in graph.edges(kind, Some(member)) {
            let source = if edge.source == member { group_id } else { edge.source.as_str() };
            let target = if edge.target == member { group_id } else { edge.target.as_str() };
            graph.merge_edge(source, target, kind, &edge.attrs);
        }
    }
    graph.remove_node(member);
}

/// Insert group nodes for every group with a member in the graph.
///
/// Returns the compound parent of each member of an open group.
pub fn materialize_groups(
    graph: &mut DualEdgeGraph<NodeRole>,
    groups: &GroupRegistry,
) -> BTreeMap<String, String> {
    let mut parents = BTreeMap::new();
    for group in groups.iter() {
        let present: Vec<String> = group
            .members()
            .iter()
            .filter(|m| graph.has_node(m))
            .cloned()
            .collect();
        if present.is_empty() {
            continue;
        }
        graph.add_node(&group.id, NodeRole::Group);
        for member in present {
            if group.open {
                parents.insert(member, group.id.clone());
            } else {
                collapse_member(graph, &member, &group.id);
            }
        }
    }
    parents
}

/// Remove hidden nodes (and the members of hidden groups).
///
/// Returns the ids that were actually removed. Open groups left without
/// members and non-input nodes left without edges go too.
pub fn hide_nodes(
    graph: &mut DualEdgeGraph<NodeRole>,
    state: &NetworkState,
    parents: &mut BTreeMap<String, String>,
) -> Result<BTreeSet<String>> {
    let mut hidden = BTreeSet::new();
    for id in &state.hidden {
        if graph.remove_node(id).is_some() {
            hidden.insert(id.clone());
        }
        if let Ok(group) = state.groups.get(id) {
            for member in group.members() {
                if graph.remove_node(member).is_some() {
                    hidden.insert(member.clone());
                }
            }
        }
    }
    if hidden.is_empty() {
        return Ok(hidden);
    }

    parents.retain(|member, _| graph.has_node(member));
    let occupied: BTreeSet<&String> = parents.values().collect();
    for group in state.groups.iter().filter(|g| g.open) {
        if graph.has_node(&group.id) && !occupied.contains(&group.id) {
            graph.remove_node(&group.id);
        }
    }

    let input: HashSet<&str> = state.input.iter().map(String::as_str).collect();
    prune_orphans(graph, &input)?;
    parents.retain(|member, _| graph.has_node(member));
    Ok(hidden)
}
