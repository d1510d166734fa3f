//! Property tests: invariants that must survive any sequence of user
//! operations.

use std::collections::BTreeSet;

use connectome_scene::{
    Catalogue, CellInfo, Connection, DualEdgeGraph, EdgeAttrs, EdgeKind, Model, StaticConnections,
};
use proptest::prelude::*;

const CELLS: [&str; 7] = ["ADA", "ADAL", "ADAR", "AIB", "AIBL", "AIBR", "AVM"];

fn catalogue() -> Catalogue {
    Catalogue::from_parts(
        vec![
            CellInfo::class("ADA"),
            CellInfo::cell("ADAL", Some("ADA")),
            CellInfo::cell("ADAR", Some("ADA")),
            CellInfo::class("AIB"),
            CellInfo::cell("AIBL", Some("AIB")),
            CellInfo::cell("AIBR", Some("AIB")),
            CellInfo::cell("AVM", None),
        ],
        vec![],
    )
}

fn connections() -> Vec<Connection> {
    let mut out = Vec::new();
    for (i, pre) in CELLS.iter().enumerate() {
        for post in CELLS.iter().skip(i + 1) {
            out.push(Connection::new(*pre, *post, EdgeKind::Chemical).with_synapses("d1", 4));
            out.push(Connection::new(*post, *pre, EdgeKind::Electrical).with_synapses("d1", 3));
        }
    }
    out
}

#[derive(Debug, Clone)]
enum Op {
    Select(Vec<usize>),
    Group,
    Ungroup(usize),
    Hide,
    Unhide(usize),
    Split,
    Join,
    Open(usize),
    Close(usize),
    AddInput(Vec<usize>),
    SetInput(Vec<usize>),
}

fn id_strategy() -> impl Strategy<Value = usize> {
    // Indices past the catalogue address group ids "0".."2".
    0usize..CELLS.len() + 3
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::collection::vec(id_strategy(), 1..4).prop_map(Op::Select),
        Just(Op::Group),
        id_strategy().prop_map(Op::Ungroup),
        Just(Op::Hide),
        id_strategy().prop_map(Op::Unhide),
        Just(Op::Split),
        Just(Op::Join),
        id_strategy().prop_map(Op::Open),
        id_strategy().prop_map(Op::Close),
        prop::collection::vec(id_strategy(), 1..3).prop_map(Op::AddInput),
        prop::collection::vec(id_strategy(), 0..4).prop_map(Op::SetInput),
    ]
}

fn id_at(index: usize) -> String {
    match CELLS.get(index) {
        Some(cell) => cell.to_string(),
        None => (index - CELLS.len()).to_string(),
    }
}

/// Apply `op`, ignoring rejected operations: a rejection must leave the
/// invariants intact just like a success.
fn apply(model: &mut Model, op: &Op) {
    let ids_at = |indices: &[usize]| -> Vec<String> { indices.iter().map(|&i| id_at(i)).collect() };
    let _ = match op {
        Op::Select(indices) => {
            model.clear_selection();
            model.select(&ids_at(indices));
            Ok(())
        }
        Op::Group => model.group_selected().map(|_| ()),
        Op::Ungroup(i) => model.ungroup(&id_at(*i)),
        Op::Hide => model.hide_selected(),
        Op::Unhide(i) => model.unhide(&[id_at(*i)]),
        Op::Split => model.split_selected(),
        Op::Join => model.join_selected(),
        Op::Open(i) => model.open_group(&id_at(*i)),
        Op::Close(i) => model.close_group(&id_at(*i)),
        Op::AddInput(indices) => model.add_input(&ids_at(indices)),
        Op::SetInput(indices) => model.set_input(&ids_at(indices)),
    };
}

fn assert_invariants(model: &Model) -> Result<(), TestCaseError> {
    let groups = model.groups();
    let mut seen = BTreeSet::new();
    for group in groups.iter() {
        for member in group.members() {
            prop_assert!(seen.insert(member.clone()), "{} is in two groups", member);
            prop_assert!(!groups.contains(member), "group {} is nested", member);
            prop_assert_eq!(groups.parent(member), Some(group.id.as_str()));
        }
    }
    let split = model.split_classes();
    prop_assert!(
        split.intersection(model.joined_classes()).next().is_none(),
        "class both split and joined"
    );
    let catalogue = model.catalogue();
    for id in model.input() {
        if let Some(class) = catalogue.class_of(id) {
            prop_assert!(
                !model.input().iter().any(|i| i == class),
                "{} is in the input next to its class {}",
                id,
                class
            );
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn electrical_edges_are_stored_once(pairs in prop::collection::vec((0usize..5, 0usize..5), 1..20)) {
        let mut graph: DualEdgeGraph = DualEdgeGraph::new();
        let attrs = EdgeAttrs::new().with_synapses([("d1", 1)]);
        let mut expected = BTreeSet::new();
        for (a, b) in &pairs {
            let (u, v) = (CELLS[*a], CELLS[*b]);
            graph.merge_edge(u, v, EdgeKind::Electrical, &attrs);
            expected.insert(if u <= v { (u, v) } else { (v, u) });
        }
        let edges = graph.edges(EdgeKind::Electrical, None);
        prop_assert_eq!(edges.len(), expected.len());
        for edge in &edges {
            prop_assert!(edge.source <= edge.target);
            prop_assert!(graph.has_edge(&edge.target, &edge.source, EdgeKind::Electrical));
        }
        let total: u32 = edges.iter().map(|e| e.attrs.synapses["d1"]).sum();
        prop_assert_eq!(total as usize, pairs.len());
    }

    #[test]
    fn operations_keep_groups_and_classes_consistent(ops in prop::collection::vec(op_strategy(), 1..30)) {
        let mut model = Model::new(catalogue());
        model.set_input(&["ADA".to_string(), "AVM".to_string(), "AIBL".to_string()]).unwrap();
        for op in &ops {
            apply(&mut model, op);
            assert_invariants(&model)?;
        }
    }

    #[test]
    fn compile_output_is_closed_and_stable(ops in prop::collection::vec(op_strategy(), 0..20)) {
        let provider = StaticConnections::new(connections());
        let mut model = Model::new(catalogue());
        model.set_input(&["ADA".to_string(), "AVM".to_string()]).unwrap();
        for op in &ops {
            apply(&mut model, op);
        }

        let first = model.update(&provider).unwrap().clone();
        let ids: BTreeSet<&str> = first.node_ids().into_iter().collect();
        for id in &ids {
            if let Some(class) = model.catalogue().class_of(id) {
                prop_assert!(!ids.contains(class), "{} is shown next to its class {}", id, class);
            }
        }
        for edge in &first.edges {
            prop_assert!(ids.contains(edge.source.as_str()));
            prop_assert!(ids.contains(edge.target.as_str()));
        }
        for hidden in &first.hidden {
            prop_assert!(!ids.contains(hidden.as_str()));
        }
        let second = model.update(&provider).unwrap();
        prop_assert_eq!(&first, second);
    }
}
