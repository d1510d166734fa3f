use super::*;
use crate::fixtures::{catalogue, chemical, ids};
use crate::model::groups::GroupSpec;
use crate::notices::NoticeKind;
use crate::provider::StaticConnections;

fn model_with_input(input: &[&str]) -> Model {
    let mut model = Model::new(catalogue());
    model.set_input(&ids(input)).unwrap();
    model
}

// ── split ─────────────────────────────────────────────────────────────────

#[test]
fn test_split_replaces_class_in_place() {
    let mut model = model_with_input(&["AVM", "ADA", "AIB"]);
    model.select(&ids(&["ADA"]));
    model.split_selected().unwrap();

    assert_eq!(model.input(), ["AVM", "ADAL", "ADAR", "AIB"]);
    assert!(model.split_classes().contains("ADA"));
    assert_eq!(model.selected_raw(), ["ADAL", "ADAR"]);
}

#[test]
fn test_split_several_classes_in_one_pass() {
    let mut model = model_with_input(&["ADA", "AVM", "AIB"]);
    model.split(&ids(&["AIB", "ADA"])).unwrap();
    assert_eq!(model.input(), ["ADAL", "ADAR", "AVM", "AIBL", "AIBR"]);
}

#[test]
fn test_split_skips_individual_cells() {
    let mut model = model_with_input(&["AVM", "ADAL"]);
    model.split(&ids(&["AVM", "ADAL"])).unwrap();
    assert_eq!(model.input(), ["AVM", "ADAL"]);
    assert!(!model.split_classes().contains("AVM"));
}

#[test]
fn test_split_unsupported_class_warns() {
    let mut model = model_with_input(&["BWM", "ADA"]);
    model.options_mut().datasets = ids(&["d1"]);
    model.take_notices();
    model.split(&ids(&["BWM", "ADA"])).unwrap();

    let notices = model.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::SplitUnsupported);
    assert_eq!(notices[0].cells, ["BWM"]);
    assert_eq!(model.input(), ["BWM", "ADAL", "ADAR"]);
    assert!(!model.split_classes().contains("BWM"));
}

#[test]
fn test_split_places_members_in_circle() {
    let mut model = model_with_input(&["RME"]);
    model.lock_positions([("RME".to_string(), Position::new(0.0, 0.0))]);
    model.split(&ids(&["RME"])).unwrap();

    // RMED leads, so the four members form a diamond.
    assert_eq!(model.position("RMED").unwrap(), Position::new(0.0, -50.0));
    assert_eq!(model.position("RMEV").unwrap(), Position::new(0.0, 50.0));
    assert_eq!(model.locked_positions(), ["RME", "RMED", "RMEL", "RMER", "RMEV"]);
}

#[test]
fn test_split_replaces_class_in_group() {
    let mut model = model_with_input(&["ADA", "AVM"]);
    let group = model.group(&ids(&["AVM", "ADA"])).unwrap().unwrap();
    model.split(&ids(&["ADA"])).unwrap();
    assert_eq!(
        model.groups().get(&group).unwrap().members(),
        ["AVM", "ADAL", "ADAR"]
    );
    assert_eq!(model.groups().parent("ADAR"), Some(group.as_str()));
}

// ── join ──────────────────────────────────────────────────────────────────

#[test]
fn test_join_replaces_members_with_class() {
    let mut model = model_with_input(&["AVM", "ADAL", "ADAR"]);
    assert!(model.split_classes().contains("ADA"));
    model.select(&ids(&["ADAR", "ADAL", "ADA"]));
    model.join_selected().unwrap();

    assert_eq!(model.input(), ["AVM", "ADA"]);
    assert!(!model.split_classes().contains("ADA"));
    assert!(!model.joined_classes().contains("ADA"));
    assert_eq!(model.selected_raw(), ["ADA"]);
}

#[test]
fn test_join_marks_joined_only_against_individual_default() {
    let mut model = model_with_input(&["AVM"]);
    model.join(&ids(&["AIBL"])).unwrap();
    assert!(model.joined_classes().is_empty());

    model.options_mut().toggles.show_individual = true;
    model.join(&ids(&["AIBL"])).unwrap();
    assert!(model.joined_classes().contains("AIB"));
    assert_eq!(model.input(), ["AVM"]);
}

#[test]
fn test_join_positions_class_at_member_mean() {
    let mut model = model_with_input(&["ADAL", "ADAR"]);
    model.set_positions([
        ("ADAL".to_string(), Position::new(0.0, 0.0)),
        ("ADAR".to_string(), Position::new(10.0, 0.0)),
    ]);
    model.join(&ids(&["ADAL"])).unwrap();
    assert_eq!(model.position("ADA").unwrap(), Position::new(5.0, 0.0));
    assert!(!model.positions().is_locked("ADA"));

    let mut model = model_with_input(&["ADAL", "ADAR"]);
    model.set_position("ADAL", Position::new(0.0, 0.0));
    model.lock_positions([("AVM".to_string(), Position::new(9.0, 9.0))]);
    model.join(&ids(&["ADAL"])).unwrap();
    assert!(model.positions().is_locked("ADA"));
}

#[test]
fn test_join_unhides_members_and_class() {
    let mut model = model_with_input(&["ADAL", "ADAR"]);
    model.state.hidden.extend(ids(&["ADAR", "ADA"]));
    model.join(&ids(&["ADAL"])).unwrap();
    assert!(model.hidden().is_empty());
}

#[test]
fn test_join_folds_into_first_group() {
    let mut model = model_with_input(&["ADAL", "ADAR", "AVM"]);
    let first = model.group(&ids(&["AVM", "ADAL"])).unwrap().unwrap();
    let second = model.create_group(GroupSpec::default()).unwrap();
    model.add_members_to_group(&second, &ids(&["ADAR"])).unwrap();

    model.join(&ids(&["ADAL", "ADAR"])).unwrap();
    assert_eq!(model.groups().get(&first).unwrap().members(), ["AVM", "ADA"]);
    assert!(!model.groups().contains(&second));
    assert_eq!(model.groups().parent("ADA"), Some(first.as_str()));
}

// ── round trip ────────────────────────────────────────────────────────────

#[test]
fn test_split_then_join_restores_state() {
    let mut model = model_with_input(&["AVM", "ADA"]);
    let split_before = model.split_classes().clone();
    let joined_before = model.joined_classes().clone();

    model.select(&ids(&["ADA"]));
    model.split_selected().unwrap();
    model.join_selected().unwrap();

    assert_eq!(model.split_classes(), &split_before);
    assert_eq!(model.joined_classes(), &joined_before);
    assert_eq!(model.input(), ["AVM", "ADA"]);
}

#[test]
fn test_join_then_split_restores_state() {
    let mut model = model_with_input(&["ADAL", "ADAR"]);
    let split_before = model.split_classes().clone();

    model.join(&ids(&["ADAL"])).unwrap();
    model.split_selected().unwrap();

    assert_eq!(model.split_classes(), &split_before);
    assert!(model.joined_classes().is_empty());
    assert_eq!(model.input(), ["ADAL", "ADAR"]);
}

// ── display default ───────────────────────────────────────────────────────

fn ada_connections() -> StaticConnections {
    StaticConnections::new(vec![chemical("AVM", "ADA", 5), chemical("AVM", "ADAL", 5)])
}

#[test]
fn test_split_joined_class_after_default_changes() {
    let mut model = model_with_input(&["AVM"]);
    model.options_mut().toggles.show_individual = true;
    model.join(&ids(&["ADAL"])).unwrap();
    assert!(model.joined_classes().contains("ADA"));

    model.options_mut().toggles.show_individual = false;
    model.select(&ids(&["ADA"]));
    model.split_selected().unwrap();
    assert!(!model.joined_classes().contains("ADA"));
    assert!(model.split_classes().contains("ADA"));

    model.take_notices();
    let network = model.update(&ada_connections()).unwrap();
    assert_eq!(network.node_ids(), ["ADAL", "AVM"]);
    assert!(model.take_notices().is_empty());
}

#[test]
fn test_split_with_individual_default_clears_joined() {
    let mut model = model_with_input(&["AVM"]);
    model.options_mut().toggles.show_individual = true;
    model.state.joined.insert("ADA".into());
    model.split(&ids(&["ADA"])).unwrap();

    assert!(model.joined_classes().is_empty());
    assert!(model.split_classes().is_empty());
    let network = model.update(&ada_connections()).unwrap();
    assert_eq!(network.node_ids(), ["ADAL", "AVM"]);
}

#[test]
fn test_join_split_class_with_individual_default() {
    let mut model = model_with_input(&["AVM"]);
    model.options_mut().toggles.show_individual = true;
    model.state.split.insert("ADA".into());
    model.join(&ids(&["ADAL"])).unwrap();

    assert!(model.split_classes().is_empty());
    assert!(model.joined_classes().contains("ADA"));
    let network = model.update(&ada_connections()).unwrap();
    assert_eq!(network.node_ids(), ["ADA", "AVM"]);
}

#[test]
fn test_round_trip_with_individual_default() {
    let mut model = model_with_input(&["AVM"]);
    model.options_mut().toggles.show_individual = true;
    model.join(&ids(&["ADAL"])).unwrap();
    let split_before = model.split_classes().clone();
    let joined_before = model.joined_classes().clone();

    model.split_selected().unwrap();
    model.join_selected().unwrap();
    assert_eq!(model.split_classes(), &split_before);
    assert_eq!(model.joined_classes(), &joined_before);
}
