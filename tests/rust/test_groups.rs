use super::*;

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

// ── Creation and ids ──────────────────────────────────────────────────────

#[test]
fn test_create_allocates_smallest_free_id() {
    let mut reg = GroupRegistry::new();
    assert_eq!(reg.create_group(GroupSpec::default()).unwrap(), "0");
    assert_eq!(reg.create_group(GroupSpec::default()).unwrap(), "1");
    reg.delete_group("0").unwrap();
    assert_eq!(reg.create_group(GroupSpec::default()).unwrap(), "0");
    assert_eq!(reg.create_group(GroupSpec::default()).unwrap(), "2");
}

#[test]
fn test_create_defaults() {
    let mut reg = GroupRegistry::new();
    let id = reg.create_group(GroupSpec::default()).unwrap();
    let group = reg.get(&id).unwrap();
    assert_eq!(group.name, DEFAULT_GROUP_NAME);
    assert!(!group.open);
    assert!(group.members().is_empty());
}

#[test]
fn test_create_duplicate_id_fails() {
    let mut reg = GroupRegistry::new();
    let spec = GroupSpec {
        id: Some("g".into()),
        ..GroupSpec::default()
    };
    reg.create_group(spec.clone()).unwrap();
    assert!(matches!(
        reg.create_group(spec),
        Err(NetworkError::DuplicateGroup(id)) if id == "g"
    ));
}

// ── Membership ────────────────────────────────────────────────────────────

#[test]
fn test_parent_index_follows_members() {
    let mut reg = GroupRegistry::new();
    let id = reg.create_group(GroupSpec::default()).unwrap();
    reg.add_members(&id, &ids(&["X", "Y"])).unwrap();
    assert_eq!(reg.parent("X"), Some("0"));
    assert_eq!(reg.parent("Y"), Some("0"));

    reg.remove_members(&id, &ids(&["X"])).unwrap();
    assert_eq!(reg.parent("X"), None);
    assert_eq!(reg.get(&id).unwrap().members(), ["Y"]);

    reg.remove_members(&id, &ids(&["Y"])).unwrap();
    // Emptied but not deleted.
    assert!(reg.contains(&id));
    assert!(reg.get(&id).unwrap().members().is_empty());
}

#[test]
fn test_add_members_skips_duplicates() {
    let mut reg = GroupRegistry::new();
    let id = reg.create_group(GroupSpec::default()).unwrap();
    reg.add_members(&id, &ids(&["X", "Y"])).unwrap();
    reg.add_members(&id, &ids(&["Y", "Z"])).unwrap();
    assert_eq!(reg.get(&id).unwrap().members(), ["X", "Y", "Z"]);
}

#[test]
fn test_member_of_other_group_rejected() {
    let mut reg = GroupRegistry::new();
    let a = reg.create_group(GroupSpec::default()).unwrap();
    let b = reg.create_group(GroupSpec::default()).unwrap();
    reg.add_members(&a, &ids(&["X"])).unwrap();
    let err = reg.add_members(&b, &ids(&["Y", "X"])).unwrap_err();
    assert!(matches!(err, NetworkError::AlreadyGrouped { .. }));
    // Nothing was added on failure.
    assert!(reg.get(&b).unwrap().members().is_empty());
    assert_eq!(reg.parent("Y"), None);
}

#[test]
fn test_nesting_rejected() {
    let mut reg = GroupRegistry::new();
    let a = reg.create_group(GroupSpec::default()).unwrap();
    let b = reg.create_group(GroupSpec::default()).unwrap();
    assert!(matches!(
        reg.add_members(&a, &[b.clone()]),
        Err(NetworkError::NestedGroup(id)) if id == b
    ));
}

#[test]
fn test_remove_non_member_fails() {
    let mut reg = GroupRegistry::new();
    let id = reg.create_group(GroupSpec::default()).unwrap();
    assert!(matches!(
        reg.remove_members(&id, &ids(&["X"])),
        Err(NetworkError::NotAMember { .. })
    ));
    assert!(matches!(
        reg.remove_members("nope", &ids(&["X"])),
        Err(NetworkError::UnknownGroup(_))
    ));
}

#[test]
fn test_delete_clears_parent() {
    let mut reg = GroupRegistry::new();
    let id = reg.create_group(GroupSpec::default()).unwrap();
    reg.add_members(&id, &ids(&["X", "Y"])).unwrap();
    let removed = reg.delete_group(&id).unwrap();
    assert_eq!(removed.members(), ["X", "Y"]);
    assert!(!reg.is_member("X"));
    assert!(reg.is_empty());
}

#[test]
fn test_replace_member_in_place() {
    let mut reg = GroupRegistry::new();
    let id = reg.create_group(GroupSpec::default()).unwrap();
    reg.add_members(&id, &ids(&["A", "ADA", "B"])).unwrap();
    reg.replace_member(&id, "ADA", &ids(&["ADAL", "ADAR"])).unwrap();
    assert_eq!(reg.get(&id).unwrap().members(), ["A", "ADAL", "ADAR", "B"]);
    assert_eq!(reg.parent("ADAL"), Some("0"));
    assert_eq!(reg.parent("ADA"), None);
}

#[test]
fn test_set_open_reports_change() {
    let mut reg = GroupRegistry::new();
    let id = reg.create_group(GroupSpec::default()).unwrap();
    assert!(!reg.set_open(&id, false).unwrap());
    assert!(reg.set_open(&id, true).unwrap());
    assert!(reg.get(&id).unwrap().open);
}

#[test]
fn test_from_groups_roundtrip() {
    let groups = vec![
        Group::new("3", "Sensory", true, ids(&["ASEL", "ASER"])),
        Group::new("0", "Group", false, ids(&["AIY"])),
    ];
    let reg = GroupRegistry::from_groups(groups).unwrap();
    assert_eq!(reg.ids(), ["0", "3"]);
    assert_eq!(reg.parent("ASER"), Some("3"));
    assert_eq!(reg.next_id(), "1");
}

#[test]
fn test_from_groups_rejects_shared_member() {
    let groups = vec![
        Group::new("0", "A", false, ids(&["X"])),
        Group::new("1", "B", false, ids(&["X"])),
    ];
    assert!(GroupRegistry::from_groups(groups).is_err());
}
