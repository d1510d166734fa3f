//! GroupRegistry: user-created groups and the member → group index.
//!
//! The registry owns both directions of the mapping. Nothing outside this
//! module can touch a group's member list, so `parent` never drifts out of
//! sync with `members`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};

pub const DEFAULT_GROUP_NAME: &str = "Group";

// ─── Group ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub open: bool,
    members: Vec<String>,
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>, open: bool, members: Vec<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            open,
            members,
        }
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn has_member(&self, id: &str) -> bool {
        self.members.iter().any(|m| m == id)
    }
}

/// Arguments for [`GroupRegistry::create_group`].
#[derive(Debug, Clone, Default)]
pub struct GroupSpec {
    /// Explicit id; the smallest free integer is used when `None`.
    pub id: Option<String>,
    pub open: bool,
    pub name: Option<String>,
}

// ─── GroupRegistry ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupRegistry {
    groups: BTreeMap<String, Group>,
    parent: BTreeMap<String, String>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from stored groups, checking every invariant.
    pub fn from_groups(groups: Vec<Group>) -> Result<Self> {
        let mut registry = Self::new();
        for group in &groups {
            registry.create_group(GroupSpec {
                id: Some(group.id.clone()),
                open: group.open,
                name: Some(group.name.clone()),
            })?;
        }
        for group in groups {
            registry.add_members(&group.id, &group.members)?;
        }
        Ok(registry)
    }

    /// Smallest non-negative integer id not in use.
    pub fn next_id(&self) -> String {
        (0usize..)
            .map(|n| n.to_string())
            .find(|id| !self.groups.contains_key(id))
            .unwrap_or_default()
    }

    pub fn create_group(&mut self, spec: GroupSpec) -> Result<String> {
        let id = spec.id.unwrap_or_else(|| self.next_id());
        if self.groups.contains_key(&id) {
            return Err(NetworkError::DuplicateGroup(id));
        }
        if let Some(owner) = self.parent.get(&id) {
            return Err(NetworkError::AlreadyGrouped {
                member: id.clone(),
                group: owner.clone(),
            });
        }
        let name = spec.name.unwrap_or_else(|| DEFAULT_GROUP_NAME.to_string());
        self.groups
            .insert(id.clone(), Group::new(id.clone(), name, spec.open, Vec::new()));
        Ok(id)
    }

    /// Remove a group and release its members. Member positions are left
    /// alone.
    pub fn delete_group(&mut self, id: &str) -> Result<Group> {
        let group = self
            .groups
            .remove(id)
            .ok_or_else(|| NetworkError::UnknownGroup(id.to_string()))?;
        for member in &group.members {
            self.parent.remove(member);
        }
        Ok(group)
    }

    /// Append members. Ids already in this group are skipped.
    pub fn add_members(&mut self, id: &str, members: &[String]) -> Result<()> {
        if !self.groups.contains_key(id) {
            return Err(NetworkError::UnknownGroup(id.to_string()));
        }
        for member in members {
            self.check_can_join(id, member)?;
        }
        let group = self
            .groups
            .get_mut(id)
            .ok_or_else(|| NetworkError::UnknownGroup(id.to_string()))?;
        for member in members {
            if !group.has_member(member) {
                group.members.push(member.clone());
                self.parent.insert(member.clone(), id.to_string());
            }
        }
        Ok(())
    }

    fn check_can_join(&self, id: &str, member: &str) -> Result<()> {
        if self.groups.contains_key(member) {
            return Err(NetworkError::NestedGroup(member.to_string()));
        }
        match self.parent.get(member) {
            Some(owner) if owner != id => Err(NetworkError::AlreadyGrouped {
                member: member.to_string(),
                group: owner.clone(),
            }),
            _ => Ok(()),
        }
    }

    /// Remove members. Emptying a group does not delete it.
    pub fn remove_members(&mut self, id: &str, members: &[String]) -> Result<()> {
        let group = self
            .groups
            .get_mut(id)
            .ok_or_else(|| NetworkError::UnknownGroup(id.to_string()))?;
        if let Some(missing) = members.iter().find(|m| !group.has_member(m)) {
            return Err(NetworkError::NotAMember {
                member: missing.clone(),
                group: id.to_string(),
            });
        }
        group.members.retain(|m| !members.contains(m));
        for member in members {
            self.parent.remove(member);
        }
        Ok(())
    }

    /// Replace `old` by `replacements` at the same index in the member list.
    pub fn replace_member(&mut self, id: &str, old: &str, replacements: &[String]) -> Result<()> {
        for member in replacements {
            self.check_can_join(id, member)?;
        }
        let group = self
            .groups
            .get_mut(id)
            .ok_or_else(|| NetworkError::UnknownGroup(id.to_string()))?;
        if !group.has_member(old) {
            return Err(NetworkError::NotAMember {
                member: old.to_string(),
                group: id.to_string(),
            });
        }
        let members = std::mem::take(&mut group.members);
        let mut rebuilt = Vec::with_capacity(members.len() + replacements.len());
        for member in members {
            if member == old {
                for r in replacements {
                    if r != old && !rebuilt.contains(r) {
                        rebuilt.push(r.clone());
                    }
                }
            } else if !replacements.contains(&member) {
                rebuilt.push(member);
            }
        }
        group.members = rebuilt;
        self.parent.remove(old);
        for member in replacements.iter().filter(|r| *r != old) {
            self.parent.insert(member.clone(), id.to_string());
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&Group> {
        self.groups
            .get(id)
            .ok_or_else(|| NetworkError::UnknownGroup(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.groups.contains_key(id)
    }

    /// Group owning `member`, if any.
    pub fn parent(&self, member: &str) -> Option<&str> {
        self.parent.get(member).map(String::as_str)
    }

    pub fn is_member(&self, id: &str) -> bool {
        self.parent.contains_key(id)
    }

    /// Set the open flag. Returns `true` if it changed.
    pub fn set_open(&mut self, id: &str, open: bool) -> Result<bool> {
        let group = self
            .groups
            .get_mut(id)
            .ok_or_else(|| NetworkError::UnknownGroup(id.to_string()))?;
        let changed = group.open != open;
        group.open = open;
        Ok(changed)
    }

    pub fn rename(&mut self, id: &str, name: &str) -> Result<()> {
        let group = self
            .groups
            .get_mut(id)
            .ok_or_else(|| NetworkError::UnknownGroup(id.to_string()))?;
        group.name = name.to_string();
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn ids(&self) -> Vec<String> {
        self.groups.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_groups.rs"]
mod tests;
