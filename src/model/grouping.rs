//! Group operations that touch more than the registry: positions,
//! selection and hidden state follow the group.

use crate::error::{NetworkError, Result};
use crate::layout::{Position, centered_grid, circle_positions};
use crate::model::groups::{Group, GroupSpec};

use super::Model;

impl Model {
    pub fn create_group(&mut self, spec: GroupSpec) -> Result<String> {
        let id = self.state.groups.create_group(spec)?;
        tracing::debug!(group = %id, "created group");
        Ok(id)
    }

    pub fn add_members_to_group(&mut self, id: &str, members: &[String]) -> Result<()> {
        self.state.groups.add_members(id, members)
    }

    pub fn remove_members_from_group(&mut self, id: &str, members: &[String]) -> Result<()> {
        self.state.groups.remove_members(id, members)
    }

    pub fn rename_group(&mut self, id: &str, name: &str) -> Result<()> {
        self.state.groups.rename(id, name)
    }

    /// Delete a group along with its position, lock, hidden and selected
    /// entries, so a reused id starts clean.
    pub fn delete_group(&mut self, id: &str) -> Result<Group> {
        let group = self.state.groups.delete_group(id)?;
        self.state.positions.remove_positions(Some(&[id.to_string()]));
        self.state.hidden.remove(id);
        self.state.selected.retain(|s| s != id);
        tracing::debug!(group = %id, "deleted group");
        Ok(group)
    }

    /// Put `ids` into one group.
    ///
    /// Group ids and members of a group name the target group; every other
    /// id is added to it. Without a target a new group is created at the
    /// mean position of the added ids. Returns the group id, or `None` if
    /// there was nothing to add. Ids implicating two different groups are
    /// rejected.
    pub fn group(&mut self, ids: &[String]) -> Result<Option<String>> {
        let mut target: Option<String> = None;
        let mut plain: Vec<String> = Vec::new();
        for id in ids {
            let implicated = if self.state.groups.contains(id) {
                Some(id.clone())
            } else {
                self.state.groups.parent(id).map(str::to_string)
            };
            match (implicated, &target) {
                (Some(group), Some(current)) if group != *current => {
                    return Err(NetworkError::AmbiguousGroup {
                        first: current.clone(),
                        second: group,
                    });
                }
                (Some(group), _) => target = Some(group),
                (None, _) => {
                    if !plain.contains(id) {
                        plain.push(id.clone());
                    }
                }
            }
        }
        if plain.is_empty() {
            return Ok(None);
        }

        let group_id = match target {
            Some(group) => group,
            None => {
                let group = self.create_group(GroupSpec::default())?;
                let placed: Vec<Position> = plain
                    .iter()
                    .filter_map(|id| self.state.positions.get(id))
                    .collect();
                if let Some(center) = Position::mean(&placed) {
                    if plain.iter().any(|id| self.state.positions.is_locked(id)) {
                        self.lock_positions([(group.clone(), center)]);
                    } else {
                        self.state.positions.set_position(&group, center);
                    }
                }
                group
            }
        };
        self.state.groups.add_members(&group_id, &plain)?;
        Ok(Some(group_id))
    }

    /// Group the raw selection; the new or extended group becomes the
    /// selection.
    pub fn group_selected(&mut self) -> Result<Option<String>> {
        let selected = self.state.selected.clone();
        let group = self.group(&selected)?;
        if let Some(id) = &group {
            self.state.selected = vec![id.clone()];
        }
        Ok(group)
    }

    /// Ungroup a member or dissolve a whole group.
    ///
    /// A member leaves its group; a group emptied that way is deleted. A
    /// group id places its members in a circle around the group's position,
    /// selects them if the group was closed, and is deleted.
    pub fn ungroup(&mut self, id: &str) -> Result<()> {
        if let Some(owner) = self.state.groups.parent(id).map(str::to_string) {
            self.state.groups.remove_members(&owner, &[id.to_string()])?;
            if self.state.groups.get(&owner)?.members().is_empty() {
                self.ungroup(&owner)?;
            }
            return Ok(());
        }

        let group = self.state.groups.get(id)?.clone();
        if let Some(center) = self.state.positions.get(id) {
            let placed = circle_positions(group.members(), center);
            if self.state.positions.is_locked(id) {
                self.lock_positions(placed);
            } else {
                self.state.positions.set_positions(placed);
            }
        }
        if !group.open {
            for member in group.members() {
                if !self.state.selected.contains(member) {
                    self.state.selected.push(member.clone());
                }
            }
        }
        self.delete_group(id)?;
        Ok(())
    }

    pub fn ungroup_selected(&mut self) -> Result<()> {
        let selected = self.state.selected.clone();
        for id in &selected {
            if self.state.groups.contains(id) || self.state.groups.is_member(id) {
                self.ungroup(id)?;
            }
        }
        Ok(())
    }

    /// Open a closed group around its last position.
    ///
    /// Members without a position are gridded around the anchor; if all of
    /// them have one, they are moved so that their mean lands on it.
    pub fn open_group(&mut self, id: &str) -> Result<()> {
        let group = self.state.groups.get(id)?;
        if group.open {
            return Ok(());
        }
        let members = group.members().to_vec();
        if let Some(anchor) = self.state.positions.get(id) {
            let placed: Vec<Position> = members
                .iter()
                .filter_map(|m| self.state.positions.get(m))
                .collect();
            let moved = if placed.len() < members.len() {
                centered_grid(&members, anchor)
            } else {
                let mean = Position::mean(&placed).unwrap_or(anchor);
                members
                    .iter()
                    .cloned()
                    .zip(placed)
                    .map(|(m, p)| (m, p.offset(anchor.x - mean.x, anchor.y - mean.y)))
                    .collect()
            };
            if self.state.positions.is_locked(id) {
                self.lock_positions(moved);
            } else {
                self.state.positions.set_positions(moved);
            }
        }
        self.state.groups.set_open(id, true)?;
        tracing::debug!(group = %id, "opened group");
        Ok(())
    }

    /// Close an open group onto the mean of its members' positions.
    pub fn close_group(&mut self, id: &str) -> Result<()> {
        let group = self.state.groups.get(id)?;
        if !group.open {
            return Ok(());
        }
        let members = group.members().to_vec();
        let placed: Vec<Position> = members
            .iter()
            .filter_map(|m| self.state.positions.get(m))
            .collect();
        if let Some(center) = Position::mean(&placed) {
            if members.iter().any(|m| self.state.positions.is_locked(m)) {
                self.lock_positions([(id.to_string(), center)]);
            } else {
                self.state.positions.set_position(id, center);
            }
        }
        self.state.groups.set_open(id, false)?;
        tracing::debug!(group = %id, "closed group");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_grouping.rs"]
mod tests;
