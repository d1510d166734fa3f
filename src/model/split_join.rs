//! Switching classes between the class node and its member cells.
//!
//! Both directions rebuild the input as a new sequence instead of editing
//! it by index, so several classes can be processed in one pass.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::layout::{Position, circle_positions};
use crate::notices::Notice;

use super::Model;

/// Keep the first occurrence of every id.
fn dedup_ordered(ids: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

impl Model {
    /// Show each class in `ids` by its members.
    ///
    /// The class leaves `joined`; it enters `split` only when the
    /// `show_individual` default would otherwise hide its members. `join`
    /// mirrors this, so both sets only hold overrides of the default.
    ///
    /// Individual cells are skipped. Classes the selected datasets cannot
    /// split are skipped with a warning notice. Members are placed in a
    /// circle around a positioned class, replace it in its group and in the
    /// input, and become the selection.
    pub fn split(&mut self, ids: &[String]) -> Result<()> {
        let mut unsupported = Vec::new();
        let mut classes = Vec::new();
        for id in ids {
            if !self.catalogue.has_members(id) || classes.contains(id) || unsupported.contains(id) {
                continue;
            }
            if self.catalogue.unsplittable_in(id, &self.options.datasets) {
                unsupported.push(id.clone());
            } else {
                classes.push(id.clone());
            }
        }
        if !unsupported.is_empty() {
            tracing::warn!(classes = ?unsupported, "split not supported in selected datasets");
            self.notify(Notice::split_unsupported(unsupported));
        }
        if classes.is_empty() {
            return Ok(());
        }

        let mut selection = Vec::new();
        for class in &classes {
            let members = self.catalogue.members_of(class).to_vec();
            if let Some(owner) = self.state.groups.parent(class).map(str::to_string) {
                self.state.groups.replace_member(&owner, class, &members)?;
            }
            if let Some(center) = self.state.positions.get(class) {
                let placed = circle_positions(&members, center);
                if self.state.positions.is_locked(class) {
                    self.lock_positions(placed);
                } else {
                    self.state.positions.set_positions(placed);
                }
            }
            self.state.joined.remove(class);
            if !self.options.toggles.show_individual {
                self.state.split.insert(class.clone());
            }
            selection.extend(members);
        }

        let input: Vec<String> = self
            .state
            .input
            .iter()
            .flat_map(|id| {
                if classes.contains(id) {
                    self.catalogue.members_of(id).to_vec()
                } else {
                    vec![id.clone()]
                }
            })
            .collect();
        self.state.input = dedup_ordered(input);
        self.state.selected = dedup_ordered(selection);
        self.pending_split_check.extend(classes.iter().cloned());
        tracing::debug!(classes = ?classes, "split classes");
        Ok(())
    }

    pub fn split_selected(&mut self) -> Result<()> {
        let selected = self.selected();
        self.split(&selected)
    }

    /// Show the classes of the cells in `ids` as single nodes.
    ///
    /// Classes are taken in first-encounter order. A class lands on the
    /// mean of its placed members, takes the place of its members in the
    /// first group that held one of them, is unhidden together with its
    /// members, replaces them in the input, and becomes the selection.
    pub fn join(&mut self, ids: &[String]) -> Result<()> {
        let mut classes: Vec<String> = Vec::new();
        for id in ids {
            if let Some(class) = self.catalogue.class_of(id) {
                if !classes.iter().any(|c| c == class) {
                    classes.push(class.to_string());
                }
            }
        }
        if classes.is_empty() {
            return Ok(());
        }

        for class in &classes {
            let members = self.catalogue.members_of(class).to_vec();
            let placed: Vec<Position> = members
                .iter()
                .filter_map(|m| self.state.positions.get(m))
                .collect();
            if let Some(center) = Position::mean(&placed) {
                if self.state.positions.has_locked() {
                    self.lock_positions([(class.clone(), center)]);
                } else {
                    self.state.positions.set_position(class, center);
                }
            }

            self.fold_members_into_class(class, &members)?;

            for member in &members {
                self.state.hidden.remove(member);
            }
            self.state.hidden.remove(class);
            self.state.split.remove(class);
            if self.options.toggles.show_individual {
                self.state.joined.insert(class.clone());
            }
        }

        let joined: Vec<String> = self
            .state
            .input
            .iter()
            .map(|id| match self.catalogue.class_of(id) {
                Some(class) if classes.iter().any(|c| c == class) => class.to_string(),
                _ => id.clone(),
            })
            .collect();
        self.state.input = dedup_ordered(joined);
        self.state.selected = classes.clone();
        tracing::debug!(classes = ?classes, "joined classes");
        Ok(())
    }

    pub fn join_selected(&mut self) -> Result<()> {
        let selected = self.selected();
        self.join(&selected)
    }

    /// Replace grouped members of `class` by the class itself, in the first
    /// group that holds one of them. Groups left empty are deleted.
    fn fold_members_into_class(&mut self, class: &str, members: &[String]) -> Result<()> {
        let grouped: Vec<(String, String)> = members
            .iter()
            .filter_map(|m| {
                self.state
                    .groups
                    .parent(m)
                    .map(|g| (m.clone(), g.to_string()))
            })
            .collect();
        let Some((first_member, first_group)) = grouped.first().cloned() else {
            return Ok(());
        };

        let mut owners: Vec<String> = Vec::new();
        for (member, group) in &grouped {
            if !owners.contains(group) {
                owners.push(group.clone());
            }
            if *member != first_member {
                self.state.groups.remove_members(group, &[member.clone()])?;
            }
        }
        self.state
            .groups
            .replace_member(&first_group, &first_member, &[class.to_string()])?;

        for group in owners {
            if self.state.groups.get(&group)?.members().is_empty() {
                self.delete_group(&group)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_split_join.rs"]
mod tests;
