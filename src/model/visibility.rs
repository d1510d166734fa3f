//! Selection and hidden-set operations.

use crate::error::Result;

use super::Model;

impl Model {
    // ── Selection ─────────────────────────────────────────────────────────

    /// Add ids to the selection. Already-selected ids are ignored.
    pub fn select(&mut self, ids: &[String]) {
        for id in ids {
            if !self.state.selected.contains(id) {
                self.state.selected.push(id.clone());
            }
        }
    }

    pub fn unselect(&mut self, ids: &[String]) {
        self.state.selected.retain(|s| !ids.contains(s));
    }

    pub fn clear_selection(&mut self) {
        self.state.selected.clear();
    }

    /// Selection as the user made it, group ids included.
    pub fn selected_raw(&self) -> &[String] {
        &self.state.selected
    }

    /// Selection with every group id replaced by its members.
    pub fn selected(&self) -> Vec<String> {
        let mut expanded: Vec<String> = Vec::new();
        for id in &self.state.selected {
            let ids = match self.state.groups.get(id) {
                Ok(group) => group.members().to_vec(),
                Err(_) => vec![id.clone()],
            };
            for id in ids {
                if !expanded.contains(&id) {
                    expanded.push(id);
                }
            }
        }
        expanded
    }

    // ── Hiding ────────────────────────────────────────────────────────────

    /// Hide `ids`. A group member leaves its group first; an open group is
    /// closed so it hides as one node. Hidden ids drop out of the input.
    pub fn hide(&mut self, ids: &[String]) -> Result<()> {
        for id in ids {
            if self.state.groups.is_member(id) {
                self.ungroup(id)?;
            } else if self.state.groups.get(id).is_ok_and(|g| g.open) {
                self.close_group(id)?;
            }
            // Ungrouping may have deleted an emptied group and its hidden
            // entries, so insert after.
            self.state.hidden.insert(id.clone());
        }
        let hidden = &self.state.hidden;
        self.state.input.retain(|id| !hidden.contains(id));
        tracing::debug!(count = ids.len(), "hid nodes");
        Ok(())
    }

    pub fn hide_selected(&mut self) -> Result<()> {
        let selected = std::mem::take(&mut self.state.selected);
        let result = self.hide(&selected);
        self.state.selected.clear();
        result
    }

    /// Unhide `ids`. Groups that own a newly visible id are opened.
    pub fn unhide(&mut self, ids: &[String]) -> Result<()> {
        for id in ids {
            if !self.state.hidden.remove(id) {
                continue;
            }
            if let Some(owner) = self.state.groups.parent(id).map(str::to_string) {
                self.open_group(&owner)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_visibility.rs"]
mod tests;
