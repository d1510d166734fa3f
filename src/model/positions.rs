//! PositionStore: saved node coordinates and the lock set.
//!
//! A locked position was pinned by the user or by an import and is exempt
//! from automatic placement. Positions are only removed explicitly.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{NetworkError, Result};
use crate::layout::Position;
use crate::model::groups::GroupRegistry;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionStore {
    positions: BTreeMap<String, Position>,
    locked: BTreeSet<String>,
}

impl PositionStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Reads ─────────────────────────────────────────────────────────────

    /// Saved position of `id`. Fails if none is stored; check
    /// [`position_exists`](Self::position_exists) first.
    pub fn position(&self, id: &str) -> Result<Position> {
        self.positions
            .get(id)
            .copied()
            .ok_or_else(|| NetworkError::MissingPosition(id.to_string()))
    }

    pub fn get(&self, id: &str) -> Option<Position> {
        self.positions.get(id).copied()
    }

    pub fn position_exists(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    pub fn is_locked(&self, id: &str) -> bool {
        self.locked.contains(id)
    }

    /// True when at least one id is locked.
    pub fn has_locked(&self) -> bool {
        !self.locked.is_empty()
    }

    /// Locked ids, sorted.
    pub fn locked_positions(&self) -> Vec<String> {
        self.locked.iter().cloned().collect()
    }

    pub fn positions(&self) -> &BTreeMap<String, Position> {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    // ── Writes ────────────────────────────────────────────────────────────

    pub fn set_position(&mut self, id: &str, position: Position) {
        self.positions.insert(id.to_string(), position);
    }

    /// Upsert several positions. Unrelated entries are kept.
    pub fn set_positions<I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = (String, Position)>,
    {
        self.positions.extend(positions);
    }

    /// Replace everything with an authoritative import: all positions and
    /// locks are cleared, then exactly the supplied ids are set and locked.
    pub fn set_positions_from_array<I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = (String, Position)>,
    {
        self.clear();
        for (id, position) in positions {
            self.locked.insert(id.clone());
            self.positions.insert(id, position);
        }
    }

    /// Set and lock positions, then propagate one group hop: a locked
    /// group locks its members, a locked member locks its group.
    pub fn lock_positions<I>(&mut self, positions: I, groups: &GroupRegistry)
    where
        I: IntoIterator<Item = (String, Position)>,
    {
        let mut direct = Vec::new();
        for (id, position) in positions {
            self.positions.insert(id.clone(), position);
            direct.push(id);
        }
        let mut lock: BTreeSet<String> = direct.iter().cloned().collect();
        for id in &direct {
            if let Ok(group) = groups.get(id) {
                lock.extend(group.members().iter().cloned());
            }
            if let Some(owner) = groups.parent(id) {
                lock.insert(owner.to_string());
            }
        }
        self.locked.extend(lock);
    }

    /// Restore a saved store verbatim. Locks are taken as given, without
    /// group propagation.
    pub fn restore<I>(&mut self, positions: BTreeMap<String, Position>, locked: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.positions = positions;
        self.locked = locked.into_iter().collect();
    }

    /// Drop ids from the lock set but keep their coordinates.
    pub fn unlock(&mut self, ids: &[String]) {
        for id in ids {
            self.locked.remove(id);
        }
    }

    /// Remove positions and locks for `ids`, or for everything when `None`.
    pub fn remove_positions(&mut self, ids: Option<&[String]>) {
        match ids {
            None => self.clear(),
            Some(ids) => {
                for id in ids {
                    self.positions.remove(id);
                    self.locked.remove(id);
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.locked.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_positions.rs"]
mod tests;
