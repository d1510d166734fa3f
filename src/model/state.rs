//! Flat state snapshot for the persistence layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{DisplayToggles, LayoutKind, NodeColor, Thresholds};
use crate::error::Result;
use crate::layout::Position;
use crate::model::groups::{Group, GroupRegistry};

use super::Model;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Coordinates {
    pub positions: BTreeMap<String, Position>,
    pub locked: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StateSnapshot {
    pub database: String,
    pub datasets: Vec<String>,
    pub node_color: NodeColor,
    pub layout: LayoutKind,
    pub thresholds: Thresholds,
    pub display_toggles: DisplayToggles,
    pub input: Vec<String>,
    pub hidden: Vec<String>,
    pub split: Vec<String>,
    pub join: Vec<String>,
    pub selected: Vec<String>,
    pub groups: Vec<Group>,
    pub coordinates: Coordinates,
    pub legend_items: BTreeMap<String, bool>,
}

impl StateSnapshot {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Model {
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            database: self.database.clone(),
            datasets: self.options.datasets.clone(),
            node_color: self.options.node_color,
            layout: self.options.layout,
            thresholds: self.options.thresholds,
            display_toggles: self.options.toggles,
            input: self.state.input.clone(),
            hidden: self.state.hidden.iter().cloned().collect(),
            split: self.state.split.iter().cloned().collect(),
            join: self.state.joined.iter().cloned().collect(),
            selected: self.state.selected.clone(),
            groups: self.state.groups.iter().cloned().collect(),
            coordinates: Coordinates {
                positions: self.state.positions.positions().clone(),
                locked: self.state.positions.locked_positions(),
            },
            legend_items: self.legend_items.clone(),
        }
    }

    /// Replace the whole state with `snapshot`.
    ///
    /// Groups are validated before anything changes. Input goes through
    /// [`Model::set_input_from_url_state`]; positions and locks are taken
    /// verbatim.
    pub fn set_state(&mut self, snapshot: StateSnapshot) -> Result<()> {
        let groups = GroupRegistry::from_groups(snapshot.groups)?;

        self.database = snapshot.database;
        self.options.datasets = snapshot.datasets;
        self.options.node_color = snapshot.node_color;
        self.options.layout = snapshot.layout;
        self.options.thresholds = snapshot.thresholds;
        self.options.toggles = snapshot.display_toggles;
        self.legend_items = snapshot.legend_items;

        self.state.groups = groups;
        self.state.positions.restore(
            snapshot.coordinates.positions,
            snapshot.coordinates.locked,
        );
        self.state.hidden = snapshot.hidden.into_iter().collect();
        self.state.joined = snapshot.join.into_iter().collect();
        self.state.split.clear();
        self.state.input.clear();
        self.set_input_from_url_state(&snapshot.input, &snapshot.split)?;
        self.state.selected = snapshot.selected;
        self.pending_split_check.clear();
        self.generation += 1;
        tracing::debug!(database = %self.database, "state restored");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/rust/test_state.rs"]
mod tests;
