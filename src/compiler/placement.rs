//! Position resolution for rendered nodes.

use std::collections::BTreeMap;

use crate::layout::{BoundingBox, GRID_STEP, Position, grid_positions};
use crate::model::positions::PositionStore;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Placement {
    pub positions: BTreeMap<String, Position>,
    /// No rendered node has a saved position; the renderer lays out from
    /// scratch.
    pub run_layout: bool,
}

/// Resolve positions for `ids`.
///
/// When at least one id has a saved position, every saved position is kept
/// and the rest are gridded in id order, starting one grid step right of
/// the saved nodes' bounding box and aligned with its top edge.
pub fn resolve(ids: &[String], store: &PositionStore) -> Placement {
    let mut positions = BTreeMap::new();
    let mut unplaced = Vec::new();
    for id in ids {
        match store.get(id) {
            Some(position) => {
                positions.insert(id.clone(), position);
            }
            None => unplaced.push(id.clone()),
        }
    }

    let Some(bbox) = BoundingBox::around(positions.values()) else {
        return Placement {
            positions,
            run_layout: !ids.is_empty(),
        };
    };

    unplaced.sort();
    let origin = Position::new(bbox.max_x + GRID_STEP, bbox.min_y);
    positions.extend(grid_positions(&unplaced, origin));
    Placement {
        positions,
        run_layout: false,
    }
}
