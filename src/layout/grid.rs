//! Row-major grid placement.
//!
//! Ids longer than [`LONG_NAME_LEN`] characters take two horizontal slots.
//! A long id never starts in the last column: it wraps to the next row
//! instead, so the second-to-last column is the rightmost place it can go.

use super::types::Position;

/// Distance between neighbouring grid slots.
pub const GRID_STEP: f64 = 60.0;

pub const LONG_NAME_LEN: usize = 5;

fn slot_width(id: &str) -> usize {
    if id.chars().count() > LONG_NAME_LEN { 2 } else { 1 }
}

/// Column count for a grid holding `slots` slots (never below two).
fn column_count(slots: usize) -> usize {
    ((slots as f64).sqrt().ceil() as usize).max(2)
}

/// Place `ids` on a grid whose top-left slot is at `origin`.
pub fn grid_positions(ids: &[String], origin: Position) -> Vec<(String, Position)> {
    let slots: usize = ids.iter().map(|id| slot_width(id)).sum();
    let columns = column_count(slots);

    let mut placed = Vec::with_capacity(ids.len());
    let (mut col, mut row) = (0usize, 0usize);
    for id in ids {
        let width = slot_width(id);
        if width == 2 && col + 1 >= columns {
            col = 0;
            row += 1;
        }
        let x = origin.x + (col as f64 + (width - 1) as f64 / 2.0) * GRID_STEP;
        let y = origin.y + row as f64 * GRID_STEP;
        placed.push((id.clone(), Position::new(x, y)));
        col += width;
        if col >= columns {
            col = 0;
            row += 1;
        }
    }
    placed
}

/// Grid of `ids` translated so that its centroid sits on `center`.
pub fn centered_grid(ids: &[String], center: Position) -> Vec<(String, Position)> {
    let placed = grid_positions(ids, Position::default());
    let Some(mean) = Position::mean(placed.iter().map(|(_, p)| p)) else {
        return placed;
    };
    placed
        .into_iter()
        .map(|(id, p)| (id, p.offset(center.x - mean.x, center.y - mean.y)))
        .collect()
}
