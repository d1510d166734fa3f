//! Circular placement of class members around a point.
//!
//! Small classes use fixed arrangements that follow the usual
//! dorsal/ventral, left/right member naming; everything else is spread
//! evenly on a circle.

use std::f64::consts::PI;

use super::types::Position;

pub const CIRCLE_RADIUS: f64 = 70.0;

/// First-member ids whose four-member class is drawn as a diamond
/// (dorsal, left, right, ventral).
const DIAMOND_LEADS: &[&str] = &["RMED"];

fn fixed(offsets: &[(f64, f64)]) -> Vec<Position> {
    offsets.iter().map(|&(x, y)| Position::new(x, y)).collect()
}

/// Offsets from the circle center, one per id, in input order.
pub fn circle_offsets(ids: &[String]) -> Vec<Position> {
    match ids.len() {
        0 => Vec::new(),
        1 => fixed(&[(0.0, 0.0)]),
        2 => fixed(&[(-35.0, 0.0), (35.0, 0.0)]),
        3 => fixed(&[(-35.0, -30.0), (35.0, -30.0), (0.0, 35.0)]),
        4 if DIAMOND_LEADS.contains(&ids[0].as_str()) => {
            fixed(&[(0.0, -50.0), (-50.0, 0.0), (50.0, 0.0), (0.0, 50.0)])
        }
        4 => fixed(&[(-35.0, -35.0), (35.0, -35.0), (-35.0, 35.0), (35.0, 35.0)]),
        6 => fixed(&[
            (-35.0, -60.0),
            (35.0, -60.0),
            (-70.0, 0.0),
            (70.0, 0.0),
            (-35.0, 60.0),
            (35.0, 60.0),
        ]),
        n => (0..n)
            .map(|i| {
                let theta = -(i as f64) * 2.0 * PI / n as f64;
                Position::new(CIRCLE_RADIUS * theta.cos(), CIRCLE_RADIUS * theta.sin())
            })
            .collect(),
    }
}

/// Place `ids` around `center`.
pub fn circle_positions(ids: &[String], center: Position) -> Vec<(String, Position)> {
    ids.iter()
        .cloned()
        .zip(circle_offsets(ids))
        .map(|(id, off)| (id, center.offset(off.x, off.y)))
        .collect()
}
