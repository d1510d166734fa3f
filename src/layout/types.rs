//! Geometry shared by the position store, layout primitives and compiler.

use serde::{Deserialize, Serialize};

// ─── Position ─────────────────────────────────────────────────────────────────

/// A node position in model coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Arithmetic mean, or `None` for an empty input.
    pub fn mean<'a, I>(positions: I) -> Option<Position>
    where
        I: IntoIterator<Item = &'a Position>,
    {
        let (mut sx, mut sy, mut n) = (0.0, 0.0, 0usize);
        for p in positions {
            sx += p.x;
            sy += p.y;
            n += 1;
        }
        (n > 0).then(|| Position::new(sx / n as f64, sy / n as f64))
    }
}

// ─── BoundingBox ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Smallest box containing every position, or `None` for an empty input.
    pub fn around<'a, I>(positions: I) -> Option<BoundingBox>
    where
        I: IntoIterator<Item = &'a Position>,
    {
        positions.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => BoundingBox {
                    min_x: p.x,
                    min_y: p.y,
                    max_x: p.x,
                    max_y: p.y,
                },
                Some(b) => BoundingBox {
                    min_x: b.min_x.min(p.x),
                    min_y: b.min_y.min(p.y),
                    max_x: b.max_x.max(p.x),
                    max_y: b.max_y.max(p.y),
                },
            })
        })
    }
}
