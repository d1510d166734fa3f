//! Layout primitives: grid and circle placement.
//!
//! These only compute coordinates. Force, hierarchical and concentric
//! layouts are run by the rendering collaborator.

pub mod circle;
pub mod grid;
pub mod types;

pub use circle::{CIRCLE_RADIUS, circle_positions};
pub use grid::{GRID_STEP, centered_grid, grid_positions};
pub use types::{BoundingBox, Position};

#[cfg(test)]
#[path = "../../tests/rust/test_layout.rs"]
mod tests;
