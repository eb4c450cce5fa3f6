//! Point queries over a committed height buffer.

use bevy::math::Vec2;

use crate::grid::SimGrid;
use crate::utils::lerp;

/// Tolerance under which a coordinate counts as an exact cell index.
const ROUNDING_TOLERANCE: f32 = 1e-5;

/// Read-only view over one height buffer, answering height queries at
/// arbitrary (possibly fractional) grid coordinates.
///
/// The view borrows the buffer from its owner; it is created fresh per query
/// batch and never outlives the snapshot it reads.
#[derive(Debug, Clone, Copy)]
pub struct HeightSampler<'a> {
    heights: &'a [f32],
    grid: SimGrid,
}

impl<'a> HeightSampler<'a> {
    pub fn new(heights: &'a [f32], grid: SimGrid) -> Self {
        debug_assert_eq!(heights.len(), grid.cell_count());
        Self { heights, grid }
    }

    pub fn grid(&self) -> SimGrid {
        self.grid
    }

    /// Water height at a grid coordinate.
    ///
    /// Coordinates that round to integers (within tolerance) read the cell
    /// directly, which keeps disturbance-injection lookups exact. Anything
    /// else is bilinearly interpolated from the four surrounding cells.
    ///
    /// Returns `None` when the buffer is empty or the coordinate (plus one,
    /// on the interpolation path) falls outside the padded grid. Callers for
    /// whom in-bounds access is a precondition must treat `None` as fatal.
    pub fn height_at(&self, point: Vec2) -> Option<f32> {
        if self.heights.is_empty() {
            return None;
        }

        let x_rounded = point.x.round();
        let y_rounded = point.y.round();
        if (point.x - x_rounded).abs() <= ROUNDING_TOLERANCE
            && (point.y - y_rounded).abs() <= ROUNDING_TOLERANCE
        {
            return self.cell(x_rounded, y_rounded);
        }

        let x_floor = point.x.floor();
        let y_floor = point.y.floor();
        if x_floor < 0.0 || y_floor < 0.0 {
            return None;
        }
        let (x, y) = (x_floor as usize, y_floor as usize);
        if x + 1 >= self.grid.padded_width() || y + 1 >= self.grid.padded_depth() {
            return None;
        }

        let x_frac = point.x - x_floor;
        let y_frac = point.y - y_floor;

        let h00 = self.heights[self.grid.index(x, y)];
        let h10 = self.heights[self.grid.index(x + 1, y)];
        let h01 = self.heights[self.grid.index(x, y + 1)];
        let h11 = self.heights[self.grid.index(x + 1, y + 1)];

        Some(lerp(lerp(h00, h10, x_frac), lerp(h01, h11, x_frac), y_frac))
    }

    fn cell(&self, x: f32, y: f32) -> Option<f32> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if !self.grid.contains(x, y) {
            return None;
        }
        Some(self.heights[self.grid.index(x, y)])
    }
}
