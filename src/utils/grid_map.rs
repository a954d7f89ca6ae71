// occupancy grid definition
// cell values follow the usual occupancy convention:
// -1 unknown, 0 free, >= OCCUPIED_THRESHOLD occupied

extern crate nalgebra as na;

use crate::common::{PlannerError, PlannerResult};

/// Value of an unknown cell
pub const UNKNOWN: i8 = -1;
/// Value of a free cell
pub const FREE: i8 = 0;
/// Value of a fully occupied cell
pub const OCCUPIED: i8 = 100;
/// Smallest value treated as occupied
pub const OCCUPIED_THRESHOLD: i8 = 50;

/// Occupancy state of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Free,
    Occupied,
    Unknown,
}

impl CellState {
    fn from_value(value: i8) -> Self {
        if value < 0 {
            CellState::Unknown
        } else if value >= OCCUPIED_THRESHOLD {
            CellState::Occupied
        } else {
            CellState::Free
        }
    }
}

/// Occupancy grid indexed by `(x, y)` cell, position units are cells
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    grid: na::DMatrix<i8>,
    resolution: f64,
    rotation: f64,
}

impl OccupancyGrid {
    /// Grid of `width x height` cells, all in one state
    pub fn new(width: usize, height: usize, resolution: f64, fill: CellState) -> Self {
        let value = match fill {
            CellState::Free => FREE,
            CellState::Occupied => OCCUPIED,
            CellState::Unknown => UNKNOWN,
        };
        Self {
            grid: na::DMatrix::from_element(width, height, value),
            resolution,
            rotation: 0.0,
        }
    }

    /// Build from an occupancy matrix, each cell upscaled to `scale x scale` cells
    pub fn from_matrix(original_matrix: na::DMatrix<i8>, scale: usize, resolution: f64) -> PlannerResult<Self> {
        if scale < 1 {
            return Err(PlannerError::InvalidParameter("scale must be >= 1".to_string()));
        }
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(PlannerError::InvalidParameter(format!(
                "resolution must be positive, got {}",
                resolution
            )));
        }
        let grid = original_matrix.kronecker(&na::DMatrix::<i8>::repeat(scale, scale, 1));
        Ok(Self {
            grid,
            resolution: resolution / scale as f64,
            rotation: 0.0,
        })
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn width(&self) -> usize {
        self.grid.nrows()
    }

    pub fn height(&self) -> usize {
        self.grid.ncols()
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && y >= 0.0 && x < self.width() as f64 && y < self.height() as f64
    }

    fn cell_index(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        if self.contains(x, y) {
            Some((x.floor() as usize, y.floor() as usize))
        } else {
            None
        }
    }

    /// State of the cell at integer coordinates, `None` outside the grid
    pub fn cell(&self, ix: i64, iy: i64) -> Option<CellState> {
        if ix < 0 || iy < 0 || ix as usize >= self.width() || iy as usize >= self.height() {
            return None;
        }
        Some(CellState::from_value(self.grid[(ix as usize, iy as usize)]))
    }

    /// State of the cell containing a point
    pub fn state_at(&self, x: f64, y: f64) -> Option<CellState> {
        self.cell_index(x, y)
            .map(|idx| CellState::from_value(self.grid[idx]))
    }

    pub fn is_occupied(&self, x: f64, y: f64) -> bool {
        self.state_at(x, y) == Some(CellState::Occupied)
    }

    pub fn set_cell(&mut self, ix: usize, iy: usize, value: i8) {
        if ix < self.width() && iy < self.height() {
            self.grid[(ix, iy)] = value;
        }
    }

    /// Set every cell of the inclusive rectangle, clipped to the grid
    pub fn fill_rect(&mut self, x0: usize, y0: usize, x1: usize, y1: usize, value: i8) {
        for ix in x0..=x1.min(self.width().saturating_sub(1)) {
            for iy in y0..=y1.min(self.height().saturating_sub(1)) {
                self.grid[(ix, iy)] = value;
            }
        }
    }

    /// Check that no cell crossed by the segment is occupied.
    ///
    /// Uses a Bresenham-like walk over the cells between both endpoints;
    /// cells outside the grid count as blocked.
    pub fn is_free_or_unknown(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> bool {
        let mut x = x0.floor() as i64;
        let mut y = y0.floor() as i64;
        let x_end = x1.floor() as i64;
        let y_end = y1.floor() as i64;
        let dx = (x_end - x).abs();
        let dy = (y_end - y).abs();
        let sx = if x < x_end { 1 } else { -1 };
        let sy = if y < y_end { 1 } else { -1 };

        let mut err = dx - dy;

        loop {
            match self.cell(x, y) {
                None | Some(CellState::Occupied) => return false,
                Some(_) => {}
            }

            if x == x_end && y == y_end {
                break;
            }

            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    fn walled() -> OccupancyGrid {
        let mut grid = OccupancyGrid::new(20, 20, 0.1, CellState::Free);
        grid.fill_rect(10, 5, 10, 14, OCCUPIED);
        grid
    }

    #[test]
    fn test_contains() {
        let grid = walled();
        assert!(grid.contains(0.0, 0.0));
        assert!(grid.contains(19.9, 19.9));
        assert!(!grid.contains(20.0, 5.0));
        assert!(!grid.contains(-0.1, 5.0));
    }

    #[test]
    fn test_cell_states() {
        let mut grid = walled();
        grid.set_cell(3, 3, UNKNOWN);
        assert_eq!(grid.cell(10, 5), Some(CellState::Occupied));
        assert_eq!(grid.cell(3, 3), Some(CellState::Unknown));
        assert_eq!(grid.cell(2, 2), Some(CellState::Free));
        assert_eq!(grid.cell(-1, 2), None);
        assert!(grid.is_occupied(10.5, 7.2));
    }

    #[test]
    fn test_segment_queries() {
        let mut grid = walled();
        grid.set_cell(4, 2, UNKNOWN);
        assert!(grid.is_free_or_unknown(2.5, 2.5, 8.5, 2.5));
        assert!(!grid.is_free_or_unknown(5.5, 10.5, 15.5, 10.5));
        assert!(grid.is_free_or_unknown(5.5, 16.5, 15.5, 16.5));
        assert!(!grid.is_free_or_unknown(5.5, 2.5, 25.0, 2.5));
    }

    #[test]
    fn test_from_matrix_scales() {
        let m = DMatrix::from_row_slice(2, 2, &[0, 100, -1, 0]);
        let grid = OccupancyGrid::from_matrix(m, 3, 0.3).unwrap();
        assert_eq!(grid.width(), 6);
        assert_eq!(grid.height(), 6);
        assert!((grid.resolution() - 0.1).abs() < 1e-12);
        assert_eq!(grid.cell(0, 4), Some(CellState::Occupied));
        assert_eq!(grid.cell(4, 0), Some(CellState::Unknown));
        assert_eq!(grid.cell(5, 5), Some(CellState::Free));
        assert!(OccupancyGrid::from_matrix(DMatrix::zeros(1, 1), 0, 0.1).is_err());
    }
}
