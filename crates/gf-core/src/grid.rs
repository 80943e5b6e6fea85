//! Grid footprints

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, GeometryResult};
use crate::units::GridUnits;

/// Number of grid cells along each axis
///
/// Cell `(0, 0)` is centered on the origin; cell `(x, y)` is centered on
/// `(x * pitch, y * pitch)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridFootprint {
    pub num_x: u32,
    pub num_y: u32,
}

impl Default for GridFootprint {
    fn default() -> Self {
        Self { num_x: 1, num_y: 1 }
    }
}

impl GridFootprint {
    /// Create a footprint, rejecting empty axes
    pub fn new(num_x: u32, num_y: u32) -> GeometryResult<Self> {
        let footprint = Self { num_x, num_y };
        footprint.validate()?;
        Ok(footprint)
    }

    pub fn validate(&self) -> GeometryResult<()> {
        if self.num_x == 0 || self.num_y == 0 {
            return Err(GeometryError::InvalidParameter(format!(
                "footprint must be at least 1x1, got {}x{}",
                self.num_x, self.num_y
            )));
        }
        Ok(())
    }

    /// Number of cells
    pub fn cell_count(&self) -> usize {
        self.num_x as usize * self.num_y as usize
    }

    /// Cell indices in x-major order
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.num_x).flat_map(move |x| (0..self.num_y).map(move |y| (x, y)))
    }

    /// Full extent of the footprint on the grid
    pub fn extent(&self, units: &GridUnits) -> DVec2 {
        DVec2::new(self.num_x as f64, self.num_y as f64) * units.pitch
    }

    /// Center of the footprint in world coordinates
    pub fn center(&self, units: &GridUnits) -> DVec2 {
        DVec2::new(
            self.num_x.saturating_sub(1) as f64,
            self.num_y.saturating_sub(1) as f64,
        ) * (units.pitch / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_footprint_rejected() {
        assert!(GridFootprint::new(0, 3).is_err());
        assert!(GridFootprint::new(2, 0).is_err());
        assert!(GridFootprint::new(1, 1).is_ok());
    }

    #[test]
    fn test_cells_x_major() {
        let footprint = GridFootprint::new(2, 3).unwrap();
        let cells: Vec<_> = footprint.cells().collect();
        assert_eq!(cells.len(), footprint.cell_count());
        assert_eq!(cells[0], (0, 0));
        assert_eq!(cells[1], (0, 1));
        assert_eq!(cells[3], (1, 0));
    }

    #[test]
    fn test_extent_and_center() {
        let units = GridUnits::default();
        let footprint = GridFootprint::new(1, 3).unwrap();
        assert_eq!(footprint.extent(&units), DVec2::new(42.0, 126.0));
        assert_eq!(footprint.center(&units), DVec2::new(0.0, 42.0));
    }
}
