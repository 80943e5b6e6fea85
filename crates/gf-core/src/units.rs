//! Gridfinity unit dimensions
//!
//! [`GridUnits`] bundles every dimensional constant the builders use. The
//! standard values come from [`GridUnits::default`]; a custom set can be
//! deserialized, but the base height is always derived from its three
//! profile bands.

use gf_cad::CounterboreSpec;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{GeometryError, GeometryResult};

/// Dimensional constants of the grid system (millimetres)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridUnits {
    /// Footprint edge length of one grid cell
    pub pitch: f64,
    /// Height of one vertical unit
    pub cell_height: f64,
    /// Corner fillet radius of cells and boxes
    pub corner_radius: f64,
    /// Vertical height of the chamfer at the very bottom of the base
    pub bottom_chamfer_height: f64,
    /// Height of the straight band in the middle of the base
    pub straight_height: f64,
    /// Vertical height of the chamfer where the base meets the box
    pub top_chamfer_height: f64,
    pub magnet_diameter: f64,
    pub magnet_depth: f64,
    pub bolt_diameter: f64,
    /// Total bolt bore depth, including the magnet pocket
    pub bolt_depth: f64,
    /// Offset of each magnet hole from its cell center along both axes
    pub magnet_distance: f64,
    /// Extra module height reserved for the stacking lip
    pub lip_allowance: f64,
    /// Floor left under compartment holes
    pub compartment_floor: f64,
}

impl Default for GridUnits {
    fn default() -> Self {
        let bottom_chamfer_height = BASE_CHAMFER_SLANT / std::f64::consts::SQRT_2;
        Self {
            pitch: UNIT_WIDTH,
            cell_height: UNIT_HEIGHT,
            corner_radius: CORNER_RADIUS,
            bottom_chamfer_height,
            straight_height: BASE_STRAIGHT_HEIGHT,
            top_chamfer_height: BASE_HEIGHT - bottom_chamfer_height - BASE_STRAIGHT_HEIGHT,
            magnet_diameter: MAGNET_DIAMETER,
            magnet_depth: MAGNET_DEPTH,
            bolt_diameter: BOLT_DIAMETER,
            bolt_depth: BOLT_DEPTH,
            magnet_distance: MAGNET_DISTANCE,
            lip_allowance: LIP_ALLOWANCE,
            compartment_floor: COMPARTMENT_FLOOR,
        }
    }
}

impl GridUnits {
    /// Total base profile height
    pub fn base_height(&self) -> f64 {
        self.bottom_chamfer_height + self.straight_height + self.top_chamfer_height
    }

    /// Counterbore used for the magnet holes
    pub fn magnet_counterbore(&self) -> CounterboreSpec {
        CounterboreSpec {
            bore_diameter: self.bolt_diameter,
            bore_depth: self.bolt_depth,
            cbore_diameter: self.magnet_diameter,
            cbore_depth: self.magnet_depth,
        }
    }

    /// Check that the constant set describes buildable geometry
    pub fn validate(&self) -> GeometryResult<()> {
        let positive = [
            ("pitch", self.pitch),
            ("cell_height", self.cell_height),
            ("bottom_chamfer_height", self.bottom_chamfer_height),
            ("straight_height", self.straight_height),
            ("top_chamfer_height", self.top_chamfer_height),
            ("magnet_diameter", self.magnet_diameter),
            ("magnet_depth", self.magnet_depth),
            ("bolt_diameter", self.bolt_diameter),
            ("bolt_depth", self.bolt_depth),
        ];
        for (name, value) in positive {
            if !(value > 0.0) || !value.is_finite() {
                return Err(GeometryError::InvalidParameter(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let non_negative = [
            ("corner_radius", self.corner_radius),
            ("magnet_distance", self.magnet_distance),
            ("lip_allowance", self.lip_allowance),
            ("compartment_floor", self.compartment_floor),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(GeometryError::InvalidParameter(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }

        if self.corner_radius > self.pitch / 2.0 {
            return Err(GeometryError::InvalidParameter(format!(
                "corner radius {} exceeds half the {} pitch",
                self.corner_radius, self.pitch
            )));
        }

        // Both chamfers eat into the profile; the bottom face must keep some area
        let inset = self.top_chamfer_height + self.bottom_chamfer_height;
        if inset >= self.pitch / 2.0 {
            return Err(GeometryError::InvalidParameter(format!(
                "chamfers of {inset} collapse a {} cell",
                self.pitch
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_standard_base_height() {
        let units = GridUnits::default();
        assert_relative_eq!(units.base_height(), BASE_HEIGHT, epsilon = 1e-12);
        assert_relative_eq!(units.bottom_chamfer_height, 0.799_030, epsilon = 1e-6);
        assert_relative_eq!(units.top_chamfer_height, 2.400_970, epsilon = 1e-6);
        assert!(units.validate().is_ok());
    }

    #[test]
    fn test_base_height_follows_bands() {
        let units = GridUnits {
            straight_height: 3.0,
            ..GridUnits::default()
        };
        assert_relative_eq!(
            units.base_height(),
            units.bottom_chamfer_height + 3.0 + units.top_chamfer_height
        );
    }

    #[test]
    fn test_oversized_corner_radius_rejected() {
        let units = GridUnits {
            corner_radius: 21.5,
            ..GridUnits::default()
        };
        assert!(matches!(
            units.validate(),
            Err(GeometryError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_negative_dimension_rejected() {
        let units = GridUnits {
            magnet_depth: -1.0,
            ..GridUnits::default()
        };
        assert!(units.validate().is_err());
    }

    #[test]
    fn test_magnet_counterbore() {
        let spec = GridUnits::default().magnet_counterbore();
        assert_relative_eq!(spec.bore_depth, 6.0);
        assert_relative_eq!(spec.cbore_diameter, 6.5);
    }
}
