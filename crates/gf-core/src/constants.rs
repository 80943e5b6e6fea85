//! Global constants for gf-core
//!
//! Dimensions are in millimetres and follow the Gridfinity standard.

/// Footprint edge length of one grid cell
pub const UNIT_WIDTH: f64 = 42.0;

/// Height of one vertical grid unit
pub const UNIT_HEIGHT: f64 = 7.0;

/// Total height of the base profile
pub const BASE_HEIGHT: f64 = 5.0;

/// Fillet radius of cell and box corners
pub const CORNER_RADIUS: f64 = 4.0;

/// Slant length of the bottom chamfer (vertical height is this over sqrt 2)
pub const BASE_CHAMFER_SLANT: f64 = 1.13;

/// Height of the straight band between the two chamfers
pub const BASE_STRAIGHT_HEIGHT: f64 = 1.8;

pub const MAGNET_DIAMETER: f64 = 6.5;
pub const MAGNET_DEPTH: f64 = 2.4;
pub const BOLT_DIAMETER: f64 = 3.0;
pub const BOLT_DEPTH: f64 = 3.6 + MAGNET_DEPTH;

/// Distance from a cell center to its magnet holes along each axis (26mm apart)
pub const MAGNET_DISTANCE: f64 = 26.0 / 2.0;

/// Extra height added on top of the height units for the stacking lip
pub const LIP_ALLOWANCE: f64 = 3.8;

/// Material left under every compartment hole
pub const COMPARTMENT_FLOOR: f64 = 2.0;

/// Default shrink of the box footprint so neighbours do not touch
pub const DEFAULT_BOX_CLEARANCE: f64 = 0.5;

/// Extra diameter added to a battery so it slides in
pub const BATTERY_CLEARANCE: f64 = 0.2;

/// Default minimum wall between battery holes
pub const DEFAULT_MINIMUM_WALL: f64 = 1.0;

/// Taper angle of the base chamfers in degrees
pub const CHAMFER_TAPER_DEG: f64 = 45.0;

/// Overshoot of the trimming volume above and below the base
pub const TRIM_OVERSHOOT: f64 = 0.5;
