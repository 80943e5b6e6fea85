//! Gridfinity container generation
//!
//! Builds Gridfinity bases, modules and battery trays on top of an abstract
//! CAD kernel:
//! - Unit constants and derived dimensions
//! - Base cell construction, replication and magnet holes
//! - Module construction (walls merged with a trimmed base)
//! - Hole layout for cylindrical compartments
//! - Battery trays and their RON recipes

pub mod base;
pub mod constants;
pub mod error;
pub mod grid;
pub mod layout;
pub mod module;
pub mod recipe;
pub mod tray;
pub mod units;

// Re-exports for convenience
pub use base::{
    ReplicatedBase, build_base, build_base_cell, magnet_hole_centers, magnet_holes, replicate,
};
pub use error::{GeometryError, GeometryResult, LayoutError, LayoutResult};
pub use grid::GridFootprint;
pub use layout::{HoleAxis, HoleLayout, cut_holes, layout_holes};
pub use module::{ModuleDims, ModuleParams, ModuleSolid, build_module};
pub use recipe::{RecipeError, TrayRecipe};
pub use tray::{Battery, BatteryTray, TrayParams, tube_battery_tray};
pub use units::GridUnits;
