//! Battery trays
//!
//! A module with a grid of blind holes sized for cylindrical cells.

use gf_cad::{CadKernel, Solid};
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::{BATTERY_CLEARANCE, DEFAULT_BOX_CLEARANCE, DEFAULT_MINIMUM_WALL};
use crate::error::{GeometryError, GeometryResult};
use crate::grid::GridFootprint;
use crate::layout::{HoleLayout, cut_holes, layout_holes};
use crate::module::{ModuleDims, ModuleParams, ModuleSolid, build_module};
use crate::units::GridUnits;

/// Cylindrical battery sizes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Battery {
    AA,
    AAA,
    CR123,
    C,
    D,
    /// Any other cylinder, by nominal diameter
    Custom(f64),
}

impl Battery {
    /// Nominal diameter in millimetres
    pub fn diameter(&self) -> f64 {
        match self {
            Battery::AA => 14.5,
            Battery::AAA => 10.5,
            Battery::CR123 => 17.0,
            Battery::C => 26.2,
            Battery::D => 34.2,
            Battery::Custom(d) => *d,
        }
    }

    /// Hole diameter including the fit clearance
    pub fn hole_diameter(&self) -> f64 {
        self.diameter() + BATTERY_CLEARANCE
    }
}

/// Parameters of a battery tray
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrayParams {
    pub battery: Battery,
    pub footprint: GridFootprint,
    pub height_units: f64,
    pub box_clearance: f64,
    pub with_magnets: bool,
    /// Thinnest wall accepted between holes before one is dropped
    pub minimum_wall: f64,
}

impl Default for TrayParams {
    fn default() -> Self {
        Self {
            battery: Battery::CR123,
            footprint: GridFootprint::default(),
            height_units: 2.0,
            box_clearance: DEFAULT_BOX_CLEARANCE,
            with_magnets: false,
            minimum_wall: DEFAULT_MINIMUM_WALL,
        }
    }
}

impl TrayParams {
    /// Parameters of the module the tray is cut from
    pub fn module_params(&self) -> ModuleParams {
        ModuleParams {
            footprint: self.footprint,
            height_units: self.height_units,
            box_clearance: self.box_clearance,
            with_magnets: self.with_magnets,
        }
    }
}

/// A finished battery tray
#[derive(Debug, Clone)]
pub struct BatteryTray {
    /// Tray solid with holes cut
    pub solid: Solid,
    /// Module before the holes were cut
    pub module: ModuleSolid,
    pub layout: HoleLayout,
    /// Hole centers in world XY
    pub hole_centers: Vec<DVec2>,
    pub hole_depth: f64,
}

/// Depth of the battery holes, leaving the compartment floor beneath them
pub fn hole_depth(units: &GridUnits, height_units: f64) -> f64 {
    height_units * units.cell_height - units.compartment_floor
}

/// Build a tray holding as many batteries as fit the footprint
///
/// The hole layout is solved over the full grid extent before any geometry is
/// built, so a footprint that cannot take a single battery fails early.
pub fn tube_battery_tray(
    kernel: &dyn CadKernel,
    units: &GridUnits,
    params: &TrayParams,
) -> GeometryResult<BatteryTray> {
    let module_params = params.module_params();
    ModuleDims::new(units, &module_params)?;

    let depth = hole_depth(units, params.height_units);
    if depth <= 0.0 {
        return Err(GeometryError::InvalidParameter(format!(
            "height of {} units leaves no room for holes",
            params.height_units
        )));
    }

    let extent = params.footprint.extent(units);
    let diameter = params.battery.hole_diameter();
    let layout = layout_holes(extent.x, extent.y, diameter, params.minimum_wall)?;
    tracing::debug!(
        battery = ?params.battery,
        holes = layout.hole_count(),
        depth,
        "building battery tray"
    );

    let module = build_module(kernel, units, &module_params)?;
    let hole_centers = layout.centers_at(params.footprint.center(units));
    let solid = cut_holes(kernel, &module, &hole_centers, diameter, depth)?;

    Ok(BatteryTray {
        solid,
        module,
        layout,
        hole_centers,
        hole_depth: depth,
    })
}
