//! Module construction
//!
//! A module is a plain filleted box standing on a replicated base. The base is
//! trimmed to the box footprint before the two are merged so the walls sit
//! flush on the base.

use gf_cad::{BooleanType, CadKernel, Plane, Profile2D, Solid};
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::base::{ReplicatedBase, build_base};
use crate::constants::{DEFAULT_BOX_CLEARANCE, TRIM_OVERSHOOT};
use crate::error::{GeometryError, GeometryResult};
use crate::grid::GridFootprint;
use crate::units::GridUnits;

/// Parameters of a module
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleParams {
    /// Grid cells along each axis
    pub footprint: GridFootprint,
    /// Height in vertical grid units
    pub height_units: f64,
    /// Shrink applied to the box footprint
    pub box_clearance: f64,
    /// Cut magnet counterbores into the base
    pub with_magnets: bool,
}

impl Default for ModuleParams {
    fn default() -> Self {
        Self {
            footprint: GridFootprint::default(),
            height_units: 1.0,
            box_clearance: DEFAULT_BOX_CLEARANCE,
            with_magnets: true,
        }
    }
}

/// Dimensions derived from [`ModuleParams`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModuleDims {
    /// Outer box size in X and Y
    pub box_size: DVec2,
    /// Box center over the footprint
    pub center: DVec2,
    /// Height from the bottom of the base to the top of the walls
    pub total_height: f64,
    /// Height of the walls above the base
    pub wall_height: f64,
}

impl ModuleDims {
    /// Derive and validate module dimensions
    ///
    /// Every precondition of [`build_module`] is checked here, before the
    /// kernel is touched.
    pub fn new(units: &GridUnits, params: &ModuleParams) -> GeometryResult<Self> {
        units.validate()?;
        params.footprint.validate()?;

        let height = params.height_units;
        if !(height > 0.0) || !height.is_finite() {
            return Err(GeometryError::InvalidParameter(format!(
                "height must be positive, got {height}"
            )));
        }

        let clearance = params.box_clearance;
        if !(0.0..units.pitch).contains(&clearance) {
            return Err(GeometryError::InvalidParameter(format!(
                "box clearance must be within [0, {}), got {clearance}",
                units.pitch
            )));
        }

        let box_size = params.footprint.extent(units) - DVec2::splat(clearance);
        if box_size.min_element() < 2.0 * units.corner_radius {
            return Err(GeometryError::InvalidParameter(format!(
                "box of {} x {} is too small for {}mm corners",
                box_size.x, box_size.y, units.corner_radius
            )));
        }

        let total_height = units.lip_allowance + height * units.cell_height;
        let wall_height = total_height - units.base_height();
        if wall_height <= 0.0 {
            return Err(GeometryError::InvalidParameter(format!(
                "height of {height} units leaves no wall above the base"
            )));
        }

        Ok(Self {
            box_size,
            center: params.footprint.center(units),
            total_height,
            wall_height,
        })
    }

    /// Footprint profile of the outer box
    pub fn box_profile(&self, units: &GridUnits) -> GeometryResult<Profile2D> {
        Ok(Profile2D::rounded_rect(
            self.center,
            self.box_size.x,
            self.box_size.y,
            units.corner_radius,
        )?)
    }
}

/// A finished module
#[derive(Debug, Clone)]
pub struct ModuleSolid {
    pub solid: Solid,
    pub dims: ModuleDims,
    /// The untrimmed base the module was built on
    pub base: ReplicatedBase,
}

/// Build the box walls and the trimming volume for a module
///
/// The trimmer shares the box profile and spans the base height plus
/// [`TRIM_OVERSHOOT`] above and below, so the cut never lands on a face.
fn build_box_and_trimmer(
    kernel: &dyn CadKernel,
    units: &GridUnits,
    dims: &ModuleDims,
) -> GeometryResult<(Solid, Solid)> {
    let profile = dims.box_profile(units)?;
    let walls = kernel.extrude(&profile, &Plane::xy(), dims.wall_height, 0.0)?;
    let trimmer = kernel.extrude(
        &profile,
        &Plane::top(-units.base_height() - TRIM_OVERSHOOT),
        units.base_height() + 2.0 * TRIM_OVERSHOOT,
        0.0,
    )?;
    Ok((walls, trimmer))
}

/// Build a complete module: trimmed base merged with plain walls
pub fn build_module(
    kernel: &dyn CadKernel,
    units: &GridUnits,
    params: &ModuleParams,
) -> GeometryResult<ModuleSolid> {
    let dims = ModuleDims::new(units, params)?;
    tracing::debug!(
        num_x = params.footprint.num_x,
        num_y = params.footprint.num_y,
        height_units = params.height_units,
        box_x = dims.box_size.x,
        box_y = dims.box_size.y,
        wall_height = dims.wall_height,
        "building module"
    );

    let base = build_base(kernel, units, &params.footprint, params.with_magnets)?;
    let (walls, trimmer) = build_box_and_trimmer(kernel, units, &dims)?;

    let trimmed = kernel.boolean(&trimmer, &base.solid, BooleanType::Intersect)?;
    let solid = kernel.boolean(&walls, &trimmed, BooleanType::Union)?;

    Ok(ModuleSolid { solid, dims, base })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use gf_cad::{CadError, CsgKernel, NullKernel};
    use glam::DVec3;

    fn params(num_x: u32, num_y: u32, height_units: f64, with_magnets: bool) -> ModuleParams {
        ModuleParams {
            footprint: GridFootprint::new(num_x, num_y).unwrap(),
            height_units,
            with_magnets,
            ..ModuleParams::default()
        }
    }

    #[test]
    fn test_module_dims() {
        let units = GridUnits::default();
        let dims = ModuleDims::new(&units, &params(1, 3, 2.0, false)).unwrap();
        assert_relative_eq!(dims.box_size.x, 41.5);
        assert_relative_eq!(dims.box_size.y, 125.5);
        assert_relative_eq!(dims.total_height, 17.8, epsilon = 1e-12);
        assert_relative_eq!(dims.wall_height, 12.8, epsilon = 1e-12);
        assert_eq!(dims.center, DVec2::new(0.0, 42.0));
    }

    #[test]
    fn test_invalid_params_rejected_before_kernel() {
        let units = GridUnits::default();
        let kernel = CsgKernel::new();
        let bad = [
            ModuleParams {
                footprint: GridFootprint { num_x: 0, num_y: 1 },
                ..ModuleParams::default()
            },
            ModuleParams {
                height_units: 0.0,
                ..ModuleParams::default()
            },
            ModuleParams {
                height_units: f64::NAN,
                ..ModuleParams::default()
            },
            ModuleParams {
                box_clearance: -0.1,
                ..ModuleParams::default()
            },
            ModuleParams {
                box_clearance: 42.0,
                ..ModuleParams::default()
            },
            ModuleParams {
                box_clearance: 35.0,
                ..ModuleParams::default()
            },
            ModuleParams {
                height_units: 0.1,
                ..ModuleParams::default()
            },
        ];
        for p in bad {
            assert!(
                matches!(
                    build_module(&kernel, &units, &p),
                    Err(GeometryError::InvalidParameter(_))
                ),
                "expected rejection of {p:?}"
            );
        }
        assert_eq!(kernel.solid_count(), 0);
    }

    #[test]
    fn test_kernel_failure_passes_through() {
        let units = GridUnits::default();
        let result = build_module(&NullKernel, &units, &ModuleParams::default());
        assert!(matches!(
            result,
            Err(GeometryError::Kernel(CadError::KernelNotAvailable(_)))
        ));
    }

    #[test]
    fn test_module_bounds() {
        let kernel = CsgKernel::new();
        let units = GridUnits::default();
        let module = build_module(&kernel, &units, &params(2, 1, 3.0, true)).unwrap();
        let b = kernel.bounds(&module.solid).unwrap();
        assert_relative_eq!(b.min.z, -5.0, epsilon = 1e-9);
        assert_relative_eq!(b.max.z, module.dims.wall_height, epsilon = 1e-9);
        assert_relative_eq!(b.size().x, 83.5, epsilon = 1e-9);
        assert_relative_eq!(b.size().y, 41.5, epsilon = 1e-9);
        assert_relative_eq!(b.center().x, 21.0, epsilon = 1e-9);
    }

    #[test]
    fn test_module_equals_box_plus_trimmed_base() {
        let kernel = CsgKernel::new();
        let units = GridUnits::default();
        let p = params(1, 2, 2.0, false);
        let module = build_module(&kernel, &units, &p).unwrap();

        let dims = module.dims;
        let (walls, trimmer) = build_box_and_trimmer(&kernel, &units, &dims).unwrap();
        let base = build_base(&kernel, &units, &p.footprint, false).unwrap();
        let trimmed = kernel
            .boolean(&base.solid, &trimmer, BooleanType::Intersect)
            .unwrap();
        let expected = kernel.boolean(&trimmed, &walls, BooleanType::Union).unwrap();

        for ix in -12..=12 {
            for iy in -12..=36 {
                for z in [-4.6, -3.0, -0.2, 0.7, 6.0, 12.5] {
                    let point = DVec3::new(ix as f64 * 1.8, iy as f64 * 1.8, z);
                    let got = kernel.contains(&module.solid, point).unwrap();
                    assert_eq!(got, kernel.contains(&expected, point).unwrap(), "{point}");
                    if z > 0.0 {
                        // Above the base the silhouette is the box alone
                        assert_eq!(got, kernel.contains(&walls, point).unwrap(), "{point}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_base_cropped_to_box() {
        let kernel = CsgKernel::new();
        let units = GridUnits::default();
        let module = build_module(&kernel, &units, &params(1, 1, 1.0, false)).unwrap();

        // The base reaches 21mm out at its top face but the box stops at 20.75
        assert!(kernel.contains(&module.base.solid, DVec3::new(20.85, 0.0, -0.05)).unwrap());
        assert!(!kernel.contains(&module.solid, DVec3::new(20.85, 0.0, -0.05)).unwrap());
        assert!(kernel.contains(&module.solid, DVec3::new(20.6, 0.0, -0.05)).unwrap());
        assert!(kernel.contains(&module.solid, DVec3::new(0.0, 0.0, 1.0)).unwrap());
    }

    #[test]
    fn test_module_with_magnets_keeps_pockets() {
        let kernel = CsgKernel::new();
        let units = GridUnits::default();
        let module = build_module(&kernel, &units, &params(1, 1, 1.0, true)).unwrap();
        assert_eq!(module.base.magnet_holes.len(), 4);
        assert!(!kernel.contains(&module.solid, DVec3::new(13.0, -13.0, -4.0)).unwrap());
        // The bolt bore runs past the base top but the box floor is not drilled
        assert!(kernel.contains(&module.solid, DVec3::new(13.0, -13.0, 0.5)).unwrap());
    }
}
