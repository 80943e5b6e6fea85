//! Base profile construction
//!
//! Builds the tapered, filleted base of one grid cell, replicates it across a
//! footprint and optionally cuts magnet counterbores into its underside.

use std::f64::consts::SQRT_2;

use gf_cad::{BooleanType, CadKernel, Plane, Profile2D, Solid};
use glam::{DVec2, DVec3};

use crate::constants::CHAMFER_TAPER_DEG;
use crate::error::GeometryResult;
use crate::grid::GridFootprint;
use crate::units::GridUnits;

/// A base replicated over a footprint
#[derive(Debug, Clone)]
pub struct ReplicatedBase {
    /// The merged solid
    pub solid: Solid,
    /// Cell centers the base cell was placed at, x-major
    pub placements: Vec<DVec2>,
    /// Magnet hole centers on the bottom-face plane (empty without magnets)
    pub magnet_holes: Vec<DVec2>,
}

/// Plane of the base's bottom face, pointing down
pub fn bottom_face(units: &GridUnits) -> Plane {
    Plane::bottom(-units.base_height())
}

/// Build the base profile of a single grid cell
///
/// The cell is centered on the origin with its wide face at `z = 0` and its
/// narrow face at `z = -base_height`.
pub fn build_base_cell(kernel: &dyn CadKernel, units: &GridUnits) -> GeometryResult<Solid> {
    units.validate()?;
    let profile =
        Profile2D::rounded_rect(DVec2::ZERO, units.pitch, units.pitch, units.corner_radius)?;

    // Built upward from the wide face, then flipped below the XY plane
    let top_chamfer = kernel.extrude(
        &profile,
        &Plane::xy(),
        units.top_chamfer_height * SQRT_2,
        CHAMFER_TAPER_DEG,
    )?;

    let band_profile = profile.inset(units.top_chamfer_height);
    let band_z = units.top_chamfer_height;
    let band = kernel.extrude(&band_profile, &Plane::top(band_z), units.straight_height, 0.0)?;

    let bottom_z = band_z + units.straight_height;
    let bottom_chamfer = kernel.extrude(
        &band_profile,
        &Plane::top(bottom_z),
        units.bottom_chamfer_height * SQRT_2,
        CHAMFER_TAPER_DEG,
    )?;

    let stack = kernel.boolean(&top_chamfer, &band, BooleanType::Union)?;
    let stack = kernel.boolean(&stack, &bottom_chamfer, BooleanType::Union)?;
    let cell = kernel.mirror(&stack, &Plane::xy())?;

    tracing::debug!(
        pitch = units.pitch,
        base_height = units.base_height(),
        "built base cell"
    );
    Ok(cell)
}

/// Grid points of every cell in the footprint, x-major
pub fn cell_placements(units: &GridUnits, footprint: &GridFootprint) -> Vec<DVec2> {
    footprint
        .cells()
        .map(|(x, y)| DVec2::new(x as f64, y as f64) * units.pitch)
        .collect()
}

/// Place a copy of `base` on every cell of the footprint
///
/// The first cell reuses `base` itself; a single-cell footprint returns it
/// unchanged.
pub fn replicate(
    kernel: &dyn CadKernel,
    units: &GridUnits,
    base: &Solid,
    footprint: &GridFootprint,
) -> GeometryResult<ReplicatedBase> {
    footprint.validate()?;
    let placements = cell_placements(units, footprint);

    let solid = if placements.len() == 1 {
        *base
    } else {
        let offsets: Vec<DVec3> = placements.iter().map(|p| p.extend(0.0)).collect();
        kernel.place_at(base, &offsets)?
    };

    tracing::debug!(copies = placements.len(), "replicated base");
    Ok(ReplicatedBase {
        solid,
        placements,
        magnet_holes: Vec::new(),
    })
}

/// Magnet hole centers on the bottom-face plane
///
/// Every cell contributes its own four holes, so the list holds
/// `4 * num_x * num_y` points. The bottom face looks down, which mirrors its
/// y axis relative to the world.
pub fn magnet_hole_centers(units: &GridUnits, footprint: &GridFootprint) -> Vec<DVec2> {
    let d = units.magnet_distance;
    let p = units.pitch;
    let mut points = Vec::with_capacity(footprint.cell_count() * 4);
    for (cell_x, cell_y) in footprint.cells() {
        for hole_x in [0.0, 1.0] {
            for hole_y in [0.0, 1.0] {
                points.push(DVec2::new(
                    cell_x as f64 * p - d * (1.0 - 2.0 * hole_x),
                    -(cell_y as f64 * p - d * (1.0 - 2.0 * hole_y)),
                ));
            }
        }
    }
    points
}

/// Cut magnet counterbores into the underside of a replicated base
pub fn magnet_holes(
    kernel: &dyn CadKernel,
    units: &GridUnits,
    base: ReplicatedBase,
    footprint: &GridFootprint,
) -> GeometryResult<ReplicatedBase> {
    footprint.validate()?;
    let points = magnet_hole_centers(units, footprint);
    let solid = kernel.cbore_holes(
        &base.solid,
        &bottom_face(units),
        &points,
        &units.magnet_counterbore(),
    )?;

    tracing::debug!(holes = points.len(), "cut magnet holes");
    Ok(ReplicatedBase {
        solid,
        placements: base.placements,
        magnet_holes: points,
    })
}

/// Build a replicated base for the footprint, with or without magnet holes
pub fn build_base(
    kernel: &dyn CadKernel,
    units: &GridUnits,
    footprint: &GridFootprint,
    with_magnets: bool,
) -> GeometryResult<ReplicatedBase> {
    let cell = build_base_cell(kernel, units)?;
    let base = replicate(kernel, units, &cell, footprint)?;
    if with_magnets {
        magnet_holes(kernel, units, base, footprint)
    } else {
        Ok(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use gf_cad::CsgKernel;
    use std::collections::HashSet;

    #[test]
    fn test_base_cell_profile() {
        let kernel = CsgKernel::new();
        let units = GridUnits::default();
        let cell = build_base_cell(&kernel, &units).unwrap();

        let b = kernel.bounds(&cell).unwrap();
        assert_relative_eq!(b.max.z, 0.0, epsilon = 1e-9);
        assert_relative_eq!(b.min.z, -5.0, epsilon = 1e-9);
        assert_relative_eq!(b.size().x, 42.0, epsilon = 1e-9);

        // Wide at the top face, narrowed by both chamfers at the bottom
        assert!(kernel.contains(&cell, DVec3::new(20.9, 0.0, -0.01)).unwrap());
        assert!(!kernel.contains(&cell, DVec3::new(20.9, 0.0, -2.5)).unwrap());
        assert!(kernel.contains(&cell, DVec3::new(18.5, 0.0, -3.0)).unwrap());
        assert!(!kernel.contains(&cell, DVec3::new(18.0, 0.0, -4.99)).unwrap());
        assert!(kernel.contains(&cell, DVec3::new(17.5, 0.0, -4.99)).unwrap());
        assert!(!kernel.contains(&cell, DVec3::new(0.0, 0.0, 0.5)).unwrap());
    }

    #[test]
    fn test_base_cell_rejects_oversized_fillet() {
        let kernel = CsgKernel::new();
        let units = GridUnits {
            corner_radius: 30.0,
            ..GridUnits::default()
        };
        assert!(build_base_cell(&kernel, &units).is_err());
        assert_eq!(kernel.solid_count(), 0);
    }

    #[test]
    fn test_replicate_places_every_cell_once() {
        let kernel = CsgKernel::new();
        let units = GridUnits::default();
        let cell = build_base_cell(&kernel, &units).unwrap();

        for (nx, ny) in [(1, 1), (1, 3), (2, 2), (4, 3)] {
            let footprint = GridFootprint::new(nx, ny).unwrap();
            let base = replicate(&kernel, &units, &cell, &footprint).unwrap();
            assert_eq!(base.placements.len(), (nx * ny) as usize);

            let distinct: HashSet<(i64, i64)> = base
                .placements
                .iter()
                .map(|p| (p.x as i64, p.y as i64))
                .collect();
            assert_eq!(distinct.len(), base.placements.len());
            for p in &base.placements {
                assert!(kernel.contains(&base.solid, p.extend(-2.5)).unwrap());
            }
        }
    }

    #[test]
    fn test_replicate_single_cell_reuses_base() {
        let kernel = CsgKernel::new();
        let units = GridUnits::default();
        let cell = build_base_cell(&kernel, &units).unwrap();
        let base = replicate(&kernel, &units, &cell, &GridFootprint::default()).unwrap();
        assert_eq!(base.solid, cell);
        assert_eq!(base.placements, vec![DVec2::ZERO]);
    }

    #[test]
    fn test_magnet_hole_count_keeps_duplicates() {
        let units = GridUnits::default();
        for (nx, ny) in [(1, 1), (2, 1), (3, 2)] {
            let footprint = GridFootprint::new(nx, ny).unwrap();
            let points = magnet_hole_centers(&units, &footprint);
            assert_eq!(points.len(), 4 * (nx * ny) as usize);
        }
    }

    #[test]
    fn test_magnet_hole_positions() {
        let units = GridUnits::default();
        let points = magnet_hole_centers(&units, &GridFootprint::default());
        assert_eq!(
            points,
            vec![
                DVec2::new(-13.0, 13.0),
                DVec2::new(-13.0, -13.0),
                DVec2::new(13.0, 13.0),
                DVec2::new(13.0, -13.0),
            ]
        );

        // Second cell along y: bottom-face y is mirrored
        let points = magnet_hole_centers(&units, &GridFootprint::new(1, 2).unwrap());
        assert_eq!(points[4], DVec2::new(-13.0, -29.0));
        assert_eq!(points[5], DVec2::new(-13.0, -55.0));
    }

    #[test]
    fn test_magnet_holes_cut_from_bottom() {
        let kernel = CsgKernel::new();
        let units = GridUnits::default();
        let footprint = GridFootprint::new(1, 2).unwrap();
        let base = build_base(&kernel, &units, &footprint, true).unwrap();
        assert_eq!(base.magnet_holes.len(), 8);

        // Magnet pocket under the second cell, in world coordinates
        assert!(!kernel.contains(&base.solid, DVec3::new(13.0, 55.0, -4.5)).unwrap());
        assert!(!kernel.contains(&base.solid, DVec3::new(-13.0, 29.0, -4.5)).unwrap());
        // Bolt bore continues above the pocket, pocket does not
        assert!(!kernel.contains(&base.solid, DVec3::new(13.0, 13.0, -1.0)).unwrap());
        assert!(kernel.contains(&base.solid, DVec3::new(15.5, 13.0, -1.0)).unwrap());
        assert!(kernel.contains(&base.solid, DVec3::new(0.0, 0.0, -4.5)).unwrap());
    }
}
