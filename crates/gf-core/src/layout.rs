//! Hole Layout
//!
//! Spreads cylindrical compartments evenly over a footprint. Each axis is
//! solved on its own: as many holes as fit by diameter, with equal walls
//! before, between and after them. If those walls end up thinner than the
//! minimum, one hole is dropped and the walls recomputed. This happens once;
//! the layout never iterates further.

use gf_cad::{CadKernel, Plane, Solid};
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, GeometryResult, LayoutError, LayoutResult};
use crate::module::ModuleSolid;

/// Solved layout along one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoleAxis {
    /// Width the holes are spread over
    pub width: f64,
    /// Number of holes
    pub count: u32,
    /// Wall thickness before, between and after holes
    pub wall: f64,
    /// Center-to-center spacing
    pub offset: f64,
    /// Whether a hole was dropped to respect the minimum wall
    pub reduced: bool,
}

fn wall_for(width: f64, diameter: f64, count: u32) -> f64 {
    (width - diameter * f64::from(count)) / (f64::from(count) + 1.0)
}

impl HoleAxis {
    /// Solve one axis
    pub fn solve(width: f64, diameter: f64, minimum_wall: f64) -> LayoutResult<Self> {
        for (name, value) in [
            ("width", width),
            ("diameter", diameter),
            ("minimum wall", minimum_wall),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(LayoutError::InvalidParameter(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let fit = (width / diameter).floor();
        if fit > f64::from(u32::MAX) {
            return Err(LayoutError::InvalidParameter(format!(
                "diameter {diameter} is too small to lay out over {width}"
            )));
        }
        let mut count = fit as u32;
        if count == 0 {
            return Err(LayoutError::NoRoom { width, diameter });
        }

        let mut wall = wall_for(width, diameter, count);
        let reduced = wall < minimum_wall;
        if reduced {
            count -= 1;
            wall = wall_for(width, diameter, count);
            tracing::debug!(width, diameter, count, wall, "dropped one hole for wall thickness");
        }

        if count == 0 {
            return Err(LayoutError::NoRoom { width, diameter });
        }
        if wall < minimum_wall {
            return Err(LayoutError::WallTooThin {
                width,
                wall,
                minimum: minimum_wall,
            });
        }

        let offset = (width - wall) / count as f64;
        Ok(Self {
            width,
            count,
            wall,
            offset,
            reduced,
        })
    }

    /// Position of the first hole center, relative to the middle of the width
    pub fn first_center(&self) -> f64 {
        -self.width / 2.0 + self.wall / 2.0 + self.offset / 2.0
    }

    /// All hole centers along the axis, relative to the middle of the width
    pub fn centers(&self) -> impl Iterator<Item = f64> + '_ {
        let first = self.first_center();
        (0..self.count).map(move |i| first + i as f64 * self.offset)
    }
}

/// Solved layout over a rectangular footprint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoleLayout {
    pub x: HoleAxis,
    pub y: HoleAxis,
    /// Hole diameter the layout was solved for
    pub diameter: f64,
}

impl HoleLayout {
    /// Total number of holes
    pub fn hole_count(&self) -> usize {
        self.x.count as usize * self.y.count as usize
    }

    /// Hole centers relative to the footprint center, x-major
    pub fn centers(&self) -> Vec<DVec2> {
        let ys: Vec<f64> = self.y.centers().collect();
        self.x
            .centers()
            .flat_map(|x| ys.iter().map(move |&y| DVec2::new(x, y)))
            .collect()
    }

    /// Hole centers moved onto a footprint centered at `center`
    pub fn centers_at(&self, center: DVec2) -> Vec<DVec2> {
        self.centers().into_iter().map(|p| p + center).collect()
    }
}

/// Solve a hole layout for items of `diameter` over `total_x` by `total_y`
pub fn layout_holes(
    total_x: f64,
    total_y: f64,
    diameter: f64,
    minimum_wall: f64,
) -> LayoutResult<HoleLayout> {
    let layout = HoleLayout {
        x: HoleAxis::solve(total_x, diameter, minimum_wall)?,
        y: HoleAxis::solve(total_y, diameter, minimum_wall)?,
        diameter,
    };
    tracing::debug!(
        holes_x = layout.x.count,
        holes_y = layout.y.count,
        wall_x = layout.x.wall,
        wall_y = layout.y.wall,
        "solved hole layout"
    );
    Ok(layout)
}

/// Drill blind holes down from the top face of a module
///
/// `points` are world XY centers; each hole is `depth` deep.
pub fn cut_holes(
    kernel: &dyn CadKernel,
    module: &ModuleSolid,
    points: &[DVec2],
    diameter: f64,
    depth: f64,
) -> GeometryResult<Solid> {
    if !(depth > 0.0) || depth > module.dims.total_height {
        return Err(GeometryError::InvalidParameter(format!(
            "hole depth {depth} does not fit a module {} tall",
            module.dims.total_height
        )));
    }
    let top = Plane::top(module.dims.wall_height);
    tracing::debug!(holes = points.len(), diameter, depth, "cutting holes");
    Ok(kernel.holes(&module.solid, &top, points, diameter, depth)?)
}
