//! CSG Reference Kernel Backend
//!
//! Pure Rust kernel that records every operation as a node in a
//! constructive-solid-geometry tree. It does not build boundary
//! representations; instead it answers bounding-box queries analytically and
//! classifies points exactly against the tree, which is enough to verify
//! generated geometry without a B-rep backend.

use glam::{DVec2, DVec3};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use super::{
    Aabb, BooleanType, CadError, CadKernel, CadResult, CounterboreSpec, Plane, Profile2D, Solid,
};

/// Tolerance used for point classification on boundaries
const EPSILON: f64 = 1e-9;

/// A node of the CSG tree
#[derive(Debug)]
enum CsgNode {
    /// Profile swept along the plane normal, inset by `slope` per unit rise
    Extrusion {
        profile: Profile2D,
        plane: Plane,
        rise: f64,
        slope: f64,
    },
    Translate {
        child: Arc<CsgNode>,
        offset: DVec3,
    },
    Mirror {
        child: Arc<CsgNode>,
        plane: Plane,
    },
    Boolean {
        a: Arc<CsgNode>,
        b: Arc<CsgNode>,
        op: BooleanType,
    },
    /// Union of translated copies
    Pattern {
        child: Arc<CsgNode>,
        offsets: Vec<DVec3>,
    },
    /// Coaxial cylinders `(radius, depth)` removed at every point
    Holes {
        child: Arc<CsgNode>,
        plane: Plane,
        points: Vec<DVec2>,
        steps: Vec<(f64, f64)>,
    },
}

impl CsgNode {
    fn contains(&self, p: DVec3) -> bool {
        match self {
            CsgNode::Extrusion {
                profile,
                plane,
                rise,
                slope,
            } => {
                let local = plane.to_local(p);
                let w = local.z;
                if w < -EPSILON || w > rise + EPSILON {
                    return false;
                }
                profile
                    .inset(w.clamp(0.0, *rise) * slope)
                    .contains(local.truncate())
            }
            CsgNode::Translate { child, offset } => child.contains(p - *offset),
            CsgNode::Mirror { child, plane } => child.contains(plane.reflect(p)),
            CsgNode::Boolean { a, b, op } => match op {
                BooleanType::Union => a.contains(p) || b.contains(p),
                BooleanType::Intersect => a.contains(p) && b.contains(p),
                BooleanType::Subtract => a.contains(p) && !b.contains(p),
            },
            CsgNode::Pattern { child, offsets } => {
                offsets.iter().any(|offset| child.contains(p - *offset))
            }
            CsgNode::Holes {
                child,
                plane,
                points,
                steps,
            } => {
                if !child.contains(p) {
                    return false;
                }
                let local = plane.to_local(p);
                // Holes run against the normal, into the material
                let depth = -local.z;
                let in_hole = points.iter().any(|center| {
                    let radial = local.truncate().distance(*center);
                    steps.iter().any(|&(radius, step_depth)| {
                        radial < radius && depth > -EPSILON && depth < step_depth
                    })
                });
                !in_hole
            }
        }
    }

    fn bounds(&self) -> Aabb {
        match self {
            CsgNode::Extrusion {
                profile,
                plane,
                rise,
                ..
            } => {
                let half = profile.half_size();
                let far = plane.normal * *rise;
                let corners = [
                    DVec2::new(-half.x, -half.y),
                    DVec2::new(half.x, -half.y),
                    DVec2::new(half.x, half.y),
                    DVec2::new(-half.x, half.y),
                ]
                .map(|c| plane.to_world(profile.center + c));
                Aabb::from_points(corners.into_iter().flat_map(|c| [c, c + far]))
            }
            CsgNode::Translate { child, offset } => child.bounds().translated(*offset),
            CsgNode::Mirror { child, plane } => {
                let b = child.bounds();
                if b.is_empty() {
                    return b;
                }
                Aabb::from_points(b.corners().map(|c| plane.reflect(c)))
            }
            CsgNode::Boolean { a, b, op } => match op {
                BooleanType::Union => a.bounds().union(&b.bounds()),
                BooleanType::Intersect => a.bounds().intersection(&b.bounds()),
                BooleanType::Subtract => a.bounds(),
            },
            CsgNode::Pattern { child, offsets } => {
                let b = child.bounds();
                offsets
                    .iter()
                    .fold(Aabb::EMPTY, |acc, offset| acc.union(&b.translated(*offset)))
            }
            CsgNode::Holes { child, .. } => child.bounds(),
        }
    }
}

/// CSG-tree reference kernel
pub struct CsgKernel {
    /// Storage for solid data (keyed by UUID)
    solids: Mutex<HashMap<Uuid, Arc<CsgNode>>>,
}

impl CsgKernel {
    /// Create a new CSG kernel
    pub fn new() -> Self {
        Self {
            solids: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> CadResult<MutexGuard<'_, HashMap<Uuid, Arc<CsgNode>>>> {
        self.solids
            .lock()
            .map_err(|_| CadError::OperationFailed("solid storage poisoned".into()))
    }

    /// Store a node and return a Solid reference
    fn store_solid(&self, node: CsgNode) -> CadResult<Solid> {
        let id = Uuid::new_v4();
        self.lock()?.insert(id, Arc::new(node));
        Ok(Solid::new(id))
    }

    /// Get a stored node by ID
    fn get_node(&self, solid: &Solid) -> CadResult<Arc<CsgNode>> {
        self.lock()?
            .get(&solid.id)
            .cloned()
            .ok_or(CadError::SolidNotFound(solid.id))
    }

    /// Number of solids created by this kernel
    pub fn solid_count(&self) -> usize {
        self.solids.lock().map(|s| s.len()).unwrap_or(0)
    }

    fn check_points(points: &[DVec2]) -> CadResult<()> {
        if points.iter().any(|p| !p.is_finite()) {
            return Err(CadError::InvalidArgument(
                "hole centers must be finite".into(),
            ));
        }
        Ok(())
    }

    fn check_positive(what: &str, value: f64) -> CadResult<()> {
        if !(value > 0.0) || !value.is_finite() {
            return Err(CadError::InvalidArgument(format!(
                "{what} must be positive, got {value}"
            )));
        }
        Ok(())
    }
}

impl Default for CsgKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl CadKernel for CsgKernel {
    fn name(&self) -> &str {
        "csg"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn extrude(
        &self,
        profile: &Profile2D,
        plane: &Plane,
        distance: f64,
        taper_deg: f64,
    ) -> CadResult<Solid> {
        if profile.is_empty() {
            return Err(CadError::InvalidProfile("profile encloses no area".into()));
        }
        Self::check_positive("extrusion distance", distance)?;
        if !(taper_deg.abs() < 90.0) {
            return Err(CadError::InvalidArgument(format!(
                "taper angle must be within (-90, 90) degrees, got {taper_deg}"
            )));
        }

        let taper = taper_deg.to_radians();
        let rise = distance * taper.cos();
        let slope = taper.tan();
        if profile.inset(rise * slope).is_empty() {
            return Err(CadError::OperationFailed(format!(
                "taper of {taper_deg} degrees collapses the profile within {distance}"
            )));
        }

        tracing::trace!(rise, slope, "extrude");
        self.store_solid(CsgNode::Extrusion {
            profile: *profile,
            plane: *plane,
            rise,
            slope,
        })
    }

    fn translate(&self, solid: &Solid, offset: DVec3) -> CadResult<Solid> {
        let child = self.get_node(solid)?;
        self.store_solid(CsgNode::Translate { child, offset })
    }

    fn mirror(&self, solid: &Solid, plane: &Plane) -> CadResult<Solid> {
        let child = self.get_node(solid)?;
        self.store_solid(CsgNode::Mirror {
            child,
            plane: *plane,
        })
    }

    fn boolean(&self, a: &Solid, b: &Solid, op: BooleanType) -> CadResult<Solid> {
        let a = self.get_node(a)?;
        let b = self.get_node(b)?;
        if op == BooleanType::Intersect && a.bounds().intersection(&b.bounds()).is_empty() {
            return Err(CadError::BooleanFailed(
                "intersection of disjoint solids is empty".into(),
            ));
        }
        tracing::trace!(?op, "boolean");
        self.store_solid(CsgNode::Boolean { a, b, op })
    }

    fn place_at(&self, solid: &Solid, offsets: &[DVec3]) -> CadResult<Solid> {
        if offsets.is_empty() {
            return Err(CadError::InvalidArgument(
                "placement needs at least one offset".into(),
            ));
        }
        let child = self.get_node(solid)?;
        tracing::trace!(copies = offsets.len(), "place_at");
        self.store_solid(CsgNode::Pattern {
            child,
            offsets: offsets.to_vec(),
        })
    }

    fn holes(
        &self,
        solid: &Solid,
        plane: &Plane,
        points: &[DVec2],
        diameter: f64,
        depth: f64,
    ) -> CadResult<Solid> {
        Self::check_positive("hole diameter", diameter)?;
        Self::check_positive("hole depth", depth)?;
        Self::check_points(points)?;
        let child = self.get_node(solid)?;
        tracing::trace!(count = points.len(), diameter, depth, "holes");
        self.store_solid(CsgNode::Holes {
            child,
            plane: *plane,
            points: points.to_vec(),
            steps: vec![(diameter / 2.0, depth)],
        })
    }

    fn cbore_holes(
        &self,
        solid: &Solid,
        plane: &Plane,
        points: &[DVec2],
        spec: &CounterboreSpec,
    ) -> CadResult<Solid> {
        Self::check_positive("bore diameter", spec.bore_diameter)?;
        Self::check_positive("bore depth", spec.bore_depth)?;
        Self::check_positive("counterbore diameter", spec.cbore_diameter)?;
        Self::check_positive("counterbore depth", spec.cbore_depth)?;
        Self::check_points(points)?;
        let child = self.get_node(solid)?;
        tracing::trace!(count = points.len(), "cbore_holes");
        self.store_solid(CsgNode::Holes {
            child,
            plane: *plane,
            points: points.to_vec(),
            steps: vec![
                (spec.bore_diameter / 2.0, spec.bore_depth),
                (spec.cbore_diameter / 2.0, spec.cbore_depth),
            ],
        })
    }

    fn bounds(&self, solid: &Solid) -> CadResult<Aabb> {
        Ok(self.get_node(solid)?.bounds())
    }

    fn contains(&self, solid: &Solid, point: DVec3) -> CadResult<bool> {
        Ok(self.get_node(solid)?.contains(point))
    }
}
