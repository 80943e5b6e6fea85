//! CAD Kernel trait definitions
//!
//! These traits define the interface that all CAD kernels must implement.
//! Every operation takes its inputs explicitly (profile, solid, plane) and
//! returns a new solid; there is no "current selection" carried between calls.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for CAD kernel operations
#[derive(Debug, Clone, Error)]
pub enum CadError {
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Boolean operation failed: {0}")]
    BooleanFailed(String),

    #[error("Solid not found: {0}")]
    SolidNotFound(Uuid),

    #[error("Kernel not available: {0}")]
    KernelNotAvailable(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type for CAD operations
pub type CadResult<T> = Result<T, CadError>;

/// A closed 2D rectangle with filleted corners, centered on `center`
///
/// This is the only profile shape the generator needs: a rectangle sketch
/// with every vertex filleted to the same radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Profile2D {
    /// Center of the rectangle in plane coordinates
    pub center: DVec2,
    /// Edge lengths along the plane's x and y axes
    pub size: DVec2,
    /// Fillet radius applied to all four corners
    pub corner_radius: f64,
}

impl Profile2D {
    /// Create a rectangle profile with all four vertices filleted
    ///
    /// Fails if an edge is not positive or the fillet does not fit the
    /// shorter edge.
    pub fn rounded_rect(center: DVec2, width: f64, height: f64, radius: f64) -> CadResult<Self> {
        if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
            return Err(CadError::InvalidProfile(format!(
                "rectangle edges must be positive, got {width} x {height}"
            )));
        }
        if !(0.0..=width.min(height) / 2.0).contains(&radius) {
            return Err(CadError::InvalidProfile(format!(
                "fillet radius {radius} does not fit a {width} x {height} rectangle"
            )));
        }
        Ok(Self {
            center,
            size: DVec2::new(width, height),
            corner_radius: radius,
        })
    }

    /// Half edge lengths
    pub fn half_size(&self) -> DVec2 {
        self.size * 0.5
    }

    /// Profile offset inward by `distance`
    ///
    /// Straight edges move in by `distance`, corner arcs shrink by the same
    /// amount and become sharp once the radius is used up. The result may be
    /// empty (non-positive size), in which case it contains no points.
    pub fn inset(&self, distance: f64) -> Self {
        Self {
            center: self.center,
            size: self.size - DVec2::splat(2.0 * distance),
            corner_radius: (self.corner_radius - distance).max(0.0),
        }
    }

    /// Whether the profile encloses no area
    pub fn is_empty(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Check whether a point (in plane coordinates) lies inside or on the profile
    pub fn contains(&self, point: DVec2) -> bool {
        if self.is_empty() {
            return false;
        }
        let r = self.corner_radius;
        let q = (point - self.center).abs() - (self.half_size() - DVec2::splat(r));
        let outside = q.max(DVec2::ZERO).length() + q.x.max(q.y).min(0.0) - r;
        outside <= 1e-9
    }
}

/// A plane with an explicit in-plane frame
///
/// Points given "on a face" are interpreted in this frame: `x_axis` and
/// `y_axis` span the plane, `normal` points out of the face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// Origin of the plane in world coordinates
    pub origin: DVec3,
    /// Local X axis
    pub x_axis: DVec3,
    /// Local Y axis
    pub y_axis: DVec3,
    /// Outward normal
    pub normal: DVec3,
}

impl Plane {
    /// World XY plane, normal +Z
    pub fn xy() -> Self {
        Self {
            origin: DVec3::ZERO,
            x_axis: DVec3::X,
            y_axis: DVec3::Y,
            normal: DVec3::Z,
        }
    }

    /// Upward-facing plane at height `z` (a top face)
    pub fn top(z: f64) -> Self {
        Self {
            origin: DVec3::new(0.0, 0.0, z),
            ..Self::xy()
        }
    }

    /// Downward-facing plane at height `z` (a bottom face)
    ///
    /// The frame keeps +X and flips Y so that it stays right-handed with the
    /// normal pointing down.
    pub fn bottom(z: f64) -> Self {
        Self {
            origin: DVec3::new(0.0, 0.0, z),
            x_axis: DVec3::X,
            y_axis: DVec3::NEG_Y,
            normal: DVec3::NEG_Z,
        }
    }

    /// Map a point in plane coordinates to world coordinates
    pub fn to_world(&self, point: DVec2) -> DVec3 {
        self.origin + self.x_axis * point.x + self.y_axis * point.y
    }

    /// Map a world point to plane coordinates `(u, v, w)`, `w` along the normal
    pub fn to_local(&self, point: DVec3) -> DVec3 {
        let d = point - self.origin;
        DVec3::new(d.dot(self.x_axis), d.dot(self.y_axis), d.dot(self.normal))
    }

    /// Reflect a world point across this plane
    pub fn reflect(&self, point: DVec3) -> DVec3 {
        point - self.normal * (2.0 * (point - self.origin).dot(self.normal))
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    /// The empty box (identity for `union`)
    pub const EMPTY: Self = Self {
        min: DVec3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
        max: DVec3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
    };

    /// Smallest box containing all `points`
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Self {
        points.into_iter().fold(Self::EMPTY, |acc, p| Self {
            min: acc.min.min(p),
            max: acc.max.max(p),
        })
    }

    /// The eight corners of the box
    pub fn corners(&self) -> [DVec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            DVec3::new(a.x, a.y, a.z),
            DVec3::new(b.x, a.y, a.z),
            DVec3::new(a.x, b.y, a.z),
            DVec3::new(b.x, b.y, a.z),
            DVec3::new(a.x, a.y, b.z),
            DVec3::new(b.x, a.y, b.z),
            DVec3::new(a.x, b.y, b.z),
            DVec3::new(b.x, b.y, b.z),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn size(&self) -> DVec3 {
        if self.is_empty() {
            DVec3::ZERO
        } else {
            self.max - self.min
        }
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn intersection(&self, other: &Self) -> Self {
        let b = Self {
            min: self.min.max(other.min),
            max: self.max.min(other.max),
        };
        if b.is_empty() { Self::EMPTY } else { b }
    }

    pub fn translated(&self, offset: DVec3) -> Self {
        if self.is_empty() {
            return *self;
        }
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

/// A 3D solid body
///
/// The handle only carries an identifier; the geometry lives in the kernel
/// that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Solid {
    /// Unique identifier
    pub id: Uuid,
}

impl Solid {
    /// Create a new solid with the given ID
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

/// Boolean operation type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BooleanType {
    /// Union (add)
    Union,
    /// Subtraction (cut)
    Subtract,
    /// Intersection (common)
    Intersect,
}

/// Stepped hole: narrow bore with a wider pocket at the entry face
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CounterboreSpec {
    /// Diameter of the through bore
    pub bore_diameter: f64,
    /// Depth of the bore measured from the face
    pub bore_depth: f64,
    /// Diameter of the counterbore pocket
    pub cbore_diameter: f64,
    /// Depth of the pocket measured from the face
    pub cbore_depth: f64,
}

/// The main CAD kernel trait
///
/// Implementations of this trait provide the actual geometry operations
/// using different backends.
pub trait CadKernel: Send + Sync {
    /// Get the name of this kernel
    fn name(&self) -> &str;

    /// Check if the kernel is available
    fn is_available(&self) -> bool;

    /// Extrude a profile along the plane normal with an optional draft
    ///
    /// # Arguments
    /// * `profile` - Profile in plane coordinates
    /// * `plane` - Sketch plane; extrusion runs along its normal
    /// * `distance` - Length measured along the side wall
    /// * `taper_deg` - Inward draft angle in degrees (0 = straight)
    ///
    /// With a taper the vertical rise is `distance * cos(taper)` and the
    /// profile is inset by `rise * tan(taper)` at the far face.
    fn extrude(
        &self,
        profile: &Profile2D,
        plane: &Plane,
        distance: f64,
        taper_deg: f64,
    ) -> CadResult<Solid>;

    /// Move a solid by `offset`
    fn translate(&self, solid: &Solid, offset: DVec3) -> CadResult<Solid>;

    /// Mirror a solid across `plane`
    fn mirror(&self, solid: &Solid, plane: &Plane) -> CadResult<Solid>;

    /// Perform a boolean operation on two solids
    ///
    /// # Arguments
    /// * `a` - The first solid
    /// * `b` - The second solid
    /// * `op` - The boolean operation type
    fn boolean(&self, a: &Solid, b: &Solid, op: BooleanType) -> CadResult<Solid>;

    /// Union of copies of `solid` translated by each offset in order
    fn place_at(&self, solid: &Solid, offsets: &[DVec3]) -> CadResult<Solid>;

    /// Cut straight cylindrical holes into a solid
    ///
    /// Each point is a hole center in `plane` coordinates. Holes start at the
    /// plane and run `depth` against its normal, into the material.
    fn holes(
        &self,
        solid: &Solid,
        plane: &Plane,
        points: &[DVec2],
        diameter: f64,
        depth: f64,
    ) -> CadResult<Solid>;

    /// Cut stepped (counterbore) holes into a solid, see [`CadKernel::holes`]
    fn cbore_holes(
        &self,
        solid: &Solid,
        plane: &Plane,
        points: &[DVec2],
        spec: &CounterboreSpec,
    ) -> CadResult<Solid>;

    /// Axis-aligned bounding box of a solid
    fn bounds(&self, solid: &Solid) -> CadResult<Aabb>;

    /// Check whether a world point lies inside (or on) a solid
    fn contains(&self, solid: &Solid, point: DVec3) -> CadResult<bool>;
}

/// A null kernel that always returns errors (used when no kernel is available)
#[derive(Debug, Default)]
pub struct NullKernel;

impl NullKernel {
    fn unavailable<T>() -> CadResult<T> {
        Err(CadError::KernelNotAvailable(
            "No CAD kernel available".into(),
        ))
    }
}

impl CadKernel for NullKernel {
    fn name(&self) -> &str {
        "null"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn extrude(
        &self,
        _profile: &Profile2D,
        _plane: &Plane,
        _distance: f64,
        _taper_deg: f64,
    ) -> CadResult<Solid> {
        Self::unavailable()
    }

    fn translate(&self, _solid: &Solid, _offset: DVec3) -> CadResult<Solid> {
        Self::unavailable()
    }

    fn mirror(&self, _solid: &Solid, _plane: &Plane) -> CadResult<Solid> {
        Self::unavailable()
    }

    fn boolean(&self, _a: &Solid, _b: &Solid, _op: BooleanType) -> CadResult<Solid> {
        Self::unavailable()
    }

    fn place_at(&self, _solid: &Solid, _offsets: &[DVec3]) -> CadResult<Solid> {
        Self::unavailable()
    }

    fn holes(
        &self,
        _solid: &Solid,
        _plane: &Plane,
        _points: &[DVec2],
        _diameter: f64,
        _depth: f64,
    ) -> CadResult<Solid> {
        Self::unavailable()
    }

    fn cbore_holes(
        &self,
        _solid: &Solid,
        _plane: &Plane,
        _points: &[DVec2],
        _spec: &CounterboreSpec,
    ) -> CadResult<Solid> {
        Self::unavailable()
    }

    fn bounds(&self, _solid: &Solid) -> CadResult<Aabb> {
        Self::unavailable()
    }

    fn contains(&self, _solid: &Solid, _point: DVec3) -> CadResult<bool> {
        Self::unavailable()
    }
}

/// Get the default CAD kernel
pub fn default_kernel() -> Box<dyn CadKernel> {
    Box::new(super::CsgKernel::new())
}
