//! CAD Kernel Abstraction for Gridfinity Generation
//!
//! This crate provides:
//! - The abstract CAD kernel trait consumed by the generator
//! - Profile, plane and bounding-box value types
//! - A pure Rust CSG reference kernel for classification and bounds queries

pub mod kernel;

// Re-exports for convenience
pub use kernel::{
    Aabb, BooleanType, CadError, CadKernel, CadResult, CounterboreSpec, CsgKernel, NullKernel,
    Plane, Profile2D, Solid, default_kernel,
};
