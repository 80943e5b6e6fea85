//! CAD Kernel Abstraction
//!
//! The generator talks to geometry backends only through [`CadKernel`].

mod csg;
mod traits;

pub use csg::CsgKernel;
pub use traits::*;
