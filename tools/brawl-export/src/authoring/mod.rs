//! Authoring mesh readers
//!
//! - [`md3`] - vertex-animated surfaces (fighters)
//! - [`ms3d`] - polygon meshes with per-corner attributes and materials (levels)
//!
//! Both read fully-buffered files through [`brawl_common::ByteCursor`], so a
//! truncated file fails with an end-of-data error instead of producing
//! garbage geometry.

pub mod md3;
pub mod ms3d;

pub use md3::{Md3Frame, Md3Surface, read_md3};
pub use ms3d::{Ms3dMesh, Ms3dSurface, read_ms3d};
