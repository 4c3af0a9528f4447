//! Procedural primitive meshes.
//!
//! Used for the camera/light proxy models and as ready-made content for
//! demos and tests.

pub mod primitives;

pub use primitives::{unit_cube, uv_sphere};
