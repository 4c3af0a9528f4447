//! Matrix and vector helpers shared by the scene and the rasterizer.

pub mod projection;
pub mod transform;

pub use projection::{orthographic_matrix, perspective_matrix, Frustum, ProjectionError};
pub use transform::{
    compose_transform, from_homogeneous, rotation_matrix, scale_matrix, to_homogeneous,
    translation_matrix,
};
