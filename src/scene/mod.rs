//! Scene graph: mesh models, cameras, lights and their composition.

pub mod camera;
pub mod light;
pub mod mesh;
pub mod scene;

pub use camera::{Camera, ProjectionKind};
pub use light::{Light, LightKind};
pub use mesh::{BoundingBox, DisplayFlags, Face, FaceCorner, Material, MeshError, MeshModel, Vertex};
pub use scene::Scene;
