// src/lib.rs
//! Meshview
//!
//! An interactive 3D mesh viewer: OBJ models are placed in a scene with
//! cameras and lights, rasterized on the CPU with Z-buffering and
//! flat/Gouraud/Phong shading, and presented through wgpu with live
//! ImGui parameter editing.

pub mod app;
pub mod geometry;
pub mod gfx;
pub mod io;
pub mod math;
pub mod render;
pub mod scene;
pub mod ui;

// Re-export main types for convenience
pub use app::ViewerApp;
pub use render::{RenderSettings, ShadingMode, SoftwareRenderer};
pub use scene::{Camera, Light, MeshModel, Scene};

/// Creates a default viewer application instance
pub fn default() -> ViewerApp {
    ViewerApp::new()
}
