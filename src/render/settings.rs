//! Renderer configuration consumed once per frame.
//!
//! All mutable viewer state the UI edits lives here, owned by the app and
//! passed into the renderer by reference; nothing is process-global.

use cgmath::Vector3;

/// Where the illumination formula is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingMode {
    /// Once per face, at the centroid with the face normal.
    Flat,
    /// Once per vertex; the resulting colors are interpolated.
    Gouraud,
    /// Once per pixel, with barycentrically interpolated normals.
    Phong,
}

/// Depth fog: fragments are pulled toward `color` as their view depth
/// approaches `far`.
#[derive(Debug, Clone, Copy)]
pub struct FogSettings {
    pub enabled: bool,
    pub color: Vector3<f32>,
    pub near: f32,
    pub far: f32,
}

impl Default for FogSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            color: Vector3::new(0.5, 0.55, 0.6),
            near: 1.0,
            far: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RenderSettings {
    pub shading: ShadingMode,
    pub clear_color: Vector3<f32>,
    pub fog: FogSettings,
    /// Supersample at twice the viewport resolution and box-filter down.
    pub anti_alias: bool,
    pub draw_axes: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            shading: ShadingMode::Gouraud,
            clear_color: Vector3::new(0.08, 0.08, 0.1),
            fog: FogSettings::default(),
            anti_alias: false,
            draw_axes: true,
        }
    }
}
