//! Light sources and the Phong illumination formula.
//!
//! A light is a scene object by composition: a small proxy [`MeshModel`]
//! marks its position in the scene, and the illumination parameters live on
//! the [`Light`] itself. `location` is world space and is refreshed by the
//! scene each frame from the proxy's world transform before rendering.

use cgmath::{InnerSpace, Vector3, Zero};

use crate::geometry::uv_sphere;
use crate::math::{from_homogeneous, to_homogeneous};
use crate::scene::mesh::MeshModel;

/// Point lights attenuate direction per shaded point; directional lights
/// share one direction everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    Point,
    Directional,
}

pub struct Light {
    proxy: MeshModel,

    pub color: Vector3<f32>,
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub shininess: f32,
    pub kind: LightKind,

    location: Vector3<f32>,
}

impl Light {
    pub fn new() -> Self {
        let mut proxy = uv_sphere("light", 0.15, 8, 6);
        proxy.color = Vector3::new(1.0, 1.0, 0.6);

        Self {
            proxy,
            color: Vector3::new(1.0, 1.0, 1.0),
            ambient: 0.15,
            diffuse: 0.75,
            specular: 0.3,
            shininess: 8.0,
            kind: LightKind::Point,
            location: Vector3::zero(),
        }
    }

    pub fn proxy(&self) -> &MeshModel {
        &self.proxy
    }

    pub fn proxy_mut(&mut self) -> &mut MeshModel {
        &mut self.proxy
    }

    /// World-space position (point lights) or direction toward the light
    /// (directional lights), as last refreshed.
    pub fn location(&self) -> Vector3<f32> {
        self.location
    }

    /// Recomputes `location` by pushing the proxy's bounding-box center
    /// through the given parent transform composed with the proxy's own
    /// world transform. The scene calls this once per frame after the
    /// transform update pass.
    pub fn refresh_location(&mut self, parent: cgmath::Matrix4<f32>) {
        let world = parent * self.proxy.world_transform();
        let center = self.proxy.bounds().center();
        self.location = from_homogeneous(world * to_homogeneous(center, 1.0));
    }

    /// Unit vector from the shaded point toward the light.
    pub fn direction_to_light(&self, point: Vector3<f32>) -> Vector3<f32> {
        let v = match self.kind {
            LightKind::Point => self.location - point,
            LightKind::Directional => self.location,
        };
        if v.magnitude2() > 0.0 {
            v.normalize()
        } else {
            Vector3::new(0.0, 1.0, 0.0)
        }
    }

    /// Phong illumination of a surface point.
    ///
    /// Returns the combined ambient, diffuse and specular light arriving at
    /// `point` with surface `normal`, viewed from `eye`. The diffuse term is
    /// clamped at zero for back-facing light and the specular base is
    /// clamped before exponentiation so a negative cosine cannot produce
    /// NaN.
    pub fn illuminate(
        &self,
        point: Vector3<f32>,
        normal: Vector3<f32>,
        eye: Vector3<f32>,
    ) -> Vector3<f32> {
        let light_dir = self.direction_to_light(point);
        let brightness = normal.dot(light_dir).max(0.0);

        // Phong reflection of the light direction about the normal
        let mirror = normal * (2.0 * normal.dot(light_dir)) - light_dir;
        let view_dir = eye - point;
        let view_dir = if view_dir.magnitude2() > 0.0 {
            view_dir.normalize()
        } else {
            normal
        };
        let cos_phi = view_dir.dot(mirror).max(0.0);

        let ambient = self.color * self.ambient;
        let diffuse = self.color * (self.diffuse * brightness);
        let specular = self.color * (self.specular * cos_phi.powf(self.shininess));

        ambient + diffuse + specular
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::SquareMatrix;

    fn overhead_light() -> Light {
        let mut light = Light::new();
        light.proxy_mut().translation = Vector3::new(0.0, 10.0, 0.0);
        light.proxy_mut().update_world_transform();
        light.refresh_location(cgmath::Matrix4::identity());
        light
    }

    #[test]
    fn test_diffuse_full_when_light_overhead() {
        let mut light = overhead_light();
        light.ambient = 0.0;
        light.specular = 0.0;
        light.diffuse = 0.6;

        let lit = light.illuminate(
            Vector3::zero(),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 5.0, 0.0),
        );
        // Light vector parallel to the normal: brightness = 1, so the
        // diffuse term is exactly Kd * lightColor
        assert!((lit - Vector3::new(0.6, 0.6, 0.6)).magnitude() < 1e-5);
    }

    #[test]
    fn test_diffuse_clamped_when_light_behind_surface() {
        let mut light = overhead_light();
        light.ambient = 0.0;
        light.specular = 0.0;

        let lit = light.illuminate(
            Vector3::zero(),
            Vector3::new(0.0, -1.0, 0.0),
            Vector3::new(0.0, -5.0, 0.0),
        );
        assert_eq!(lit, Vector3::zero());
    }

    #[test]
    fn test_specular_never_nan_for_grazing_view() {
        let mut light = overhead_light();
        light.shininess = 2.5; // fractional exponent would NaN on a negative base

        let lit = light.illuminate(
            Vector3::zero(),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, -5.0, 0.0), // viewer below the surface
        );
        assert!(lit.x.is_finite() && lit.y.is_finite() && lit.z.is_finite());
    }

    #[test]
    fn test_directional_light_ignores_point() {
        let mut light = overhead_light();
        light.kind = LightKind::Directional;

        let a = light.direction_to_light(Vector3::new(100.0, 0.0, 0.0));
        let b = light.direction_to_light(Vector3::new(-3.0, 7.0, 2.0));
        assert!((a - b).magnitude() < 1e-6);
        assert!((a - Vector3::new(0.0, 1.0, 0.0)).magnitude() < 1e-6);
    }

    #[test]
    fn test_location_follows_parent_transform() {
        let mut light = overhead_light();
        let parent = cgmath::Matrix4::from_translation(Vector3::new(5.0, 0.0, 0.0));
        light.refresh_location(parent);
        assert!((light.location() - Vector3::new(5.0, 10.0, 0.0)).magnitude() < 1e-5);
    }
}
