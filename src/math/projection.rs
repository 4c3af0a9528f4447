//! Projection frustum derivation and matrix construction.
//!
//! A [`Frustum`] carries explicit view-volume bounds (top/bottom/left/right
//! plus near/far). Symmetric frusta are derived from a view-volume height or
//! a vertical field of view together with an aspect ratio; asymmetric bounds
//! can be set directly when aspect locking is off. Matrix construction maps
//! eye space into the OpenGL-style [-1, 1] clip cube.

use cgmath::Matrix4;
use thiserror::Error;

/// Rejected frustum configurations. A singular projection matrix must never
/// reach the renderer, so every constructor validates first.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ProjectionError {
    #[error("near plane {near} must be positive and closer than far plane {far}")]
    InvalidDepthRange { near: f32, far: f32 },
    #[error("frustum {axis} extent is zero")]
    ZeroExtent { axis: &'static str },
    #[error("field of view {fovy} degrees is outside (0, 180)")]
    InvalidFieldOfView { fovy: f32 },
    #[error("view volume height {height} must be positive")]
    InvalidHeight { height: f32 },
}

/// View-volume bounds at the near plane (perspective) or of the whole volume
/// (orthographic).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
    pub near: f32,
    pub far: f32,
}

impl Frustum {
    /// Symmetric bounds from a view-volume height and aspect ratio, used by
    /// orthographic cameras.
    pub fn symmetric(
        height: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Result<Self, ProjectionError> {
        if height <= 0.0 {
            return Err(ProjectionError::InvalidHeight { height });
        }
        let width = height * aspect;
        Self::from_bounds(0.5 * height, -0.5 * height, -0.5 * width, 0.5 * width, near, far)
    }

    /// Symmetric bounds at the near plane from a vertical field of view in
    /// degrees, used by perspective cameras.
    pub fn from_fovy(
        fovy_degrees: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Result<Self, ProjectionError> {
        if !(0.0..180.0).contains(&fovy_degrees) || fovy_degrees == 0.0 {
            return Err(ProjectionError::InvalidFieldOfView {
                fovy: fovy_degrees,
            });
        }
        if near <= 0.0 || near >= far {
            return Err(ProjectionError::InvalidDepthRange { near, far });
        }
        let half_height = near * (fovy_degrees.to_radians() * 0.5).tan();
        let half_width = half_height * aspect;
        Self::from_bounds(half_height, -half_height, -half_width, half_width, near, far)
    }

    /// Explicit, possibly asymmetric bounds. This is the unlocked-aspect
    /// editing path; the aspect ratio becomes a derived display value.
    pub fn from_bounds(
        top: f32,
        bottom: f32,
        left: f32,
        right: f32,
        near: f32,
        far: f32,
    ) -> Result<Self, ProjectionError> {
        if near >= far {
            return Err(ProjectionError::InvalidDepthRange { near, far });
        }
        if top == bottom {
            return Err(ProjectionError::ZeroExtent { axis: "vertical" });
        }
        if right == left {
            return Err(ProjectionError::ZeroExtent { axis: "horizontal" });
        }
        Ok(Self {
            top,
            bottom,
            left,
            right,
            near,
            far,
        })
    }

    /// Width-over-height of the view volume, display-only when the bounds
    /// were edited directly.
    pub fn aspect(&self) -> f32 {
        (self.right - self.left) / (self.top - self.bottom)
    }
}

/// Orthographic projection: linear map of the frustum box onto the [-1, 1]
/// clip cube.
pub fn orthographic_matrix(f: &Frustum) -> Matrix4<f32> {
    cgmath::ortho(f.left, f.right, f.bottom, f.top, f.near, f.far)
}

/// Perspective projection from explicit near-plane bounds. Supports off-axis
/// (asymmetric) frusta; eye-space z in [-near, -far] lands in clip w.
pub fn perspective_matrix(f: &Frustum) -> Matrix4<f32> {
    cgmath::frustum(f.left, f.right, f.bottom, f.top, f.near, f.far)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::transform::{from_homogeneous, to_homogeneous};
    use cgmath::{InnerSpace, Vector3};

    #[test]
    fn test_symmetric_frustum_derives_bounds() {
        let f = Frustum::symmetric(2.0, 2.0, 0.1, 100.0).unwrap();
        assert_eq!(f.top, 1.0);
        assert_eq!(f.bottom, -1.0);
        assert_eq!(f.left, -2.0);
        assert_eq!(f.right, 2.0);
        assert_eq!(f.aspect(), 2.0);
    }

    #[test]
    fn test_degenerate_depth_range_rejected() {
        assert_eq!(
            Frustum::symmetric(2.0, 1.0, 5.0, 5.0),
            Err(ProjectionError::InvalidDepthRange {
                near: 5.0,
                far: 5.0
            })
        );
        assert!(Frustum::from_fovy(45.0, 1.0, 10.0, 1.0).is_err());
    }

    #[test]
    fn test_zero_extent_rejected() {
        assert!(Frustum::from_bounds(1.0, 1.0, -1.0, 1.0, 0.1, 10.0).is_err());
        assert!(Frustum::from_bounds(1.0, -1.0, 2.0, 2.0, 0.1, 10.0).is_err());
    }

    #[test]
    fn test_fov_out_of_range_rejected() {
        assert!(Frustum::from_fovy(0.0, 1.0, 0.1, 10.0).is_err());
        assert!(Frustum::from_fovy(180.0, 1.0, 0.1, 10.0).is_err());
        assert!(Frustum::from_fovy(-30.0, 1.0, 0.1, 10.0).is_err());
    }

    #[test]
    fn test_orthographic_maps_volume_corners_to_clip_cube() {
        let f = Frustum::symmetric(4.0, 1.0, 1.0, 11.0).unwrap();
        let m = orthographic_matrix(&f);

        // Center of the near plane, eye space z = -near
        let near_center =
            from_homogeneous(m * to_homogeneous(Vector3::new(0.0, 0.0, -1.0), 1.0));
        assert!((near_center.z - (-1.0)).abs() < 1e-5);

        // Top-right corner of the far plane
        let far_corner =
            from_homogeneous(m * to_homogeneous(Vector3::new(2.0, 2.0, -11.0), 1.0));
        assert!((far_corner - Vector3::new(1.0, 1.0, 1.0)).magnitude() < 1e-5);
    }

    #[test]
    fn test_perspective_near_plane_corner_maps_to_clip_corner() {
        let f = Frustum::from_fovy(90.0, 1.0, 1.0, 10.0).unwrap();
        let m = perspective_matrix(&f);

        // fovy 90 at near=1 puts the top-right near corner at (1, 1, -1)
        let corner = from_homogeneous(m * to_homogeneous(Vector3::new(1.0, 1.0, -1.0), 1.0));
        assert!((corner - Vector3::new(1.0, 1.0, -1.0)).magnitude() < 1e-4);
    }
}
