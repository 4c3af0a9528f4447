//! Camera state: look-at view derivation and projection management.
//!
//! A camera is a scene object by composition: it owns a small proxy
//! [`MeshModel`] drawn when some other camera is active, plus its own
//! eye/at/up vectors and cached view/projection matrices. Matrices are
//! recomputed by explicit calls ([`Camera::refresh`] or the setters), never
//! behind the getter's back.

use cgmath::{Matrix4, Point3, SquareMatrix, Vector3};

use crate::geometry::unit_cube;
use crate::math::{orthographic_matrix, perspective_matrix, Frustum, ProjectionError};
use crate::scene::mesh::MeshModel;

/// Which projection the camera currently applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionKind {
    Orthographic,
    Perspective,
}

pub struct Camera {
    proxy: MeshModel,

    pub eye: Vector3<f32>,
    pub at: Vector3<f32>,
    pub up: Vector3<f32>,

    pub kind: ProjectionKind,
    /// Vertical field of view in degrees (perspective).
    pub fovy: f32,
    /// View-volume height (orthographic).
    pub height: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// When locked, frustum bounds derive from height/fovy and aspect; when
    /// unlocked, the bounds are edited directly and aspect is display-only.
    pub aspect_locked: bool,

    view: Matrix4<f32>,
    projection: Matrix4<f32>,
    frustum: Frustum,
}

impl Camera {
    /// Creates an orthographic camera looking from `eye` toward `at`.
    pub fn new(eye: Vector3<f32>, at: Vector3<f32>, up: Vector3<f32>) -> Self {
        let mut proxy = unit_cube("camera");
        proxy.scale = Vector3::new(0.25, 0.25, 0.4);
        proxy.color = Vector3::new(0.35, 0.35, 0.4);

        let height = 2.5;
        let aspect = 1.0;
        let near = 0.1;
        let far = 100.0;
        let frustum = Frustum::symmetric(height, aspect, near, far)
            .expect("default camera frustum is valid");

        let mut camera = Self {
            proxy,
            eye,
            at,
            up,
            kind: ProjectionKind::Orthographic,
            fovy: 45.0,
            height,
            aspect,
            near,
            far,
            aspect_locked: true,
            view: Matrix4::identity(),
            projection: orthographic_matrix(&frustum),
            frustum,
        };
        camera.refresh();
        camera
    }

    /// Points the camera and recomputes the view matrix.
    pub fn look_at(&mut self, eye: Vector3<f32>, at: Vector3<f32>, up: Vector3<f32>) {
        self.eye = eye;
        self.at = at;
        self.up = up;
        self.refresh_view();
    }

    /// Recomputes the view matrix from the current eye/at/up and moves the
    /// proxy mesh to the eye position. Call after mutating any of them.
    pub fn refresh_view(&mut self) {
        self.view = Matrix4::look_at_rh(
            Point3::new(self.eye.x, self.eye.y, self.eye.z),
            Point3::new(self.at.x, self.at.y, self.at.z),
            self.up,
        );
        self.proxy.translation = self.eye;
        self.proxy.update_world_transform();
    }

    /// Re-derives both cached matrices from the current parameters.
    pub fn refresh(&mut self) {
        self.refresh_view();
        // Parameters were validated when last set; keep the cached frustum
        // if they have gone stale-invalid rather than propagate a singular
        // matrix
        let _ = self.rebuild_projection();
    }

    /// Switches to an orthographic projection derived from a view-volume
    /// height. Leaves the previous projection in place on invalid input.
    pub fn set_orthographic(
        &mut self,
        height: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Result<(), ProjectionError> {
        if near >= far {
            return Err(ProjectionError::InvalidDepthRange { near, far });
        }
        let frustum = if self.aspect_locked {
            Frustum::symmetric(height, aspect, near, far)?
        } else {
            Frustum {
                near,
                far,
                ..self.frustum
            }
        };
        self.kind = ProjectionKind::Orthographic;
        self.height = height;
        self.aspect = aspect;
        self.near = near;
        self.far = far;
        self.frustum = frustum;
        self.projection = orthographic_matrix(&frustum);
        Ok(())
    }

    /// Switches to a perspective projection derived from a vertical field of
    /// view in degrees. Leaves the previous projection in place on invalid
    /// input.
    pub fn set_perspective(
        &mut self,
        fovy: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Result<(), ProjectionError> {
        let frustum = if self.aspect_locked {
            Frustum::from_fovy(fovy, aspect, near, far)?
        } else {
            if near <= 0.0 || near >= far {
                return Err(ProjectionError::InvalidDepthRange { near, far });
            }
            Frustum {
                near,
                far,
                ..self.frustum
            }
        };
        self.kind = ProjectionKind::Perspective;
        self.fovy = fovy;
        self.aspect = aspect;
        self.near = near;
        self.far = far;
        self.frustum = frustum;
        self.projection = perspective_matrix(&frustum);
        Ok(())
    }

    /// Directly edits the frustum bounds (unlocked-aspect mode). The aspect
    /// field becomes a derived display value.
    pub fn set_frustum_bounds(
        &mut self,
        top: f32,
        bottom: f32,
        left: f32,
        right: f32,
    ) -> Result<(), ProjectionError> {
        let frustum = Frustum::from_bounds(top, bottom, left, right, self.near, self.far)?;
        self.frustum = frustum;
        self.aspect = frustum.aspect();
        self.projection = match self.kind {
            ProjectionKind::Orthographic => orthographic_matrix(&frustum),
            ProjectionKind::Perspective => perspective_matrix(&frustum),
        };
        Ok(())
    }

    /// Scales the active projection's field of view (perspective) or view
    /// height (orthographic) by `factor` and re-derives the projection.
    /// The result is clamped away from degenerate values, so extreme factors
    /// saturate instead of failing.
    pub fn set_zoom(&mut self, factor: f32) -> Result<(), ProjectionError> {
        match self.kind {
            ProjectionKind::Orthographic => {
                let height = (self.height * factor).max(MIN_ORTHO_HEIGHT);
                self.set_orthographic(height, self.aspect, self.near, self.far)
            }
            ProjectionKind::Perspective => {
                let fovy = (self.fovy * factor).clamp(MIN_FOVY, MAX_FOVY);
                self.set_perspective(fovy, self.aspect, self.near, self.far)
            }
        }
    }

    pub fn view(&self) -> Matrix4<f32> {
        self.view
    }

    pub fn projection(&self) -> Matrix4<f32> {
        self.projection
    }

    pub fn frustum(&self) -> Frustum {
        self.frustum
    }

    /// Width-over-height actually in effect, derived from the frustum when
    /// aspect locking is off.
    pub fn display_aspect(&self) -> f32 {
        if self.aspect_locked {
            self.aspect
        } else {
            self.frustum.aspect()
        }
    }

    pub fn proxy(&self) -> &MeshModel {
        &self.proxy
    }

    pub fn proxy_mut(&mut self) -> &mut MeshModel {
        &mut self.proxy
    }

    fn rebuild_projection(&mut self) -> Result<(), ProjectionError> {
        match self.kind {
            ProjectionKind::Orthographic => {
                self.set_orthographic(self.height, self.aspect, self.near, self.far)
            }
            ProjectionKind::Perspective => {
                self.set_perspective(self.fovy, self.aspect, self.near, self.far)
            }
        }
    }
}

const MIN_ORTHO_HEIGHT: f32 = 1e-3;
const MIN_FOVY: f32 = 0.5;
const MAX_FOVY: f32 = 179.0;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{from_homogeneous, to_homogeneous};
    use cgmath::InnerSpace;

    fn test_camera() -> Camera {
        Camera::new(
            Vector3::new(0.0, 0.0, 5.0),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn test_look_at_places_eye_at_view_origin() {
        let camera = test_camera();
        let eye_in_view =
            from_homogeneous(camera.view() * to_homogeneous(camera.eye, 1.0));
        assert!(eye_in_view.magnitude() < 1e-5);
    }

    #[test]
    fn test_look_at_inverse_recovers_eye() {
        let mut camera = test_camera();
        camera.look_at(
            Vector3::new(3.0, 2.0, 7.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        );
        let inv = camera.view().invert().unwrap();
        let origin = from_homogeneous(inv * to_homogeneous(Vector3::new(0.0, 0.0, 0.0), 1.0));
        assert!((origin - camera.eye).magnitude() < 1e-4);
    }

    #[test]
    fn test_set_zoom_identity_is_noop() {
        let mut camera = test_camera();
        let before = camera.projection();
        camera.set_zoom(1.0).unwrap();
        assert_eq!(before, camera.projection());

        camera.set_perspective(45.0, 1.0, 0.1, 100.0).unwrap();
        let before = camera.projection();
        camera.set_zoom(1.0).unwrap();
        assert_eq!(before, camera.projection());
    }

    #[test]
    fn test_set_zoom_clamps_degenerate_fov() {
        let mut camera = test_camera();
        camera.set_perspective(45.0, 1.0, 0.1, 100.0).unwrap();
        camera.set_zoom(1000.0).unwrap();
        assert!(camera.fovy < 180.0);
        camera.set_zoom(0.0).unwrap();
        assert!(camera.fovy > 0.0);
    }

    #[test]
    fn test_degenerate_projection_leaves_previous_state() {
        let mut camera = test_camera();
        let before = camera.projection();
        assert!(camera.set_orthographic(2.0, 1.0, 50.0, 1.0).is_err());
        assert_eq!(before, camera.projection());
        assert_eq!(camera.near, 0.1);
    }

    #[test]
    fn test_unlocked_bounds_make_aspect_derived() {
        let mut camera = test_camera();
        camera.aspect_locked = false;
        camera.set_frustum_bounds(1.0, -1.0, -2.0, 2.0).unwrap();
        assert_eq!(camera.display_aspect(), 2.0);
    }

    #[test]
    fn test_proxy_follows_eye() {
        let mut camera = test_camera();
        camera.look_at(
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        );
        assert_eq!(camera.proxy().translation, Vector3::new(1.0, 2.0, 3.0));
    }
}
