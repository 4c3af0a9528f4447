//! Affine transform construction.
//!
//! All matrices follow cgmath's convention: column-major storage, column
//! vectors, right-multiplication (`M * v`). Rotation angles are Euler angles
//! in degrees throughout the crate.

use cgmath::{Deg, Matrix4, Vector3, Vector4};

/// Builds a non-uniform scale matrix from per-axis factors.
pub fn scale_matrix(scale: Vector3<f32>) -> Matrix4<f32> {
    Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z)
}

/// Builds a translation matrix.
pub fn translation_matrix(translation: Vector3<f32>) -> Matrix4<f32> {
    Matrix4::from_translation(translation)
}

/// Builds a rotation matrix from Euler angles in degrees, composed as
/// `Rx * Ry * Rz` (Z applied first to a column vector).
pub fn rotation_matrix(degrees: Vector3<f32>) -> Matrix4<f32> {
    Matrix4::from_angle_x(Deg(degrees.x))
        * Matrix4::from_angle_y(Deg(degrees.y))
        * Matrix4::from_angle_z(Deg(degrees.z))
}

/// Composes a full object transform: scale first, then rotate, then
/// translate, i.e. `T * R * S`.
pub fn compose_transform(
    scale: Vector3<f32>,
    rotation_degrees: Vector3<f32>,
    translation: Vector3<f32>,
) -> Matrix4<f32> {
    translation_matrix(translation) * rotation_matrix(rotation_degrees) * scale_matrix(scale)
}

/// Lifts a 3D vector into homogeneous coordinates with the given `w`.
///
/// Use `w = 1.0` for points and `w = 0.0` for directions.
pub fn to_homogeneous(v: Vector3<f32>, w: f32) -> Vector4<f32> {
    Vector4::new(v.x, v.y, v.z, w)
}

/// Projects a homogeneous vector back into 3D.
///
/// Divides by `w` unless `w` is zero, so direction vectors (`w == 0`) pass
/// through unchanged.
pub fn from_homogeneous(v: Vector4<f32>) -> Vector3<f32> {
    if v.w != 0.0 {
        Vector3::new(v.x / v.w, v.y / v.w, v.z / v.w)
    } else {
        Vector3::new(v.x, v.y, v.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    fn assert_close(a: Vector3<f32>, b: Vector3<f32>) {
        assert!(
            (a - b).magnitude() < 1e-4,
            "expected {:?} to be close to {:?}",
            a,
            b
        );
    }

    #[test]
    fn test_compose_order_matches_manual_steps() {
        let scale = Vector3::new(2.0, 3.0, 0.5);
        let rotation = Vector3::new(30.0, -45.0, 10.0);
        let translation = Vector3::new(1.0, -2.0, 4.0);
        let point = Vector3::new(0.7, -1.3, 2.1);

        // Scale, then rotate, then translate by hand
        let scaled = from_homogeneous(scale_matrix(scale) * to_homogeneous(point, 1.0));
        let rotated = from_homogeneous(rotation_matrix(rotation) * to_homogeneous(scaled, 1.0));
        let moved = from_homogeneous(translation_matrix(translation) * to_homogeneous(rotated, 1.0));

        let composed = compose_transform(scale, rotation, translation);
        let result = from_homogeneous(composed * to_homogeneous(point, 1.0));

        assert_close(result, moved);
    }

    #[test]
    fn test_rotation_x_maps_y_to_z() {
        let m = rotation_matrix(Vector3::new(90.0, 0.0, 0.0));
        let v = from_homogeneous(m * to_homogeneous(Vector3::new(0.0, 1.0, 0.0), 0.0));
        assert_close(v, Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_homogeneous_point_round_trip() {
        let p = Vector3::new(3.0, -1.0, 7.5);
        let h = to_homogeneous(p, 2.0);
        assert_eq!(h.w, 2.0);
        assert_close(from_homogeneous(h), p / 2.0);
    }

    #[test]
    fn test_homogeneous_direction_skips_divide() {
        let d = Vector3::new(0.0, 5.0, 0.0);
        let h = to_homogeneous(d, 0.0);
        assert_close(from_homogeneous(h), d);
    }

    #[test]
    fn test_translation_does_not_move_directions() {
        let m = translation_matrix(Vector3::new(10.0, 20.0, 30.0));
        let d = from_homogeneous(m * to_homogeneous(Vector3::new(1.0, 0.0, 0.0), 0.0));
        assert_close(d, Vector3::new(1.0, 0.0, 0.0));
    }
}
