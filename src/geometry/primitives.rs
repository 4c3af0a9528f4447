//! # Primitive Shape Generation
//!
//! Generators for simple closed meshes. Primitives come back as regular
//! [`MeshModel`]s with shared corner vertices and no authored normals, so
//! the mesh constructor's averaged-normal synthesis covers them.

use std::f32::consts::PI;

use cgmath::{Vector2, Vector3};

use crate::scene::mesh::{Face, FaceCorner, MeshModel};

fn face(a: usize, b: usize, c: usize) -> Face {
    Face {
        corners: [a, b, c].map(|position| FaceCorner {
            position,
            normal: None,
            texcoord: None,
        }),
    }
}

/// Generate a unit cube centered at the origin.
///
/// Eight shared corner vertices from -0.5 to 0.5 on all axes, twelve
/// triangular faces wound counter-clockwise as seen from outside.
pub fn unit_cube(name: &str) -> MeshModel {
    let vertices = vec![
        Vector3::new(-0.5, -0.5, -0.5),
        Vector3::new(0.5, -0.5, -0.5),
        Vector3::new(0.5, 0.5, -0.5),
        Vector3::new(-0.5, 0.5, -0.5),
        Vector3::new(-0.5, -0.5, 0.5),
        Vector3::new(0.5, -0.5, 0.5),
        Vector3::new(0.5, 0.5, 0.5),
        Vector3::new(-0.5, 0.5, 0.5),
    ];

    let faces = vec![
        // Front (+Z)
        face(4, 5, 6),
        face(4, 6, 7),
        // Back (-Z)
        face(1, 0, 3),
        face(1, 3, 2),
        // Left (-X)
        face(0, 4, 7),
        face(0, 7, 3),
        // Right (+X)
        face(5, 1, 2),
        face(5, 2, 6),
        // Top (+Y)
        face(7, 6, 2),
        face(7, 2, 3),
        // Bottom (-Y)
        face(0, 1, 5),
        face(0, 5, 4),
    ];

    MeshModel::new(faces, vertices, Vec::new(), Vec::new(), name)
        .expect("cube geometry is statically valid")
}

/// Generate a UV sphere of the given radius centered at the origin.
///
/// `longitude_segments` is clamped to at least 3 and `latitude_segments` to
/// at least 2, matching the minimum closed topology.
pub fn uv_sphere(name: &str, radius: f32, longitude_segments: u32, latitude_segments: u32) -> MeshModel {
    let long_segs = longitude_segments.max(3) as usize;
    let lat_segs = latitude_segments.max(2) as usize;

    let mut vertices = Vec::new();
    let mut texcoords = Vec::new();

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32; // 0 to PI
        let (sin_theta, cos_theta) = theta.sin_cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();

            vertices.push(
                Vector3::new(sin_theta * cos_phi, cos_theta, sin_theta * sin_phi) * radius,
            );
            texcoords.push(Vector2::new(
                long as f32 / long_segs as f32,
                lat as f32 / lat_segs as f32,
            ));
        }
    }

    // Texture coordinates are one-to-one with positions here
    let textured = |a: usize, b: usize, c: usize| Face {
        corners: [a, b, c].map(|position| FaceCorner {
            position,
            normal: None,
            texcoord: Some(position),
        }),
    };

    let ring = long_segs + 1;
    let mut faces = Vec::new();
    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let current = lat * ring + long;
            let next = current + ring;

            // Two triangles per quad; degenerate ones at the poles still
            // carry valid indices and zero area
            faces.push(textured(current, next, current + 1));
            faces.push(textured(current + 1, next, next + 1));
        }
    }

    MeshModel::new(faces, vertices, Vec::new(), texcoords, name)
        .expect("sphere geometry is statically valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    #[test]
    fn test_cube_generation() {
        let cube = unit_cube("cube");
        assert_eq!(cube.vertices().len(), 8);
        assert_eq!(cube.faces().len(), 12); // 6 faces * 2 triangles
        assert_eq!(cube.triangles().len(), 12);
        assert_eq!(cube.bounds().mins, Vector3::new(-0.5, -0.5, -0.5));
        assert_eq!(cube.bounds().maxs, Vector3::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_cube_corner_normals_point_outward() {
        let cube = unit_cube("cube");
        for (v, n) in cube.vertices().iter().zip(cube.normals()) {
            // Averaged corner normals of a cube point along the diagonal
            assert!(n.dot(*v) > 0.0);
        }
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = uv_sphere("sphere", 1.0, 8, 6);
        assert_eq!(sphere.vertices().len(), 9 * 7);
        assert_eq!(sphere.faces().len(), 8 * 6 * 2);
        for v in sphere.vertices() {
            assert!((v.magnitude() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_sphere_radius_scales_bounds() {
        let sphere = uv_sphere("sphere", 0.25, 6, 4);
        assert!((sphere.bounds().maxs.y - 0.25).abs() < 1e-5);
    }
}
