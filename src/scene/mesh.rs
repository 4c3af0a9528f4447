//! Mesh geometry and per-instance model state.
//!
//! A [`MeshModel`] owns the immutable source geometry (positions, normals,
//! texture coordinates and per-face index triples), a flattened triangle
//! list derived once at construction, and the mutable per-instance state the
//! UI edits between frames: transform, color, material and display flags.
//! The cached world transform is only recomputed by an explicit call to
//! [`MeshModel::update_world_transform`]; the scene does this at the start
//! of every frame before the renderer reads it.

use cgmath::{InnerSpace, Matrix4, SquareMatrix, Vector2, Vector3, Zero};
use thiserror::Error;

use crate::math::compose_transform;

/// Geometry validation failures, fatal for the load that produced them.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshError {
    #[error("face {face} references out-of-range {kind} index {index} ({count} available)")]
    IndexOutOfRange {
        face: usize,
        kind: &'static str,
        index: usize,
        count: usize,
    },
    #[error("mesh \"{0}\" has no vertices")]
    Empty(String),
}

/// A render-ready vertex: one corner of one triangle.
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Vector3<f32>,
    pub normal: Vector3<f32>,
    pub texcoord: Vector2<f32>,
}

/// One corner of a face. Indices are zero-based into the mesh's vertex,
/// normal and texture-coordinate arrays (the OBJ loader converts from the
/// file's one-based form).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceCorner {
    pub position: usize,
    pub normal: Option<usize>,
    pub texcoord: Option<usize>,
}

/// A triangular face as three corner index triples. Never mutated after
/// load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub corners: [FaceCorner; 3],
}

/// Axis-aligned bounds of a vertex set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub mins: Vector3<f32>,
    pub maxs: Vector3<f32>,
}

impl BoundingBox {
    pub fn from_points(points: &[Vector3<f32>]) -> Self {
        let mut mins = Vector3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY);
        let mut maxs = -mins;
        for p in points {
            mins = Vector3::new(mins.x.min(p.x), mins.y.min(p.y), mins.z.min(p.z));
            maxs = Vector3::new(maxs.x.max(p.x), maxs.y.max(p.y), maxs.z.max(p.z));
        }
        Self { mins, maxs }
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.mins + self.maxs) * 0.5
    }

    /// The eight corner points, used by the bounding-box overlay.
    pub fn corners(&self) -> [Vector3<f32>; 8] {
        let (lo, hi) = (self.mins, self.maxs);
        [
            Vector3::new(lo.x, lo.y, lo.z),
            Vector3::new(hi.x, lo.y, lo.z),
            Vector3::new(lo.x, hi.y, lo.z),
            Vector3::new(hi.x, hi.y, lo.z),
            Vector3::new(lo.x, lo.y, hi.z),
            Vector3::new(hi.x, lo.y, hi.z),
            Vector3::new(lo.x, hi.y, hi.z),
            Vector3::new(hi.x, hi.y, hi.z),
        ]
    }
}

/// Phong material weights plus the optional two-color marble mode, which
/// replaces the base color with a barycentric blend before lighting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub shininess: f32,
    pub marble: Option<[Vector3<f32>; 2]>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: 0.15,
            diffuse: 0.75,
            specular: 0.3,
            shininess: 8.0,
            marble: None,
        }
    }
}

/// Per-model display toggles consumed by the renderer each frame.
#[derive(Debug, Clone, Copy)]
pub struct DisplayFlags {
    pub fill: bool,
    pub wireframe: bool,
    pub bounding_box: bool,
    pub vertex_normals: bool,
    pub face_normals: bool,
}

impl Default for DisplayFlags {
    fn default() -> Self {
        Self {
            fill: true,
            wireframe: false,
            bounding_box: false,
            vertex_normals: false,
            face_normals: false,
        }
    }
}

#[derive(Debug)]
pub struct MeshModel {
    name: String,
    faces: Vec<Face>,
    vertices: Vec<Vector3<f32>>,
    normals: Vec<Vector3<f32>>,
    texcoords: Vec<Vector2<f32>>,
    /// Flattened triangle list derived once at construction.
    triangles: Vec<[Vertex; 3]>,
    bounds: BoundingBox,
    centroid: Vector3<f32>,

    // Mutable per-frame state, edited by the UI between frames
    pub scale: Vector3<f32>,
    /// Euler angles in degrees.
    pub rotation: Vector3<f32>,
    pub translation: Vector3<f32>,
    pub color: Vector3<f32>,
    pub material: Material,
    pub flags: DisplayFlags,

    world_transform: Matrix4<f32>,
}

impl MeshModel {
    /// Builds a model from parsed geometry.
    ///
    /// Face indices are validated up front; an out-of-range index rejects
    /// the whole mesh rather than reading out of bounds later. When
    /// `normals` is empty, per-vertex normals are synthesized as the
    /// normalized sum of adjacent face normals (cross products left
    /// unnormalized, so larger faces weigh more).
    pub fn new(
        faces: Vec<Face>,
        vertices: Vec<Vector3<f32>>,
        normals: Vec<Vector3<f32>>,
        texcoords: Vec<Vector2<f32>>,
        name: impl Into<String>,
    ) -> Result<Self, MeshError> {
        let name = name.into();
        if vertices.is_empty() {
            return Err(MeshError::Empty(name));
        }

        validate_indices(&faces, vertices.len(), normals.len(), texcoords.len())?;

        let normals = if normals.is_empty() {
            averaged_vertex_normals(&faces, &vertices)
        } else {
            normals
        };

        let bounds = BoundingBox::from_points(&vertices);
        let centroid = vertices.iter().fold(Vector3::zero(), |acc, v| acc + *v)
            / vertices.len() as f32;

        let triangles = assemble_triangles(&faces, &vertices, &normals, &texcoords);

        Ok(Self {
            name,
            faces,
            vertices,
            normals,
            texcoords,
            triangles,
            bounds,
            centroid,
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation: Vector3::zero(),
            translation: Vector3::zero(),
            color: Vector3::new(0.8, 0.8, 0.8),
            material: Material::default(),
            flags: DisplayFlags::default(),
            world_transform: Matrix4::identity(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn vertices(&self) -> &[Vector3<f32>] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Vector3<f32>] {
        &self.normals
    }

    pub fn texcoords(&self) -> &[Vector2<f32>] {
        &self.texcoords
    }

    pub fn triangles(&self) -> &[[Vertex; 3]] {
        &self.triangles
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub fn centroid(&self) -> Vector3<f32> {
        self.centroid
    }

    /// Recomputes the cached world transform from scale/rotation/translation.
    /// Must be called before [`Self::world_transform`] after any edit; the
    /// getter never recomputes on its own.
    pub fn update_world_transform(&mut self) {
        self.world_transform = compose_transform(self.scale, self.rotation, self.translation);
    }

    pub fn world_transform(&self) -> Matrix4<f32> {
        self.world_transform
    }
}

fn validate_indices(
    faces: &[Face],
    vertex_count: usize,
    normal_count: usize,
    texcoord_count: usize,
) -> Result<(), MeshError> {
    for (i, face) in faces.iter().enumerate() {
        for corner in &face.corners {
            if corner.position >= vertex_count {
                return Err(MeshError::IndexOutOfRange {
                    face: i,
                    kind: "vertex",
                    index: corner.position,
                    count: vertex_count,
                });
            }
            if let Some(n) = corner.normal {
                if n >= normal_count {
                    return Err(MeshError::IndexOutOfRange {
                        face: i,
                        kind: "normal",
                        index: n,
                        count: normal_count,
                    });
                }
            }
            if let Some(t) = corner.texcoord {
                if t >= texcoord_count {
                    return Err(MeshError::IndexOutOfRange {
                        face: i,
                        kind: "texcoord",
                        index: t,
                        count: texcoord_count,
                    });
                }
            }
        }
    }
    Ok(())
}

/// Per-vertex normals as the normalized sum of adjacent face normals.
fn averaged_vertex_normals(faces: &[Face], vertices: &[Vector3<f32>]) -> Vec<Vector3<f32>> {
    let mut sums = vec![Vector3::zero(); vertices.len()];

    for face in faces {
        let [a, b, c] = face.corners;
        let v0 = vertices[a.position];
        let v1 = vertices[b.position];
        let v2 = vertices[c.position];
        // Unnormalized cross product: area-weighted contribution
        let face_normal = (v1 - v0).cross(v2 - v0);
        sums[a.position] += face_normal;
        sums[b.position] += face_normal;
        sums[c.position] += face_normal;
    }

    sums.into_iter()
        .map(|n| {
            if n.magnitude2() > 0.0 {
                n.normalize()
            } else {
                Vector3::new(0.0, 0.0, 1.0)
            }
        })
        .collect()
}

fn assemble_triangles(
    faces: &[Face],
    vertices: &[Vector3<f32>],
    normals: &[Vector3<f32>],
    texcoords: &[Vector2<f32>],
) -> Vec<[Vertex; 3]> {
    faces
        .iter()
        .map(|face| {
            face.corners.map(|corner| Vertex {
                position: vertices[corner.position],
                // When the face carries no normal index, fall back to the
                // vertex's own (possibly synthesized) normal
                normal: corner
                    .normal
                    .map(|i| normals[i])
                    .unwrap_or_else(|| normals[corner.position]),
                texcoord: corner
                    .texcoord
                    .map(|i| texcoords[i])
                    .unwrap_or_else(Vector2::zero),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_face(a: usize, b: usize, c: usize) -> Face {
        Face {
            corners: [a, b, c].map(|position| FaceCorner {
                position,
                normal: None,
                texcoord: None,
            }),
        }
    }

    fn quad_mesh() -> MeshModel {
        let vertices = vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        ];
        let faces = vec![triangle_face(0, 1, 2), triangle_face(0, 2, 3)];
        MeshModel::new(faces, vertices, Vec::new(), Vec::new(), "quad").unwrap()
    }

    #[test]
    fn test_bounds_and_centroid() {
        let mesh = quad_mesh();
        assert_eq!(mesh.bounds().mins, Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(mesh.bounds().maxs, Vector3::new(1.0, 1.0, 0.0));
        assert_eq!(mesh.centroid(), Vector3::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn test_out_of_range_vertex_index_rejected() {
        let vertices = vec![Vector3::new(0.0, 0.0, 0.0)];
        let faces = vec![triangle_face(0, 1, 2)];
        let err = MeshModel::new(faces, vertices, Vec::new(), Vec::new(), "broken").unwrap_err();
        assert!(matches!(err, MeshError::IndexOutOfRange { kind: "vertex", .. }));
    }

    #[test]
    fn test_missing_normals_are_synthesized_unit_length() {
        let mesh = quad_mesh();
        assert_eq!(mesh.normals().len(), mesh.vertices().len());
        for n in mesh.normals() {
            assert!((n.magnitude() - 1.0).abs() < 1e-5);
        }
        // A flat quad in the XY plane gets +Z normals everywhere
        for n in mesh.normals() {
            assert!((n.z - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_world_transform_requires_explicit_update() {
        let mut mesh = quad_mesh();
        mesh.translation = Vector3::new(5.0, 0.0, 0.0);
        // Stale until updated
        assert_eq!(mesh.world_transform(), Matrix4::identity());
        mesh.update_world_transform();
        assert_eq!(mesh.world_transform().w.x, 5.0);
    }

    #[test]
    fn test_triangle_list_is_flattened_per_face() {
        let mesh = quad_mesh();
        assert_eq!(mesh.triangles().len(), 2);
        assert_eq!(mesh.triangles()[1][2].position, Vector3::new(0.0, 1.0, 0.0));
    }
}
