//! Wavefront OBJ loading.
//!
//! Parsing is delegated to `tobj`; this module's job is to turn the flat
//! position/normal/texcoord arrays and index streams into a validated
//! [`MeshModel`]. Faces keep their separate per-corner position, normal and
//! texture indices (`single_index` is off) so the mesh constructor can
//! resolve them exactly as the file authored them. A file with no normals
//! gets averaged per-vertex normals from the mesh constructor.

use std::path::Path;

use cgmath::{Vector2, Vector3};
use log::warn;
use thiserror::Error;

use crate::scene::mesh::{Face, FaceCorner, MeshError, MeshModel};

#[derive(Debug, Error)]
pub enum MeshLoadError {
    #[error("failed to parse OBJ file: {0}")]
    Parse(#[from] tobj::LoadError),
    #[error(transparent)]
    Geometry(#[from] MeshError),
    #[error("OBJ file \"{0}\" contains no geometry")]
    NoGeometry(String),
}

/// Loads an OBJ file into a single [`MeshModel`].
///
/// Multi-object files are merged; faces are triangulated by the parser.
/// The model is named after the file stem.
pub fn load_obj(path: impl AsRef<Path>) -> Result<MeshModel, MeshLoadError> {
    let path = path.as_ref();
    let (objects, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: false,
            ..Default::default()
        },
    )?;

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());

    if objects.is_empty() {
        return Err(MeshLoadError::NoGeometry(name));
    }

    let mut vertices: Vec<Vector3<f32>> = Vec::new();
    let mut normals: Vec<Vector3<f32>> = Vec::new();
    let mut texcoords: Vec<Vector2<f32>> = Vec::new();
    let mut faces: Vec<Face> = Vec::new();

    for object in &objects {
        let mesh = &object.mesh;
        let base_v = vertices.len();
        let base_n = normals.len();
        let base_t = texcoords.len();

        vertices.extend(
            mesh.positions
                .chunks_exact(3)
                .map(|p| Vector3::new(p[0], p[1], p[2])),
        );
        normals.extend(
            mesh.normals
                .chunks_exact(3)
                .map(|n| Vector3::new(n[0], n[1], n[2])),
        );
        texcoords.extend(
            mesh.texcoords
                .chunks_exact(2)
                .map(|t| Vector2::new(t[0], t[1])),
        );

        let has_normals = !mesh.normal_indices.is_empty();
        let has_texcoords = !mesh.texcoord_indices.is_empty();

        for (i, triple) in mesh.indices.chunks_exact(3).enumerate() {
            let corner = |slot: usize| {
                let flat = i * 3 + slot;
                FaceCorner {
                    position: base_v + triple[slot] as usize,
                    normal: has_normals
                        .then(|| base_n + mesh.normal_indices[flat] as usize),
                    texcoord: has_texcoords
                        .then(|| base_t + mesh.texcoord_indices[flat] as usize),
                }
            };
            faces.push(Face {
                corners: [corner(0), corner(1), corner(2)],
            });
        }
    }

    if vertices.is_empty() || faces.is_empty() {
        return Err(MeshLoadError::NoGeometry(name));
    }

    if normals.is_empty() {
        warn!("{}: no vertex normals in file, averaging face normals", name);
    }

    Ok(MeshModel::new(faces, vertices, normals, texcoords, name)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CUBE_OBJ: &str = "\
# unit cube, no normals
v -0.5 -0.5 -0.5
v 0.5 -0.5 -0.5
v 0.5 0.5 -0.5
v -0.5 0.5 -0.5
v -0.5 -0.5 0.5
v 0.5 -0.5 0.5
v 0.5 0.5 0.5
v -0.5 0.5 0.5
f 5 6 7
f 5 7 8
f 2 1 4
f 2 4 3
f 1 5 8
f 1 8 4
f 6 2 3
f 6 3 7
f 8 7 3
f 8 3 4
f 1 2 6
f 1 6 5
";

    fn write_temp_obj(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_counts_match_file() {
        let path = write_temp_obj("meshview_cube_counts.obj", CUBE_OBJ);
        let model = load_obj(&path).unwrap();
        assert_eq!(model.vertices().len(), 8);
        assert_eq!(model.faces().len(), 12);
    }

    #[test]
    fn test_load_twice_identical_bounds() {
        let path = write_temp_obj("meshview_cube_repeat.obj", CUBE_OBJ);
        let a = load_obj(&path).unwrap();
        let b = load_obj(&path).unwrap();
        assert_eq!(a.bounds(), b.bounds());
        assert_eq!(a.bounds().mins, Vector3::new(-0.5, -0.5, -0.5));
    }

    #[test]
    fn test_missing_normals_synthesized() {
        let path = write_temp_obj("meshview_cube_normals.obj", CUBE_OBJ);
        let model = load_obj(&path).unwrap();
        assert_eq!(model.normals().len(), model.vertices().len());
    }

    #[test]
    fn test_model_named_after_file_stem() {
        let path = write_temp_obj("meshview_named.obj", CUBE_OBJ);
        let model = load_obj(&path).unwrap();
        assert_eq!(model.name(), "meshview_named");
    }

    #[test]
    fn test_face_with_explicit_normals_keeps_indices() {
        let obj = "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
vt 0 0
vt 1 0
vt 0 1
f 1/1/1 2/2/1 3/3/1
";
        let path = write_temp_obj("meshview_triple.obj", obj);
        let model = load_obj(&path).unwrap();
        assert_eq!(model.faces().len(), 1);
        let corner = model.faces()[0].corners[1];
        assert_eq!(corner.normal, Some(0));
        assert_eq!(corner.texcoord, Some(1));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_obj("/nonexistent/meshview_missing.obj").is_err());
    }
}
