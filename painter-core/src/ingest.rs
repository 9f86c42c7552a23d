/// Mesh ingestion: decoded vertex data into triangles
use std::fs;
use std::path::Path;

use log::info;
use thiserror::Error;

use crate::geometry::{Mesh, Triangle};
use crate::vector::Vector3;
use crate::{obj, stl};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("mesh '{mesh}' declares {faces} faces but carries {vertices} vertices")]
    VertexCountMismatch {
        mesh: String,
        faces: usize,
        vertices: usize,
    },
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("malformed STL: {0}")]
    Stl(String),
    #[error("unsupported mesh format '{0}'")]
    UnsupportedFormat(String),
    #[error("failed to read mesh file")]
    Io(#[from] std::io::Error),
}

/// One decoded vertex: where it is and which way its surface faces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedVertex {
    pub position: Vector3,
    pub normal: Vector3,
}

impl DecodedVertex {
    pub fn new(position: Vector3, normal: Vector3) -> Self {
        Self { position, normal }
    }
}

/// Vertex triples of one source mesh, plus the face count the source declared.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedMesh {
    pub name: String,
    pub vertices: Vec<DecodedVertex>,
    pub face_count: usize,
}

impl DecodedMesh {
    pub fn new(name: impl Into<String>, vertices: Vec<DecodedVertex>, face_count: usize) -> Self {
        Self {
            name: name.into(),
            vertices,
            face_count,
        }
    }

    /// Check that the vertices split into exactly `face_count` triangles.
    pub fn validate(&self) -> Result<(), IngestError> {
        if self.vertices.len() != self.face_count * 3 {
            return Err(IngestError::VertexCountMismatch {
                mesh: self.name.clone(),
                faces: self.face_count,
                vertices: self.vertices.len(),
            });
        }
        Ok(())
    }

    pub fn to_mesh(&self) -> Result<Mesh, IngestError> {
        self.validate()?;
        let mut mesh = Mesh::with_capacity(self.name.clone(), self.face_count);
        for chunk in self.vertices.chunks_exact(3) {
            let vertex = |v: &DecodedVertex| Vector3::with_normal(v.position, v.normal);
            mesh.add_triangle(Triangle::new(
                vertex(&chunk[0]),
                vertex(&chunk[1]),
                vertex(&chunk[2]),
            ));
        }
        Ok(mesh)
    }
}

impl From<&Mesh> for DecodedMesh {
    fn from(mesh: &Mesh) -> Self {
        let mut vertices = Vec::with_capacity(mesh.len() * 3);
        for triangle in mesh.triangles() {
            let face = triangle.normal().unwrap_or_default();
            for p in triangle.vertices() {
                vertices.push(DecodedVertex::new(*p, p.normal().unwrap_or(face)));
            }
        }
        Self::new(mesh.name.clone(), vertices, mesh.len())
    }
}

/// Convert every decoded mesh, failing on the first malformed one.
pub fn build_meshes(decoded: &[DecodedMesh]) -> Result<Vec<Mesh>, IngestError> {
    decoded.iter().map(DecodedMesh::to_mesh).collect()
}

/// Read and decode an OBJ or STL file, chosen by extension.
pub fn load_path(path: impl AsRef<Path>) -> Result<Vec<DecodedMesh>, IngestError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let meshes = match extension.as_str() {
        "obj" => obj::parse_obj(&fs::read_to_string(path)?)?,
        "stl" => {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("stl");
            vec![stl::parse_stl(name, &fs::read(path)?)?]
        }
        other => return Err(IngestError::UnsupportedFormat(other.to_string())),
    };

    info!(
        "decoded {} mesh(es), {} face(s) from {}",
        meshes.len(),
        meshes.iter().map(|m| m.face_count).sum::<usize>(),
        path.display()
    );
    Ok(meshes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(x: f64, y: f64, z: f64) -> DecodedVertex {
        DecodedVertex::new(Vector3::new(x, y, z), Vector3::unit_z())
    }

    #[test]
    fn test_to_mesh_groups_in_threes() {
        let decoded = DecodedMesh::new(
            "quad",
            vec![
                vertex(0.0, 0.0, 0.0),
                vertex(1.0, 0.0, 0.0),
                vertex(1.0, 1.0, 0.0),
                vertex(0.0, 0.0, 0.0),
                vertex(1.0, 1.0, 0.0),
                vertex(0.0, 1.0, 0.0),
            ],
            2,
        );
        let mesh = decoded.to_mesh().unwrap();
        assert_eq!(mesh.name, "quad");
        assert_eq!(mesh.len(), 2);
        assert_eq!(mesh.triangles()[1].p3.components(), (0.0, 1.0, 0.0));
        assert_eq!(mesh.triangles()[1].p3.normal(), Some(Vector3::unit_z()));
    }

    #[test]
    fn test_face_count_mismatch() {
        let decoded = DecodedMesh::new("broken", vec![vertex(0.0, 0.0, 0.0); 4], 1);
        match decoded.to_mesh() {
            Err(IngestError::VertexCountMismatch { mesh, faces, vertices }) => {
                assert_eq!(mesh, "broken");
                assert_eq!(faces, 1);
                assert_eq!(vertices, 4);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_build_meshes_is_all_or_nothing() {
        let good = DecodedMesh::new("good", vec![vertex(0.0, 0.0, 0.0); 3], 1);
        let bad = DecodedMesh::new("bad", vec![vertex(0.0, 0.0, 0.0); 3], 2);
        assert!(build_meshes(&[good.clone(), bad]).is_err());
        assert_eq!(build_meshes(&[good]).unwrap().len(), 1);
    }

    #[test]
    fn test_from_mesh_round_trips_geometry() {
        let cube = Mesh::cube(1.0);
        let decoded = DecodedMesh::from(&cube);
        assert_eq!(decoded.face_count, 12);
        let rebuilt = decoded.to_mesh().unwrap();
        assert_eq!(rebuilt.triangles(), cube.triangles());
    }

    fn scratch(file: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("painter-ingest-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir.join(file)
    }

    fn one_facet_stl() -> Vec<u8> {
        let mut data = vec![0u8; 80];
        data.extend_from_slice(&1u32.to_le_bytes());
        let facet: [f32; 12] = [0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        for c in facet {
            data.extend_from_slice(&c.to_le_bytes());
        }
        data.extend_from_slice(&[0, 0]);
        data
    }

    #[test]
    fn test_load_obj_by_extension() {
        let demo = concat!(env!("CARGO_MANIFEST_DIR"), "/../demos/pyramids.obj");
        let meshes = load_path(demo).unwrap();
        let names: Vec<&str> = meshes.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["upper", "lower"]);
        assert!(build_meshes(&meshes).is_ok());

        // extensions are matched case-insensitively
        let upper = scratch("PYRAMIDS.OBJ");
        fs::copy(demo, &upper).unwrap();
        assert_eq!(load_path(&upper).unwrap(), meshes);
    }

    #[test]
    fn test_load_stl_named_after_file() {
        let path = scratch("wedge.stl");
        fs::write(&path, one_facet_stl()).unwrap();
        let meshes = load_path(&path).unwrap();
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0].name, "wedge");
        assert_eq!(meshes[0].face_count, 1);
        assert_eq!(meshes[0].vertices[1].position, Vector3::new(1.0, 0.0, 0.0));
    }

    #[cfg(unix)]
    #[test]
    fn test_load_stl_with_non_utf8_stem() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = scratch("x").with_file_name(OsStr::from_bytes(b"\xff\xfe.stl"));
        fs::write(&path, one_facet_stl()).unwrap();
        let meshes = load_path(&path).unwrap();
        assert_eq!(meshes[0].name, "stl");
    }

    #[test]
    fn test_missing_file() {
        let path = scratch("does-not-exist.obj");
        assert!(matches!(load_path(&path), Err(IngestError::Io(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            load_path("scene.ply"),
            Err(IngestError::UnsupportedFormat(ext)) if ext == "ply"
        ));
    }
}
