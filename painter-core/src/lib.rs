/// Painter Core Library - CPU rendering pipeline
///
/// This library turns a triangle soup into back-to-front filled polygons:
/// vector/matrix math, the camera frustum, culling, painter's-algorithm
/// ordering, Lambertian shading, and mesh ingestion from OBJ and STL files.

pub mod config;
pub mod depth;
pub mod geometry;
pub mod ingest;
pub mod obj;
pub mod projection;
pub mod scene;
pub mod stl;
pub mod surface;
pub mod transform;
pub mod vector;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use geometry::{Mesh, Triangle};
pub use ingest::{DecodedMesh, DecodedVertex, IngestError};
pub use projection::Frustum;
pub use scene::{RenderOptions, RenderStats, Scene, SceneError, SceneState};
pub use surface::{Rgb, Surface};
pub use transform::{Matrix3x3, Orientation};
pub use vector::{DegenerateVectorError, Vector3};
