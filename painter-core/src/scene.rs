/// Scene: owns the geometry, camera and light, and runs the render pipeline
use std::ops::Range;

use log::{debug, info, warn};
use thiserror::Error;

use crate::depth::{depth_le, quick_sort_by};
use crate::geometry::Triangle;
use crate::ingest::{build_meshes, DecodedMesh, IngestError};
use crate::projection::Frustum;
use crate::surface::{Rgb, Surface};
use crate::vector::{DegenerateVectorError, Vector3};

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene is already populated")]
    AlreadyPopulated,
    #[error("mesh ingestion failed: {0}")]
    Ingest(#[from] IngestError),
    #[error("light direction must be non-zero")]
    DegenerateLight(#[from] DegenerateVectorError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneState {
    Empty,
    Populated,
}

/// What one render pass did with each stored triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub submitted: usize,
    pub culled: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// Plot the projected corners of every filled triangle.
    pub vertex_markers: bool,
}

/// The triangles that came from one source mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceGroup {
    pub name: String,
    pub range: Range<usize>,
}

/// Unit light direction from spherical angles (radians).
///
/// Azimuth 0 and elevation 0 point along +Z.
pub fn light_from_angles(azimuth: f64, elevation: f64) -> Vector3 {
    let (sa, ca) = azimuth.sin_cos();
    let (se, ce) = elevation.sin_cos();
    Vector3::new(ce * sa, se, ce * ca)
}

pub struct Scene<S: Surface> {
    triangles: Vec<Triangle>,
    faces: Vec<FaceGroup>,
    populated: bool,
    frustum: Frustum,
    light: Vector3,
    options: RenderOptions,
    surface: S,
    // degenerate skips are warned about once per scene, then logged at debug
    reported_skips: bool,
}

impl<S: Surface> Scene<S> {
    /// An empty scene. Fails when `light` is the zero vector.
    pub fn new(frustum: Frustum, light: Vector3, surface: S) -> Result<Self, SceneError> {
        light.normalize()?;
        Ok(Self {
            triangles: Vec::new(),
            faces: Vec::new(),
            populated: false,
            frustum,
            light,
            options: RenderOptions::default(),
            surface,
            reported_skips: false,
        })
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn state(&self) -> SceneState {
        if self.populated {
            SceneState::Populated
        } else {
            SceneState::Empty
        }
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn faces(&self) -> &[FaceGroup] {
        &self.faces
    }

    /// The triangles of `face`, or `None` when its range is not in this scene.
    pub fn face_triangles(&self, face: &FaceGroup) -> Option<&[Triangle]> {
        self.triangles.get(face.range.clone())
    }

    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    pub fn light(&self) -> &Vector3 {
        &self.light
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// One-time ingestion. Nothing is stored unless every mesh is well formed.
    pub fn populate(&mut self, meshes: &[DecodedMesh]) -> Result<(), SceneError> {
        if self.populated {
            return Err(SceneError::AlreadyPopulated);
        }

        let built = build_meshes(meshes)?;
        for mesh in built {
            let start = self.triangles.len();
            let name = mesh.name.clone();
            self.triangles.extend(mesh.into_triangles());
            self.faces.push(FaceGroup {
                name,
                range: start..self.triangles.len(),
            });
        }
        self.populated = true;

        info!(
            "scene populated with {} triangle(s) in {} mesh(es)",
            self.triangles.len(),
            self.faces.len()
        );
        Ok(())
    }

    /// Transform, cull, depth-sort, project and shade every triangle.
    ///
    /// Survivors are submitted in ascending order of their largest camera-space
    /// z, so the farthest are painted first.
    pub fn render(&mut self) -> RenderStats {
        let mut stats = RenderStats::default();
        self.surface.begin_frame();

        let mut visible: Vec<(Triangle, &Triangle)> = Vec::with_capacity(self.triangles.len());
        for (index, triangle) in self.triangles.iter().enumerate() {
            match self.frustum.transform(triangle) {
                Ok(Some(moved)) => visible.push((moved, triangle)),
                Ok(None) => stats.culled += 1,
                Err(e) => {
                    debug!("skipping triangle {}: {}", index, e);
                    stats.skipped += 1;
                }
            }
        }

        quick_sort_by(&mut visible, |a, b| depth_le(&a.0, &b.0));

        for (moved, original) in &visible {
            match self
                .frustum
                .project_triangle(moved, original, &self.light, &mut self.surface)
            {
                Ok(points) => {
                    stats.submitted += 1;
                    if self.options.vertex_markers {
                        for (x, y) in points {
                            self.surface.plot_point(x, y, Rgb::WHITE);
                        }
                    }
                }
                Err(e) => {
                    debug!("skipping triangle while shading: {}", e);
                    stats.skipped += 1;
                }
            }
        }

        if stats.skipped > 0 && !self.reported_skips {
            warn!(
                "skipped {} degenerate triangle(s); later frames log skips at debug level",
                stats.skipped
            );
            self.reported_skips = true;
        }

        debug!(
            "rendered {:?} at {:?}, front {}",
            stats,
            self.frustum.orientation(),
            self.frustum.front()
        );
        stats
    }

    pub fn set_azimuth(&mut self, azimuth: f64) -> RenderStats {
        self.frustum.set_azimuth(azimuth);
        self.render()
    }

    pub fn set_elevation(&mut self, elevation: f64) -> RenderStats {
        self.frustum.set_elevation(elevation);
        self.render()
    }

    pub fn set_angle(&mut self, angle: f64) -> RenderStats {
        self.frustum.set_angle(angle);
        self.render()
    }

    pub fn set_distance(&mut self, distance: f64) -> RenderStats {
        self.frustum.set_distance(distance);
        self.render()
    }

    /// Point the light by spherical angles.
    pub fn set_light(&mut self, azimuth: f64, elevation: f64) -> RenderStats {
        self.light = light_from_angles(azimuth, elevation);
        self.render()
    }

    /// Point the light along an explicit vector; the zero vector is rejected.
    pub fn set_light_direction(&mut self, direction: Vector3) -> Result<RenderStats, SceneError> {
        direction.normalize()?;
        self.light = direction;
        Ok(self.render())
    }
}
