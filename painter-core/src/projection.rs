/// Camera frustum: orientation, depth bounds, transform and projection
use log::trace;

use crate::geometry::Triangle;
use crate::surface::{Rgb, Surface};
use crate::transform::{Basis, Orientation};
use crate::vector::{DegenerateVectorError, Vector3};

/// Depth units between the near plane and the vanishing point.
pub const VANISHING_DISTANCE: f64 = 10.0;

/// The camera's bounded view volume.
///
/// Camera space is expressed in the orientation's basis. Geometry is visible
/// when every vertex lies strictly between `rear` and `front` on the view axis;
/// lower z is farther from the eye.
#[derive(Debug, Clone, PartialEq)]
pub struct Frustum {
    pub width: f64,
    pub height: f64,
    front: f64,
    rear: f64,
    orientation: Orientation,
    basis: Basis,
}

impl Frustum {
    pub fn new(width: f64, height: f64, front: f64, rear: f64) -> Self {
        Self {
            width,
            height,
            front,
            rear,
            orientation: Orientation::default(),
            basis: Basis::world(),
        }
    }

    pub fn front(&self) -> f64 {
        self.front
    }

    pub fn rear(&self) -> f64 {
        self.rear
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    pub fn set_azimuth(&mut self, azimuth: f64) {
        self.orientation.azimuth = azimuth;
        self.update_basis();
    }

    pub fn set_elevation(&mut self, elevation: f64) {
        self.orientation.elevation = elevation;
        self.update_basis();
    }

    pub fn set_angle(&mut self, angle: f64) {
        self.orientation.angle = angle;
        self.update_basis();
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
        self.update_basis();
    }

    /// Moves the near plane, i.e. pulls the camera back along the view axis.
    pub fn set_distance(&mut self, distance: f64) {
        self.front = distance;
    }

    fn update_basis(&mut self) {
        self.basis = self.orientation.basis();
        trace!(
            "camera basis for {:?}: right={:?} up={:?} forward={:?}",
            self.orientation,
            self.basis.right.components(),
            self.basis.up.components(),
            self.basis.forward.components()
        );
    }

    fn in_depth_range(&self, z: f64) -> bool {
        z < self.front && z > self.rear
    }

    /// World space to camera space, culling in the same pass.
    ///
    /// `Ok(None)` means the triangle is back-facing or has a vertex outside
    /// `(rear, front)`. Zero-area triangles fail with `DegenerateVectorError`.
    pub fn transform(&self, triangle: &Triangle) -> Result<Option<Triangle>, DegenerateVectorError> {
        let moved = Triangle::new(
            self.basis.express(&triangle.p1),
            self.basis.express(&triangle.p2),
            self.basis.express(&triangle.p3),
        );

        // Camera-space view axis is +Z.
        if moved.normal()?.z() <= 0.0 {
            return Ok(None);
        }

        if !moved.vertices().iter().all(|p| self.in_depth_range(p.z())) {
            return Ok(None);
        }

        Ok(Some(moved))
    }

    /// Linear perspective: x and y shrink with distance from the vanishing point.
    pub fn project_point(&self, p: &Vector3) -> (f64, f64) {
        let vanishing_point = self.front + VANISHING_DISTANCE;
        let factor = VANISHING_DISTANCE / (vanishing_point - p.z()).abs();
        (p.x() * factor, p.y() * factor)
    }

    /// Lambertian intensity of the world-space face for a light direction.
    pub fn shade(&self, original: &Triangle, light: &Vector3) -> Result<Rgb, DegenerateVectorError> {
        let intensity = original.normal()?.dot(&light.normalize()?);
        Ok(Rgb::blue(intensity.max(0.0)))
    }

    /// Shade `original`, project `transformed` and fill it on the surface.
    ///
    /// Nothing is drawn when shading fails.
    pub fn project_triangle<S: Surface + ?Sized>(
        &self,
        transformed: &Triangle,
        original: &Triangle,
        light: &Vector3,
        surface: &mut S,
    ) -> Result<[(f64, f64); 3], DegenerateVectorError> {
        let color = self.shade(original, light)?;
        let points = [
            self.project_point(&transformed.p1),
            self.project_point(&transformed.p2),
            self.project_point(&transformed.p3),
        ];
        surface.fill_polygon(points, color);
        Ok(points)
    }
}

impl Default for Frustum {
    fn default() -> Self {
        Self::new(100.0, 100.0, 5.0, -100.0)
    }
}
