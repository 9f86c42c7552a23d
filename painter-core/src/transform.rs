/// Rotation matrices and camera orientation state
use nalgebra::Matrix3;

use crate::vector::Vector3;

/// 3x3 real matrix, only ever built as an axis rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3x3 {
    m: Matrix3<f64>,
}

impl Matrix3x3 {
    /// Build from three row vectors.
    pub fn from_rows(r0: [f64; 3], r1: [f64; 3], r2: [f64; 3]) -> Self {
        Self {
            m: Matrix3::new(
                r0[0], r0[1], r0[2], //
                r1[0], r1[1], r1[2], //
                r2[0], r2[1], r2[2],
            ),
        }
    }

    pub fn identity() -> Self {
        Self {
            m: Matrix3::identity(),
        }
    }

    pub fn row(&self, i: usize) -> Vector3 {
        Vector3::new(self.m[(i, 0)], self.m[(i, 1)], self.m[(i, 2)])
    }

    pub fn mul_vector(&self, v: &Vector3) -> Vector3 {
        (self.m * v.raw()).into()
    }

    /// `self · other`, i.e. `other` is applied first.
    pub fn compose(&self, other: &Matrix3x3) -> Matrix3x3 {
        Self { m: self.m * other.m }
    }

    /// Rotation about the X axis (camera elevation).
    pub fn rotation_x(elevation: f64) -> Self {
        let (s, c) = elevation.sin_cos();
        Self::from_rows([1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c])
    }

    /// Rotation about the Y axis (camera azimuth).
    pub fn rotation_y(azimuth: f64) -> Self {
        let (s, c) = azimuth.sin_cos();
        Self::from_rows([c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c])
    }

    /// Rotation about the Z axis (camera roll).
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0])
    }
}

/// Camera orientation in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    pub azimuth: f64,
    pub elevation: f64,
    pub angle: f64,
}

/// Orthonormal camera basis: right, up and forward (view axis).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    pub right: Vector3,
    pub up: Vector3,
    pub forward: Vector3,
}

impl Basis {
    pub fn world() -> Self {
        Self {
            right: Vector3::unit_x(),
            up: Vector3::unit_y(),
            forward: Vector3::unit_z(),
        }
    }

    /// Coordinates of `p` relative to this basis.
    pub fn express(&self, p: &Vector3) -> Vector3 {
        Vector3::new(p.dot(&self.right), p.dot(&self.up), p.dot(&self.forward))
    }
}

impl Orientation {
    pub fn new(azimuth: f64, elevation: f64, angle: f64) -> Self {
        Self {
            azimuth,
            elevation,
            angle,
        }
    }

    /// `Rz · Ry · Rx`: elevation first, roll last.
    pub fn rotation_matrix(&self) -> Matrix3x3 {
        let rx = Matrix3x3::rotation_x(self.elevation);
        let ry = Matrix3x3::rotation_y(self.azimuth);
        let rz = Matrix3x3::rotation_z(self.angle);
        rz.compose(&ry).compose(&rx)
    }

    /// The composed rotation applied to the world axes.
    pub fn basis(&self) -> Basis {
        let r = self.rotation_matrix();
        Basis {
            right: r.mul_vector(&Vector3::unit_x()),
            up: r.mul_vector(&Vector3::unit_y()),
            forward: r.mul_vector(&Vector3::unit_z()),
        }
    }
}
