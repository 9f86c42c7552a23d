/// 3D vector value type used throughout the pipeline
use nalgebra::Vector3 as NVector3;
use thiserror::Error;

/// Returned when a zero-length vector is normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot normalize a zero-length vector")]
pub struct DegenerateVectorError;

/// A real-valued (x, y, z) triple.
///
/// Mesh vertices may also carry an independent normal. Arithmetic never
/// propagates it: every operation returns a plain vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector3 {
    xyz: NVector3<f64>,
    normal: Option<NVector3<f64>>,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            xyz: NVector3::new(x, y, z),
            normal: None,
        }
    }

    /// A mesh vertex: position plus its own normal direction.
    pub fn with_normal(position: Vector3, normal: Vector3) -> Self {
        Self {
            xyz: position.xyz,
            normal: Some(normal.xyz),
        }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn unit_x() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    pub fn unit_y() -> Self {
        Self::new(0.0, 1.0, 0.0)
    }

    pub fn unit_z() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }

    pub fn x(&self) -> f64 {
        self.xyz.x
    }

    pub fn y(&self) -> f64 {
        self.xyz.y
    }

    pub fn z(&self) -> f64 {
        self.xyz.z
    }

    pub fn components(&self) -> (f64, f64, f64) {
        (self.xyz.x, self.xyz.y, self.xyz.z)
    }

    /// The vertex normal, if this vector came from a mesh vertex.
    pub fn normal(&self) -> Option<Vector3> {
        self.normal.map(Self::from)
    }

    pub fn add(&self, other: &Vector3) -> Vector3 {
        (self.xyz + other.xyz).into()
    }

    pub fn sub(&self, other: &Vector3) -> Vector3 {
        (self.xyz - other.xyz).into()
    }

    pub fn scale(&self, scalar: f64) -> Vector3 {
        (self.xyz * scalar).into()
    }

    pub fn dot(&self, other: &Vector3) -> f64 {
        self.xyz.dot(&other.xyz)
    }

    pub fn cross(&self, other: &Vector3) -> Vector3 {
        self.xyz.cross(&other.xyz).into()
    }

    pub fn length(&self) -> f64 {
        self.xyz.norm()
    }

    /// Unit vector in the same direction.
    pub fn normalize(&self) -> Result<Vector3, DegenerateVectorError> {
        let length = self.length();
        if length == 0.0 || !length.is_finite() {
            return Err(DegenerateVectorError);
        }
        Ok((self.xyz / length).into())
    }

    /// Distance from `other`, ignoring any carried normals.
    pub fn distance(&self, other: &Vector3) -> f64 {
        self.sub(other).length()
    }

    pub(crate) fn raw(&self) -> &NVector3<f64> {
        &self.xyz
    }
}

impl From<NVector3<f64>> for Vector3 {
    fn from(xyz: NVector3<f64>) -> Self {
        Self { xyz, normal: None }
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from(c: [f64; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl Default for Vector3 {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(-4.0, 0.5, 2.0);

        assert_eq!(a.add(&b), Vector3::new(-3.0, 2.5, 5.0));
        assert_eq!(a.sub(&b), Vector3::new(5.0, 1.5, 1.0));
        assert_eq!(a.scale(2.0), Vector3::new(2.0, 4.0, 6.0));
        assert_eq!(a.dot(&b), -4.0 + 1.0 + 6.0);
    }

    #[test]
    fn test_cross_follows_right_hand_rule() {
        let z = Vector3::unit_x().cross(&Vector3::unit_y());
        assert_eq!(z, Vector3::unit_z());
        let x = Vector3::unit_y().cross(&Vector3::unit_z());
        assert_eq!(x, Vector3::unit_x());
    }

    #[test]
    fn test_normalize_gives_unit_length() {
        let samples = [
            Vector3::new(3.0, 4.0, 0.0),
            Vector3::new(-0.001, 0.002, 0.0005),
            Vector3::new(1e6, -2e6, 3e6),
            Vector3::new(0.3, 0.5, 0.8),
        ];
        for v in samples {
            let n = v.normalize().unwrap();
            assert!((n.length() - 1.0).abs() < 1e-12, "{:?}", v);
        }
    }

    #[test]
    fn test_normalize_zero_vector_fails() {
        assert_eq!(Vector3::zero().normalize(), Err(DegenerateVectorError));
    }

    #[test]
    fn test_normal_is_not_propagated() {
        let vertex = Vector3::with_normal(Vector3::new(1.0, 0.0, 0.0), Vector3::unit_z());
        assert_eq!(vertex.normal(), Some(Vector3::unit_z()));
        assert_eq!(vertex.add(&Vector3::zero()).normal(), None);
        assert_eq!(vertex.scale(1.0).normal(), None);
    }
}
