/// Triangle and mesh primitives
use crate::vector::{DegenerateVectorError, Vector3};

/// Three ordered vertices. The winding decides which side is the front.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub p1: Vector3,
    pub p2: Vector3,
    pub p3: Vector3,
    cross: Vector3,
}

impl Triangle {
    pub fn new(p1: Vector3, p2: Vector3, p3: Vector3) -> Self {
        let cross = p2.sub(&p1).cross(&p3.sub(&p1));
        Self { p1, p2, p3, cross }
    }

    pub fn vertices(&self) -> [&Vector3; 3] {
        [&self.p1, &self.p2, &self.p3]
    }

    /// Unnormalized face normal, `(p2 - p1) x (p3 - p1)`.
    pub fn edge_cross(&self) -> Vector3 {
        self.cross
    }

    /// Unit face normal. Fails for zero-area triangles.
    pub fn normal(&self) -> Result<Vector3, DegenerateVectorError> {
        self.cross.normalize()
    }

    /// Largest z coordinate among the three vertices.
    pub fn max_depth(&self) -> f64 {
        self.p1.z().max(self.p2.z()).max(self.p3.z())
    }
}

/// A named, append-only list of triangles from one source mesh.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub name: String,
    triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn into_triangles(self) -> Vec<Triangle> {
        self.triangles
    }

    /// Two square pyramids sharing the base (±1, ±1, 0), apexes at z = ±1.
    ///
    /// Vertex order is kept as-is, so the sides do not share one winding.
    pub fn double_pyramid(name: impl Into<String>) -> Self {
        let v = Vector3::new;
        let mut mesh = Self::with_capacity(name, 8);
        for &(a, b) in &[
            ((1.0, 1.0), (1.0, -1.0)),
            ((-1.0, 1.0), (-1.0, -1.0)),
            ((1.0, -1.0), (-1.0, -1.0)),
            ((1.0, 1.0), (-1.0, 1.0)),
        ] {
            for apex in [1.0, -1.0] {
                mesh.add_triangle(Triangle::new(
                    v(a.0, a.1, 0.0),
                    v(b.0, b.1, 0.0),
                    v(0.0, 0.0, apex),
                ));
            }
        }
        mesh
    }

    /// Axis-aligned cube centred on the origin, wound outward.
    pub fn cube(size: f64) -> Self {
        let h = size / 2.0;
        let mut mesh = Self::with_capacity("cube", 12);

        // (normal, four corners counter-clockwise seen from outside)
        let sides: [([f64; 3], [[f64; 3]; 4]); 6] = [
            ([0.0, 0.0, 1.0], [[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]]),
            ([0.0, 0.0, -1.0], [[-h, -h, -h], [-h, h, -h], [h, h, -h], [h, -h, -h]]),
            ([0.0, 1.0, 0.0], [[-h, h, -h], [-h, h, h], [h, h, h], [h, h, -h]]),
            ([0.0, -1.0, 0.0], [[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]]),
            ([1.0, 0.0, 0.0], [[h, -h, -h], [h, h, -h], [h, h, h], [h, -h, h]]),
            ([-1.0, 0.0, 0.0], [[-h, -h, -h], [-h, -h, h], [-h, h, h], [-h, h, -h]]),
        ];

        for (normal, [a, b, c, d]) in sides {
            let n = Vector3::from(normal);
            let vertex = |p: [f64; 3]| Vector3::with_normal(p.into(), n);
            mesh.add_triangle(Triangle::new(vertex(a), vertex(b), vertex(c)));
            mesh.add_triangle(Triangle::new(vertex(a), vertex(c), vertex(d)));
        }

        mesh
    }
}
