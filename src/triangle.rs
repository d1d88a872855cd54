use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;

// This struct represents a triangle defined by three vertices
// The members a, b, and c are zero-based indices into the vertex
// array of the mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face {
    pub a: u32,
    pub b: u32,
    pub c: u32,
}

impl Face {
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self { a, b, c }
    }
}

/// Three positions forming one candidate surface triangle.
///
/// Produced by the candidate collector already expressed in projector-local
/// space and consumed immediately by the clipper.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceTriangle {
    pub vertices: [Vec3; 3],
}

impl SourceTriangle {
    pub const fn new(v1: Vec3, v2: Vec3, v3: Vec3) -> Self {
        Self {
            vertices: [v1, v2, v3],
        }
    }

    /// Apply `matrix` to each vertex as a point.
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let [v1, v2, v3] = self.vertices;
        Self::new(*matrix * v1, *matrix * v2, *matrix * v3)
    }

    /// Unit normal `cross(v2 - v1, v3 - v1)`, or zero for a degenerate triangle.
    pub fn normal(&self) -> Vec3 {
        let [v1, v2, v3] = self.vertices;
        (v2 - v1).cross(v3 - v1).normalize_or_zero()
    }
}
