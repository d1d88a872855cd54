//! Clipping against the projector's unit cube.
//!
//! The projection volume in projector-local space is the closed cube:
//!
//! ```text
//! -0.5 <= x <= 0.5
//! -0.5 <= y <= 0.5
//! -0.5 <= z <= 0.5
//! ```
//!
//! The planes are fixed, so the clipper is stateless and shared by every
//! projector regardless of its transform.

use crate::math::vec3::Vec3;

/// Distance of each cube face from the origin.
pub const HALF_EXTENT: f32 = 0.5;

/// The 6 faces of the unit cube.
///
/// Each face is a half-space whose signed distance is positive inside the
/// cube. Points exactly on a face count as inside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CubeFace {
    /// Front face: z <= 0.5
    Front,
    /// Back face: z >= -0.5
    Back,
    /// Top face: y <= 0.5
    Top,
    /// Bottom face: y >= -0.5
    Bottom,
    /// Right face: x <= 0.5
    Right,
    /// Left face: x >= -0.5
    Left,
}

impl CubeFace {
    /// Clipping order: Z, then Y, then X, positive side first.
    pub const ORDER: [CubeFace; 6] = [
        CubeFace::Front,
        CubeFace::Back,
        CubeFace::Top,
        CubeFace::Bottom,
        CubeFace::Right,
        CubeFace::Left,
    ];

    /// Returns the signed distance from a point to this face.
    /// Positive = inside the cube, Negative = outside.
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        match self {
            Self::Front => HALF_EXTENT - p.z,
            Self::Back => HALF_EXTENT + p.z,
            Self::Top => HALF_EXTENT - p.y,
            Self::Bottom => HALF_EXTENT + p.y,
            Self::Right => HALF_EXTENT - p.x,
            Self::Left => HALF_EXTENT + p.x,
        }
    }
}

/// A convex polygon in projector-local space.
///
/// Starts life as a source triangle; after clipping it holds either zero
/// vertices or a planar convex polygon of three or more.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClippedFace {
    pub vertices: Vec<Vec3>,
}

impl ClippedFace {
    /// Create a polygon from a triangle (3 vertices).
    pub fn from_triangle(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self {
            vertices: vec![v0, v1, v2],
        }
    }

    /// Returns true if the polygon has been completely clipped away.
    pub fn is_empty(&self) -> bool {
        self.vertices.len() < 3
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Clip this polygon against a single face using the Sutherland-Hodgman algorithm.
    /// Returns a new polygon with the clipped vertices.
    pub fn clip_against_face(&self, face: CubeFace) -> Self {
        if self.vertices.len() < 3 {
            return Self { vertices: vec![] };
        }

        let mut output = Vec::with_capacity(self.vertices.len() + 1);

        for i in 0..self.vertices.len() {
            let current = self.vertices[i];
            let next = self.vertices[(i + 1) % self.vertices.len()];

            let d1 = face.signed_distance(current);
            let d2 = face.signed_distance(next);

            if d1 >= 0.0 {
                output.push(current);
            }

            // Only a strict crossing adds a vertex; an endpoint on the face
            // is already emitted as itself.
            if (d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0) {
                let t = d1 / (d1 - d2);
                output.push(current.lerp(next, t));
            }
        }

        Self { vertices: output }
    }
}

/// Clips polygons against the six faces of the unit cube.
#[derive(Clone, Copy, Debug)]
pub struct UnitCubeClipper {
    faces: [CubeFace; 6],
}

impl UnitCubeClipper {
    pub fn new() -> Self {
        Self {
            faces: CubeFace::ORDER,
        }
    }

    /// Clip a polygon against all 6 faces of the cube.
    ///
    /// Returns the clipped polygon, which is empty if the original
    /// polygon was entirely outside any one face.
    pub fn clip_polygon(&self, polygon: ClippedFace) -> ClippedFace {
        let mut result = polygon;

        for &face in &self.faces {
            if result.is_empty() {
                return ClippedFace::default();
            }
            result = result.clip_against_face(face);
        }

        if result.is_empty() {
            return ClippedFace::default();
        }
        result
    }

    pub fn clip_triangle(&self, v0: Vec3, v1: Vec3, v2: Vec3) -> ClippedFace {
        self.clip_polygon(ClippedFace::from_triangle(v0, v1, v2))
    }
}

impl Default for UnitCubeClipper {
    fn default() -> Self {
        Self::new()
    }
}
