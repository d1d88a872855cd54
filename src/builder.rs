//! Welding clipped polygons into the final decal mesh.
//!
//! The builder accumulates faces for one recompute pass. Vertices closer
//! than [`WELD_EPSILON`] are merged, each face is fan-triangulated, and
//! [`MeshBuilder::finish`] derives normals, UVs, and the anti z-fighting
//! offset once the whole index list is known.

use crate::math::lerp;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::texture::Rect;

/// Vertices closer than this (in projector-local units) share an index.
pub const WELD_EPSILON: f32 = 0.01;

/// Indexed triangle mesh produced by one projector pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeldedMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl WeldedMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties every attribute while keeping the allocations.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.uvs.clear();
        self.indices.clear();
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}

/// Accumulates clipped faces into a welded vertex/index list.
#[derive(Clone, Debug, Default)]
pub struct MeshBuilder {
    vertices: Vec<Vec3>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all accumulated geometry. Call before every new pass.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Welded positions recorded so far.
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Weld `face` into the vertex list and fan-triangulate it.
    ///
    /// Faces with fewer than three vertices are ignored, as are fan
    /// triangles whose corners weld together.
    pub fn add_face(&mut self, face: &[Vec3]) {
        if face.len() < 3 {
            return;
        }

        let first_new_vertex = self.vertices.len();
        let first_index = self.indices.len();
        let anchor = self.add_vertex(face[0]);

        for pair in face[1..].windows(2) {
            let i2 = self.add_vertex(pair[0]);
            let i3 = self.add_vertex(pair[1]);

            if anchor == i2 || anchor == i3 || i2 == i3 {
                continue;
            }
            self.indices.extend_from_slice(&[anchor, i2, i3]);
        }

        // Nothing references the vertices a fully collapsed face appended.
        if self.indices.len() == first_index {
            self.vertices.truncate(first_new_vertex);
        }
    }

    /// Index of a vertex within [`WELD_EPSILON`] of `vertex`, appending it if none is.
    pub fn add_vertex(&mut self, vertex: Vec3) -> u32 {
        match self
            .vertices
            .iter()
            .position(|existing| existing.distance(vertex) < WELD_EPSILON)
        {
            Some(index) => index as u32,
            None => {
                self.vertices.push(vertex);
                (self.vertices.len() - 1) as u32
            }
        }
    }

    /// Produce the finished mesh.
    ///
    /// * `existing` - a previous mesh whose storage is reused
    /// * `uv` - normalized sprite rectangle the cube's XY face maps onto
    /// * `offset` - distance every vertex is pushed along its normal
    ///
    /// With no recorded triangles the result is an empty mesh.
    pub fn finish(&self, existing: Option<WeldedMesh>, uv: Rect, offset: f32) -> WeldedMesh {
        let mut mesh = existing.unwrap_or_default();
        mesh.clear();

        if self.indices.is_empty() {
            return mesh;
        }

        mesh.indices.extend_from_slice(&self.indices);
        self.accumulate_normals(&mut mesh.normals);

        // UVs come from the planar pre-offset coordinates.
        mesh.uvs.extend(self.vertices.iter().map(|v| {
            Vec2::new(
                lerp(uv.x_min(), uv.x_max(), v.x + 0.5),
                lerp(uv.y_min(), uv.y_max(), v.y + 0.5),
            )
        }));

        mesh.positions.extend(
            self.vertices
                .iter()
                .zip(&mesh.normals)
                .map(|(&v, &n)| v + n * offset),
        );

        mesh
    }

    /// Area-independent smooth normals: each triangle adds its unit face
    /// normal to its three corners, then every sum is renormalized.
    fn accumulate_normals(&self, normals: &mut Vec<Vec3>) {
        normals.clear();
        normals.resize(self.vertices.len(), Vec3::ZERO);

        for t in self.indices.chunks_exact(3) {
            let (i1, i2, i3) = (t[0] as usize, t[1] as usize, t[2] as usize);
            let (v1, v2, v3) = (self.vertices[i1], self.vertices[i2], self.vertices[i3]);

            let normal = (v2 - v1).cross(v3 - v1).normalize_or_zero();

            normals[i1] += normal;
            normals[i2] += normal;
            normals[i3] += normal;
        }

        for normal in normals.iter_mut() {
            *normal = normal.normalize_or_zero();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const FULL_UV: Rect = Rect::new(0.0, 0.0, 1.0, 1.0);

    #[test]
    fn test_close_vertices_are_welded() {
        let mut builder = MeshBuilder::new();
        let a = builder.add_vertex(Vec3::new(0.0, 0.0, 0.0));
        let b = builder.add_vertex(Vec3::new(0.0, 0.0, 0.005));
        assert_eq!(a, b);

        let c = builder.add_vertex(Vec3::new(0.0, 0.0, 0.02));
        assert_ne!(a, c);
        assert_eq!(builder.vertex_count(), 2);
    }

    #[test]
    fn test_fan_triangulation() {
        let mut builder = MeshBuilder::new();
        let pentagon = [
            Vec3::new(0.0, -0.4, 0.0),
            Vec3::new(0.3, -0.1, 0.0),
            Vec3::new(0.2, 0.3, 0.0),
            Vec3::new(-0.2, 0.3, 0.0),
            Vec3::new(-0.3, -0.1, 0.0),
        ];
        builder.add_face(&pentagon);

        assert_eq!(builder.indices(), &[0, 1, 2, 0, 2, 3, 0, 3, 4]);
        assert_eq!(builder.vertex_count(), 5);
    }

    #[test]
    fn test_degenerate_faces_are_ignored() {
        let mut builder = MeshBuilder::new();
        builder.add_face(&[]);
        builder.add_face(&[Vec3::ZERO, Vec3::ONE]);
        assert!(builder.is_empty());
        assert_eq!(builder.vertex_count(), 0);
    }

    #[test]
    fn test_welded_corners_do_not_form_triangles() {
        let mut builder = MeshBuilder::new();
        let a = Vec3::new(0.5, 0.0, 0.0);
        builder.add_face(&[a, a, a]);
        assert!(builder.is_empty());
        assert_eq!(builder.vertex_count(), 0);

        builder.add_face(&[
            a,
            Vec3::new(0.0, 0.3, 0.0),
            Vec3::new(0.5, 0.3, 0.0),
            Vec3::new(0.5, 0.001, 0.0),
        ]);
        assert_eq!(builder.indices(), &[0, 1, 2]);
        assert_eq!(builder.vertex_count(), 3);

        let mesh = builder.finish(None, FULL_UV, 0.0);
        assert!(mesh.normals.iter().all(|n| *n != Vec3::ZERO));
    }

    #[test]
    fn test_shared_edge_reuses_vertices() {
        let mut builder = MeshBuilder::new();
        let (a, b, c, d) = (
            Vec3::new(-0.25, -0.25, 0.0),
            Vec3::new(-0.25, 0.25, 0.0),
            Vec3::new(0.25, 0.25, 0.0),
            Vec3::new(0.25, -0.25, 0.0),
        );
        builder.add_face(&[a, b, c]);
        builder.add_face(&[a, c, d]);

        assert_eq!(builder.vertex_count(), 4);
        assert_eq!(builder.index_count(), 6);
        assert_eq!(builder.indices(), &[0, 1, 2, 0, 2, 3]);

        let mesh = builder.finish(None, FULL_UV, 0.0);
        let triangles: Vec<_> = mesh.triangles().collect();
        assert_eq!(triangles, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_coplanar_faces_share_the_face_normal() {
        let mut builder = MeshBuilder::new();
        let (a, b, c, d, e) = (
            Vec3::new(-0.3, -0.3, 0.1),
            Vec3::new(-0.3, 0.3, 0.1),
            Vec3::new(0.3, 0.3, 0.1),
            Vec3::new(0.3, -0.3, 0.1),
            Vec3::new(0.0, -0.45, 0.1),
        );
        builder.add_face(&[a, b, c]);
        builder.add_face(&[a, c, d]);
        builder.add_face(&[a, d, e]);

        let mesh = builder.finish(None, FULL_UV, 0.0);
        assert_eq!(mesh.normals.len(), 5);
        for n in &mesh.normals {
            assert_relative_eq!(n.x, 0.0, epsilon = 1e-6);
            assert_relative_eq!(n.y, 0.0, epsilon = 1e-6);
            assert_relative_eq!(n.z, -1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_seam_vertices_blend_normals() {
        // Two faces folded 90 degrees along the shared edge x = 0.
        let mut builder = MeshBuilder::new();
        let (a, b) = (Vec3::new(0.0, -0.3, 0.0), Vec3::new(0.0, 0.3, 0.0));
        builder.add_face(&[Vec3::new(-0.3, -0.3, 0.0), Vec3::new(-0.3, 0.3, 0.0), b, a]);
        builder.add_face(&[a, b, Vec3::new(0.0, 0.3, 0.3), Vec3::new(0.0, -0.3, 0.3)]);

        let mesh = builder.finish(None, FULL_UV, 0.0);
        let seam_index = builder.vertices().iter().position(|v| *v == a).unwrap();
        let seam = mesh.normals[seam_index];

        // `a` touches one -Z triangle and two +X triangles.
        let sqrt5 = 5.0f32.sqrt();
        assert_relative_eq!(seam.magnitude(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(seam.x, 2.0 / sqrt5, epsilon = 1e-5);
        assert_relative_eq!(seam.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(seam.z, -1.0 / sqrt5, epsilon = 1e-5);
    }

    #[test]
    fn test_zero_area_triangle_keeps_zero_normal() {
        let mut builder = MeshBuilder::new();
        builder.add_face(&[
            Vec3::new(-0.3, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.3, 0.0, 0.0),
        ]);

        let mesh = builder.finish(None, FULL_UV, 0.01);
        assert!(mesh.normals.iter().all(|n| *n == Vec3::ZERO));
        assert_eq!(mesh.positions[0], Vec3::new(-0.3, 0.0, 0.0));
    }

    #[test]
    fn test_uv_mapping_corners() {
        let mut builder = MeshBuilder::new();
        builder.add_face(&[
            Vec3::new(-0.5, -0.5, 0.0),
            Vec3::new(-0.5, 0.5, 0.0),
            Vec3::new(0.5, 0.5, 0.0),
        ]);

        let mesh = builder.finish(None, FULL_UV, 0.009);
        assert_eq!(mesh.uvs[0], Vec2::new(0.0, 0.0));
        assert_eq!(mesh.uvs[1], Vec2::new(0.0, 1.0));
        assert_eq!(mesh.uvs[2], Vec2::new(1.0, 1.0));

        let sub = builder.finish(None, Rect::new(0.5, 0.25, 0.25, 0.5), 0.009);
        assert_relative_eq!(sub.uvs[0].x, 0.5);
        assert_relative_eq!(sub.uvs[0].y, 0.25);
        assert_relative_eq!(sub.uvs[2].x, 0.75);
        assert_relative_eq!(sub.uvs[2].y, 0.75);
    }

    #[test]
    fn test_offset_moves_along_normal() {
        let mut builder = MeshBuilder::new();
        builder.add_face(&[
            Vec3::new(-0.25, -0.25, 0.2),
            Vec3::new(-0.25, 0.25, 0.2),
            Vec3::new(0.25, 0.25, 0.2),
        ]);

        let mesh = builder.finish(None, FULL_UV, 0.05);
        for p in &mesh.positions {
            assert_relative_eq!(p.z, 0.15, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_existing_mesh_is_reused_and_cleared() {
        let mut builder = MeshBuilder::new();
        builder.add_face(&[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ]);
        let mesh = builder.finish(None, FULL_UV, 0.001);
        assert_eq!(mesh.vertex_count(), 3);

        builder.clear();
        let mesh = builder.finish(Some(mesh), FULL_UV, 0.001);
        assert_eq!(mesh.vertex_count(), 0);
        assert!(mesh.is_empty());
        assert!(mesh.normals.is_empty() && mesh.uvs.is_empty());
    }
}
