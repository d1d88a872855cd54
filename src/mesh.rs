//! Indexed source geometry that decals are projected onto.

use std::io::BufRead;
use std::path::Path;

use crate::bounds::Aabb;
use crate::error::Error;
use crate::math::vec3::Vec3;
use crate::triangle::{Face, SourceTriangle};

/// Triangle geometry in the owning object's local space.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    name: String,
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
}

impl Mesh {
    pub fn new(name: impl Into<String>, vertices: Vec<Vec3>, faces: Vec<Face>) -> Self {
        Self {
            name: name.into(),
            vertices,
            faces,
        }
    }

    /// A `size`-wide quad in the local XY plane, facing `-Z`.
    pub fn quad(size: f32) -> Self {
        let h = size / 2.0;
        Self::new(
            "quad",
            vec![
                Vec3::new(-h, -h, 0.0),
                Vec3::new(-h, h, 0.0),
                Vec3::new(h, h, 0.0),
                Vec3::new(h, -h, 0.0),
            ],
            vec![Face::new(0, 1, 2), Face::new(0, 2, 3)],
        )
    }

    /// Load every object/group of an OBJ file as a separate mesh.
    pub fn load_all_from_obj<P: AsRef<Path>>(file_path: P) -> Result<Vec<Mesh>, Error> {
        let (models, _materials) = tobj::load_obj(file_path.as_ref(), &load_options())?;
        Ok(models.into_iter().map(Mesh::from_tobj).collect())
    }

    /// Load the first object of an OBJ file.
    pub fn from_obj<P: AsRef<Path>>(file_path: P) -> Result<Mesh, Error> {
        Self::load_all_from_obj(file_path)?
            .into_iter()
            .next()
            .ok_or(Error::EmptyObj)
    }

    /// Parse OBJ text from any buffered reader. Material libraries are ignored.
    pub fn load_all_from_obj_reader<R: BufRead>(reader: &mut R) -> Result<Vec<Mesh>, Error> {
        let (models, _materials) = tobj::load_obj_buf(reader, &load_options(), |_| {
            Err(tobj::LoadError::OpenFileFailed)
        })?;
        Ok(models.into_iter().map(Mesh::from_tobj).collect())
    }

    fn from_tobj(model: tobj::Model) -> Self {
        let mesh = model.mesh;
        let vertices = mesh
            .positions
            .chunks_exact(3)
            .map(|p| Vec3::new(p[0], p[1], p[2]))
            .collect();
        let faces = mesh
            .indices
            .chunks_exact(3)
            .map(|f| Face::new(f[0], f[1], f[2]))
            .collect();

        Self::new(model.name, vertices, faces)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Local-space bounds of the vertex cloud.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().copied())
    }

    /// Resolve a face to positions. `None` if an index is out of range.
    pub fn triangle(&self, face: &Face) -> Option<SourceTriangle> {
        let v = |i: u32| self.vertices.get(i as usize).copied();
        Some(SourceTriangle::new(v(face.a)?, v(face.b)?, v(face.c)?))
    }
}

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    }
}
