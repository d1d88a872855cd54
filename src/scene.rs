//! Scene-side view of the geometry decals can be projected onto.
//!
//! The projector never owns scene geometry. It queries anything that
//! implements [`SceneObject`]; [`SceneMesh`] and [`Scene`] are ready-made
//! implementations for hosts without their own object model.

use std::collections::HashMap;
use std::fmt;

use crate::bounds::Aabb;
use crate::math::mat4::Mat4;
use crate::mesh::Mesh;
use crate::transform::Transform;

/// Stable identity of a scene object, used to pin a projector to one source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of geometry a scene object carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceCategory {
    StaticMesh,
    SkinnedMesh,
    ColliderMesh,
}

impl SourceCategory {
    const fn bit(self) -> u8 {
        match self {
            SourceCategory::StaticMesh => 1 << 0,
            SourceCategory::SkinnedMesh => 1 << 1,
            SourceCategory::ColliderMesh => 1 << 2,
        }
    }
}

/// A set of [`SourceCategory`] values.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceCategories(u8);

impl SourceCategories {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0b111);

    pub const fn only(category: SourceCategory) -> Self {
        Self(category.bit())
    }

    pub const fn with(self, category: SourceCategory) -> Self {
        Self(self.0 | category.bit())
    }

    pub const fn without(self, category: SourceCategory) -> Self {
        Self(self.0 & !category.bit())
    }

    pub const fn contains(&self, category: SourceCategory) -> bool {
        self.0 & category.bit() != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl Default for SourceCategories {
    fn default() -> Self {
        Self::only(SourceCategory::StaticMesh)
    }
}

impl fmt::Debug for SourceCategories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let all = [
            SourceCategory::StaticMesh,
            SourceCategory::SkinnedMesh,
            SourceCategory::ColliderMesh,
        ];
        f.debug_set()
            .entries(all.into_iter().filter(|c| self.contains(*c)))
            .finish()
    }
}

/// Bit mask over 32 scene layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const EVERYTHING: Self = Self(u32::MAX);
    pub const NOTHING: Self = Self(0);

    /// Mask holding one layer. Valid layers are `0..32`; any other
    /// layer yields [`LayerMask::NOTHING`].
    pub const fn single(layer: u8) -> Self {
        if layer < 32 {
            Self(1u32 << layer)
        } else {
            Self::NOTHING
        }
    }

    /// Layers outside `0..32` are never contained.
    pub const fn contains(&self, layer: u8) -> bool {
        layer < 32 && self.0 & (1u32 << layer) != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::EVERYTHING
    }
}

/// Anything a decal can be projected onto.
pub trait SceneObject {
    fn id(&self) -> ObjectId;

    /// Matrix taking the object's local geometry into world space.
    fn local_to_world(&self) -> Mat4;

    /// World-space bounds used for the coarse overlap test.
    fn world_bounds(&self) -> Aabb;

    fn layer(&self) -> u8;

    fn is_static(&self) -> bool;

    /// Projectors never receive decals themselves.
    fn is_projector(&self) -> bool {
        false
    }

    fn category(&self) -> SourceCategory;

    /// Local-space triangles, or `None` if the host cannot expose them.
    fn geometry(&self) -> Option<&Mesh>;
}

/// A mesh placed in the world, the host-agnostic [`SceneObject`].
#[derive(Clone, Debug)]
pub struct SceneMesh {
    id: ObjectId,
    mesh: Mesh,
    transform: Transform,
    layer: u8,
    is_static: bool,
    category: SourceCategory,
    readable: bool,
}

impl SceneMesh {
    /// A static mesh on layer 0 with an identity transform.
    pub fn new(id: ObjectId, mesh: Mesh) -> Self {
        Self {
            id,
            mesh,
            transform: Transform::default(),
            layer: 0,
            is_static: true,
            category: SourceCategory::StaticMesh,
            readable: true,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_layer(mut self, layer: u8) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_category(mut self, category: SourceCategory) -> Self {
        self.category = category;
        self
    }

    /// Mark the geometry as not host-readable; collectors will skip it.
    pub fn with_readable(mut self, readable: bool) -> Self {
        self.readable = readable;
        self
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }
}

impl SceneObject for SceneMesh {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn local_to_world(&self) -> Mat4 {
        self.transform.to_matrix()
    }

    fn world_bounds(&self) -> Aabb {
        self.mesh.bounds().transform_by(&self.transform.to_matrix())
    }

    fn layer(&self) -> u8 {
        self.layer
    }

    fn is_static(&self) -> bool {
        self.is_static
    }

    fn category(&self) -> SourceCategory {
        self.category
    }

    fn geometry(&self) -> Option<&Mesh> {
        self.readable.then_some(&self.mesh)
    }
}

/// A flat collection of [`SceneMesh`] objects with id lookup.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    objects: Vec<SceneMesh>,
    ids: HashMap<ObjectId, usize>,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mesh under a fresh id and return a handle to configure it.
    pub fn spawn(&mut self, mesh: Mesh) -> &mut SceneMesh {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.insert(SceneMesh::new(id, mesh))
    }

    /// Insert a prebuilt object, replacing any object with the same id.
    pub fn insert(&mut self, object: SceneMesh) -> &mut SceneMesh {
        let id = object.id;
        self.next_id = self.next_id.max(id.0.saturating_add(1));
        let index = match self.ids.get(&id) {
            Some(&index) => {
                self.objects[index] = object;
                index
            }
            None => {
                self.objects.push(object);
                self.ids.insert(id, self.objects.len() - 1);
                self.objects.len() - 1
            }
        };
        &mut self.objects[index]
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneMesh> {
        self.ids.get(&id).map(|&i| &self.objects[i])
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneMesh> {
        let index = *self.ids.get(&id)?;
        self.objects.get_mut(index)
    }

    pub fn objects(&self) -> &[SceneMesh] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
