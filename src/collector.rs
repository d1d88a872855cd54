//! Candidate selection: which scene triangles may receive the decal.
//!
//! Objects are first filtered coarsely (bounds overlap, layer, static
//! compatibility, category). Surviving triangles are moved into
//! projector-local space and kept only if they face the projector.

use log::{debug, trace};

use crate::bounds::Aabb;
use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::scene::{LayerMask, SceneObject};
use crate::settings::{DecalSettings, SourceSelection};
use crate::triangle::SourceTriangle;

/// Selects and transforms candidate triangles for one projector pass.
#[derive(Clone, Copy, Debug)]
pub struct CandidateCollector {
    world_to_local: Mat4,
    bounds: Aabb,
    max_angle: f32,
    layer_mask: LayerMask,
    source: SourceSelection,
    projector_is_static: bool,
}

impl CandidateCollector {
    /// * `world_to_local` - the projector's inverse transform
    /// * `bounds` - the projector volume's world-space bounds
    pub fn new(
        world_to_local: Mat4,
        bounds: Aabb,
        settings: &DecalSettings,
        projector_is_static: bool,
    ) -> Self {
        Self {
            world_to_local,
            bounds,
            max_angle: settings.max_angle,
            layer_mask: settings.layer_mask,
            source: settings.source,
            projector_is_static,
        }
    }

    /// Object-level selection rules.
    pub fn accepts<O: SceneObject + ?Sized>(&self, object: &O) -> bool {
        if object.is_projector() || !self.layer_mask.contains(object.layer()) {
            return false;
        }

        // Static geometry only takes decals from static projectors.
        if !object.is_static() && self.projector_is_static {
            return false;
        }

        let selected = match self.source {
            SourceSelection::Single(id) => object.id() == id,
            SourceSelection::Categories(categories) => categories.contains(object.category()),
        };

        selected && self.bounds.intersects(&object.world_bounds())
    }

    /// Whether a projector-local triangle faces the projector closely enough.
    pub fn faces_projector(&self, triangle: &SourceTriangle) -> bool {
        Vec3::BACK.angle_degrees(triangle.normal()) <= self.max_angle
    }

    /// Lazily yield every accepted triangle of `objects`, in projector-local space.
    pub fn triangles<'o, I, O>(self, objects: I) -> impl Iterator<Item = SourceTriangle> + 'o
    where
        I: IntoIterator<Item = &'o O>,
        I::IntoIter: 'o,
        O: SceneObject + ?Sized + 'o,
    {
        objects
            .into_iter()
            .filter(move |object| self.accepts(*object))
            .flat_map(move |object| self.object_triangles(object))
    }

    fn object_triangles<'o, O>(self, object: &'o O) -> impl Iterator<Item = SourceTriangle> + 'o
    where
        O: SceneObject + ?Sized + 'o,
    {
        let mesh = object.geometry();
        match mesh {
            Some(mesh) => trace!("source {}: {} faces", object.id(), mesh.faces().len()),
            None => debug!("source {} has no readable geometry, skipping", object.id()),
        }

        let to_local = self.world_to_local * object.local_to_world();
        let id = object.id();

        mesh.into_iter()
            .flat_map(move |mesh| {
                mesh.faces().iter().filter_map(move |face| {
                    let triangle = mesh.triangle(face);
                    if triangle.is_none() {
                        trace!("source {id}: face {face:?} indexes past the vertex list");
                    }
                    triangle
                })
            })
            .map(move |triangle| triangle.transformed(&to_local))
            .filter(move |triangle| self.faces_projector(triangle))
    }
}
