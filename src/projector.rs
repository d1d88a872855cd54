//! The decal projector: owns the configuration and drives one
//! collect, clip, build pass whenever it is asked to recompute.
//!
//! A projector is a transformed unit cube. Everything inside the cube that
//! faces the projector's backward axis receives the sprite, mapped across
//! the cube's XY face.

use log::{debug, warn};

use crate::bounds::Aabb;
use crate::builder::{MeshBuilder, WeldedMesh};
use crate::clipper::UnitCubeClipper;
use crate::collector::CandidateCollector;
use crate::error::Error;
use crate::math::approximately;
use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::mesh::Mesh;
use crate::scene::{ObjectId, SceneObject, SourceCategory};
use crate::settings::DecalSettings;
use crate::texture::{Material, Sprite};
use crate::transform::Transform;

/// Outcome of the last recompute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecalState {
    /// Material or sprite missing: no mesh, nothing to render.
    Empty,
    /// Mesh built (possibly with zero triangles) and material assigned.
    Generated,
}

/// A decal projector and the mesh it last produced.
#[derive(Clone, Debug)]
pub struct DecalProjector {
    id: ObjectId,
    transform: Transform,
    settings: DecalSettings,
    layer: u8,
    is_static: bool,
    material: Option<Material>,
    sprite: Option<Sprite>,

    clipper: UnitCubeClipper,
    builder: MeshBuilder,
    mesh: Option<WeldedMesh>,
    renderer_material: Option<Material>,
    state: DecalState,
    // Scale seen by the previous aspect lock; zero until the first recompute.
    last_scale: Vec3,
}

impl DecalProjector {
    /// An unconfigured, non-static projector at the origin.
    pub fn new(id: ObjectId) -> Self {
        Self {
            id,
            transform: Transform::new(),
            settings: DecalSettings::default(),
            layer: 0,
            is_static: false,
            material: None,
            sprite: None,
            clipper: UnitCubeClipper::new(),
            builder: MeshBuilder::new(),
            mesh: None,
            renderer_material: None,
            state: DecalState::Empty,
            last_scale: Vec3::ZERO,
        }
    }

    /// Place a fully configured decal and build its mesh right away.
    ///
    /// Pair with [`DecalSettings::placed`] for the usual runtime defaults.
    pub fn create<'o, I, O>(
        id: ObjectId,
        transform: Transform,
        material: Material,
        sprite: Sprite,
        settings: DecalSettings,
        objects: I,
    ) -> Result<Self, Error>
    where
        I: IntoIterator<Item = &'o O>,
        I::IntoIter: 'o,
        O: SceneObject + ?Sized + 'o,
    {
        let mut projector = Self::new(id).with_transform(transform);
        projector.set_settings(settings);
        projector.set_material(Some(material));
        projector.set_sprite(Some(sprite));
        projector.recompute(objects)?;
        Ok(projector)
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

    // ============ Configuration ============

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Edits raise the transform's change flag; see [`DecalProjector::update`].
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn settings(&self) -> &DecalSettings {
        &self.settings
    }

    /// Replace the settings; angle and offset are clamped into range.
    pub fn set_settings(&mut self, settings: DecalSettings) {
        self.settings = settings;
        self.validate();
    }

    pub fn material(&self) -> Option<&Material> {
        self.material.as_ref()
    }

    /// Removing the material also removes the sprite.
    pub fn set_material(&mut self, material: Option<Material>) {
        self.material = material;
        self.validate();
    }

    pub fn sprite(&self) -> Option<&Sprite> {
        self.sprite.as_ref()
    }

    /// The sprite is dropped unless it is cut from the material's main texture.
    pub fn set_sprite(&mut self, sprite: Option<Sprite>) {
        self.sprite = sprite;
        self.validate();
    }

    pub fn set_static(&mut self, is_static: bool) {
        self.is_static = is_static;
    }

    fn validate(&mut self) {
        self.settings = self.settings.clamped();

        match (&self.material, &self.sprite) {
            (None, Some(_)) => self.sprite = None,
            (Some(material), Some(sprite)) if !material.accepts(sprite) => {
                warn!(
                    "decal {}: sprite {:?} is not cut from the main texture of material {:?}, dropping it",
                    self.id,
                    sprite.name(),
                    material.name()
                );
                self.sprite = None;
            }
            _ => {}
        }
    }

    // ============ Output ============

    /// The generated mesh, in projector-local space. `None` while empty.
    pub fn mesh(&self) -> Option<&WeldedMesh> {
        self.mesh.as_ref()
    }

    /// Material the host should render [`DecalProjector::mesh`] with.
    pub fn renderer_material(&self) -> Option<&Material> {
        self.renderer_material.as_ref()
    }

    pub fn state(&self) -> DecalState {
        self.state
    }

    /// World-space bounds of the projection volume.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_unit_cube(&self.transform.to_matrix())
    }

    // ============ Recompute ============

    /// Recompute only if the transform changed since the last call.
    ///
    /// Returns whether a recompute ran.
    pub fn update<'o, I, O>(&mut self, objects: I) -> Result<bool, Error>
    where
        I: IntoIterator<Item = &'o O>,
        I::IntoIter: 'o,
        O: SceneObject + ?Sized + 'o,
    {
        if !self.transform.take_changed() {
            return Ok(false);
        }
        self.recompute(objects)?;
        Ok(true)
    }

    /// Rebuild the decal mesh from `objects`.
    ///
    /// Without both a material and a sprite the projector goes
    /// [`DecalState::Empty`] and drops its mesh. Fails only when the
    /// transform cannot be inverted; the previous output is then kept.
    pub fn recompute<'o, I, O>(&mut self, objects: I) -> Result<DecalState, Error>
    where
        I: IntoIterator<Item = &'o O>,
        I::IntoIter: 'o,
        O: SceneObject + ?Sized + 'o,
    {
        if self.settings.fixed_aspect {
            if let Some(ratio) = self.sprite.as_ref().map(Sprite::aspect_ratio) {
                self.lock_aspect(ratio);
            }
        }

        let (material, sprite) = match (&self.material, &self.sprite) {
            (Some(material), Some(sprite)) => (material, sprite),
            _ => {
                if self.state == DecalState::Generated {
                    debug!("decal {}: material or sprite missing, clearing", self.id);
                }
                self.mesh = None;
                self.renderer_material = None;
                self.state = DecalState::Empty;
                return Ok(self.state);
            }
        };

        let world_to_local = self
            .transform
            .world_to_local()
            .ok_or(Error::DegenerateTransform)?;

        let collector = CandidateCollector::new(
            world_to_local,
            Aabb::from_unit_cube(&self.transform.to_matrix()),
            &self.settings,
            self.is_static,
        );

        self.builder.clear();
        let mut candidates = 0usize;
        let mut clipped_away = 0usize;
        for triangle in collector.triangles(objects) {
            candidates += 1;
            let [a, b, c] = triangle.vertices;
            let face = self.clipper.clip_triangle(a, b, c);
            if face.is_empty() {
                clipped_away += 1;
                continue;
            }
            self.builder.add_face(&face.vertices);
        }

        let mesh = self
            .builder
            .finish(self.mesh.take(), sprite.uv_rect(), self.settings.offset);

        debug!(
            "decal {}: {} candidate triangles ({} clipped away) -> {} vertices, {} triangles",
            self.id,
            candidates,
            clipped_away,
            mesh.vertex_count(),
            mesh.triangle_count()
        );

        self.renderer_material = Some(material.clone());
        self.mesh = Some(mesh);
        self.state = DecalState::Generated;
        Ok(self.state)
    }

    /// Keep X/Y scale in the sprite's aspect ratio, following whichever
    /// axis the user edited last.
    fn lock_aspect(&mut self, ratio: f32) {
        if !ratio.is_finite() || ratio <= 0.0 {
            return;
        }

        let mut scale = self.transform.scale();
        if !approximately(self.last_scale.x, scale.x) {
            scale.y = scale.x / ratio;
        } else if !approximately(self.last_scale.y, scale.y) {
            scale.x = scale.y * ratio;
        } else if !approximately(scale.x / scale.y, ratio) {
            // Neither axis moved but the sprite did.
            scale.x = scale.y * ratio;
        }

        self.last_scale = scale;
        self.transform.set_scale_silently(scale);
    }
}

impl SceneObject for DecalProjector {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn local_to_world(&self) -> Mat4 {
        self.transform.to_matrix()
    }

    fn world_bounds(&self) -> Aabb {
        self.bounds()
    }

    fn layer(&self) -> u8 {
        self.layer
    }

    fn is_static(&self) -> bool {
        self.is_static
    }

    fn is_projector(&self) -> bool {
        true
    }

    fn category(&self) -> SourceCategory {
        SourceCategory::StaticMesh
    }

    fn geometry(&self) -> Option<&Mesh> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Scene, SceneMesh};
    use crate::texture::{Rect, Texture};
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn textured(width: u32, height: u32) -> (Material, Sprite) {
        let texture = Arc::new(Texture::new("decal", width, height));
        let material = Material::new("decal", Some(Arc::clone(&texture)));
        (material, Sprite::full(texture))
    }

    fn configured(width: u32, height: u32) -> DecalProjector {
        let (material, sprite) = textured(width, height);
        let mut projector = DecalProjector::new(ObjectId(100));
        projector.set_material(Some(material));
        projector.set_sprite(Some(sprite));
        projector
    }

    fn wall_scene() -> Scene {
        let mut scene = Scene::new();
        scene.spawn(Mesh::quad(0.5));
        scene
    }

    #[test]
    fn test_facing_wall_gets_offset_decal() {
        init_logging();
        let scene = wall_scene();
        let mut projector = configured(64, 64);

        let state = projector.recompute(scene.objects()).unwrap();
        assert_eq!(state, DecalState::Generated);
        assert_eq!(
            projector.renderer_material().map(Material::name),
            Some("decal")
        );

        let mesh = projector.mesh().unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            assert_relative_eq!(n.z, -1.0, epsilon = 1e-6);
            assert_relative_eq!(p.z, -0.009, epsilon = 1e-6);
        }
        assert_relative_eq!(mesh.uvs[0].x, 0.25, epsilon = 1e-6);
        assert_relative_eq!(mesh.uvs[0].y, 0.25, epsilon = 1e-6);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let scene = wall_scene();
        let mut projector = configured(64, 64);

        projector.recompute(scene.objects()).unwrap();
        let first = projector.mesh().cloned();
        projector.recompute(scene.objects()).unwrap();

        assert_eq!(projector.mesh().cloned(), first);
        assert_eq!(projector.transform().scale(), Vec3::ONE);
    }

    #[test]
    fn test_missing_material_or_sprite_is_empty() {
        let scene = wall_scene();
        let mut projector = DecalProjector::new(ObjectId(1));
        assert_eq!(
            projector.recompute(scene.objects()).unwrap(),
            DecalState::Empty
        );
        assert!(projector.mesh().is_none());
        assert!(projector.renderer_material().is_none());

        let mut projector = configured(64, 64);
        projector.recompute(scene.objects()).unwrap();
        assert!(projector.mesh().is_some());

        projector.set_material(None);
        assert!(projector.sprite().is_none());
        assert_eq!(
            projector.recompute(scene.objects()).unwrap(),
            DecalState::Empty
        );
        assert!(projector.mesh().is_none());
        assert!(projector.renderer_material().is_none());
    }

    #[test]
    fn test_sprite_from_another_texture_is_dropped() {
        let (material, _) = textured(64, 64);
        let (_, foreign) = textured(64, 64);

        let mut projector = DecalProjector::new(ObjectId(1));
        projector.set_material(Some(material));
        projector.set_sprite(Some(foreign));
        assert!(projector.sprite().is_none());
    }

    #[test]
    fn test_settings_are_clamped_on_assignment() {
        let mut projector = DecalProjector::new(ObjectId(1));
        projector.set_settings(DecalSettings {
            max_angle: 400.0,
            offset: 1.0,
            ..Default::default()
        });
        assert_eq!(projector.settings().max_angle, DecalSettings::MAX_MAX_ANGLE);
        assert_eq!(projector.settings().offset, DecalSettings::MAX_OFFSET);
    }

    #[test]
    fn test_aspect_lock_follows_the_edited_axis() {
        let scene = Scene::new();
        let mut projector = configured(128, 64);

        // First pass: X counts as edited, Y follows.
        projector.recompute(scene.objects()).unwrap();
        assert_relative_eq!(projector.transform().scale().x, 1.0);
        assert_relative_eq!(projector.transform().scale().y, 0.5);

        projector.transform_mut().set_scale_xyz(1.0, 3.0, 1.0);
        projector.recompute(scene.objects()).unwrap();
        let scale = projector.transform().scale();
        assert_relative_eq!(scale.x, 6.0);
        assert_relative_eq!(scale.y, 3.0);
        assert_relative_eq!(scale.z, 1.0);
    }

    #[test]
    fn test_aspect_lock_snaps_x_when_the_ratio_changes() {
        let scene = Scene::new();
        let mut projector = configured(128, 64);
        projector.recompute(scene.objects()).unwrap();
        assert_relative_eq!(projector.transform().scale().y, 0.5);

        // Same texture, ratio 4, scale untouched.
        let texture = Arc::clone(projector.material().unwrap().main_texture().unwrap());
        let wide = Sprite::new("wide", texture, Rect::new(0.0, 0.0, 128.0, 32.0));
        projector.set_sprite(Some(wide));
        projector.recompute(scene.objects()).unwrap();

        let scale = projector.transform().scale();
        assert_relative_eq!(scale.y, 0.5);
        assert_relative_eq!(scale.x, scale.y * 4.0);
        assert_relative_eq!(scale.z, 1.0);
    }

    #[test]
    fn test_aspect_lock_does_not_raise_change_flag() {
        let scene = Scene::new();
        let mut projector = configured(128, 64);
        projector.transform_mut().take_changed();

        projector.recompute(scene.objects()).unwrap();
        assert!(!projector.transform().has_changed());
    }

    #[test]
    fn test_aspect_lock_can_be_disabled() {
        let scene = Scene::new();
        let mut projector = configured(128, 64);
        projector.set_settings(DecalSettings::default().with_fixed_aspect(false));

        projector.recompute(scene.objects()).unwrap();
        assert_eq!(projector.transform().scale(), Vec3::ONE);
    }

    #[test]
    fn test_update_runs_only_after_transform_changes() {
        let scene = wall_scene();
        let mut projector = configured(64, 64);

        assert!(projector.update(scene.objects()).unwrap());
        assert!(!projector.update(scene.objects()).unwrap());

        projector.transform_mut().set_position_xyz(0.0, 0.0, 0.1);
        assert!(projector.update(scene.objects()).unwrap());
        assert!(!projector.update(scene.objects()).unwrap());
    }

    #[test]
    fn test_moving_away_leaves_an_empty_mesh() {
        let scene = wall_scene();
        let mut projector = configured(64, 64);
        projector.transform_mut().set_position_xyz(5.0, 0.0, 0.0);

        assert_eq!(
            projector.recompute(scene.objects()).unwrap(),
            DecalState::Generated
        );
        assert!(projector.mesh().unwrap().is_empty());
    }

    #[test]
    fn test_degenerate_transform_is_an_error() {
        let scene = wall_scene();
        let mut projector = configured(64, 64);
        projector.set_settings(DecalSettings::default().with_fixed_aspect(false));
        projector.recompute(scene.objects()).unwrap();

        projector.transform_mut().set_scale_xyz(0.0, 1.0, 1.0);
        assert!(matches!(
            projector.recompute(scene.objects()),
            Err(Error::DegenerateTransform)
        ));
        // Previous output survives.
        assert_eq!(projector.mesh().unwrap().vertex_count(), 4);
    }

    #[test]
    fn test_other_projectors_are_not_decorated() {
        let wall = SceneMesh::new(ObjectId(1), Mesh::quad(0.5));
        let bystander = DecalProjector::new(ObjectId(2));
        let objects: [&dyn SceneObject; 2] = [&bystander, &wall];

        let mut projector = configured(64, 64);
        projector.recompute(objects.iter().copied()).unwrap();
        assert_eq!(projector.mesh().unwrap().triangle_count(), 2);
    }

    #[test]
    fn test_create_builds_immediately() {
        let scene = wall_scene();
        let (material, sprite) = textured(64, 64);

        let mut transform = Transform::new();
        transform.set_scale_xyz(0.5, 0.5, 0.5);

        let projector = DecalProjector::create(
            ObjectId(9),
            transform,
            material,
            sprite,
            DecalSettings::placed(),
            scene.objects(),
        )
        .unwrap();

        assert_eq!(projector.state(), DecalState::Generated);
        assert_eq!(projector.settings().max_angle, 90.0);
        assert_eq!(projector.mesh().unwrap().vertex_count(), 4);
    }

    #[test]
    fn test_bounds_follow_the_transform() {
        let mut projector = DecalProjector::new(ObjectId(1));
        projector
            .transform_mut()
            .set_position_xyz(1.0, 2.0, 3.0)
            .set_scale_xyz(2.0, 4.0, 1.0);

        let bounds = projector.bounds();
        assert_relative_eq!(bounds.mins.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(bounds.maxs.y, 4.0, epsilon = 1e-6);
        assert_relative_eq!(bounds.maxs.z, 3.5, epsilon = 1e-6);
    }
}
