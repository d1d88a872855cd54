//! Projected decal geometry.
//!
//! A [`DecalProjector`] is a transformed unit cube. On every recompute it
//! collects scene triangles overlapping the cube, clips them to it, and
//! welds the pieces into a single mesh with normals and sprite UVs. The
//! crate produces geometry only; rendering it is up to the host.
//!
//! # Quick Start
//!
//! ```ignore
//! use decalcast::prelude::*;
//!
//! let mut scene = Scene::new();
//! scene.spawn(Mesh::from_obj("wall.obj")?);
//!
//! let texture = Arc::new(Texture::from_file("splat.png")?);
//! let material = Material::new("splat", Some(Arc::clone(&texture)));
//! let decal = DecalProjector::create(
//!     ObjectId(1000),
//!     Transform::new(),
//!     material,
//!     Sprite::full(texture),
//!     DecalSettings::placed(),
//!     scene.objects(),
//! )?;
//! ```

// Public API - exposed to library consumers
pub mod bounds;
pub mod builder;
pub mod clipper;
pub mod collector;
pub mod error;
pub mod math;
pub mod mesh;
pub mod projector;
pub mod scene;
pub mod settings;
pub mod texture;
pub mod transform;
pub mod triangle;

// Re-export commonly needed types at crate root for convenience
pub use error::Error;
pub use mesh::Mesh;
pub use projector::{DecalProjector, DecalState};
pub use scene::{Scene, SceneMesh, SceneObject};
pub use settings::DecalSettings;
pub use transform::Transform;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use decalcast::prelude::*;
/// ```
pub mod prelude {
    // Projector
    pub use crate::builder::WeldedMesh;
    pub use crate::projector::{DecalProjector, DecalState};
    pub use crate::settings::{DecalSettings, SourceSelection};

    // Scene
    pub use crate::mesh::Mesh;
    pub use crate::scene::{
        LayerMask, ObjectId, Scene, SceneMesh, SceneObject, SourceCategories, SourceCategory,
    };
    pub use crate::transform::Transform;

    // Materials
    pub use crate::texture::{Material, Rect, Sprite, Texture};

    // Math
    pub use crate::bounds::Aabb;
    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec2::Vec2;
    pub use crate::math::vec3::Vec3;

    pub use crate::error::Error;
    pub use std::sync::Arc;
}
