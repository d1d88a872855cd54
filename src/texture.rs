//! Sprite and material descriptions consumed by the projector.
//!
//! The projector only needs texture dimensions (to normalize the sprite's
//! pixel rectangle into UV space) and texture identity (to check that a
//! sprite belongs to the material's main texture). Pixel data stays with
//! the host renderer.

use std::path::Path;
use std::sync::Arc;

use crate::error::Error;

/// Dimensions of a texture owned by the host renderer.
#[derive(Debug, PartialEq, Eq)]
pub struct Texture {
    name: String,
    width: u32,  // The width of the texture in pixels.
    height: u32, // The height of the texture in pixels.
}

impl Texture {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }

    /// Read the dimensions of an image file (PNG, JPG, etc.) without decoding it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let (width, height) = image::image_dimensions(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self::new(name, width, height))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// An axis-aligned rectangle, `(x, y)` being its minimum corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn x_min(&self) -> f32 {
        self.x
    }

    pub fn x_max(&self) -> f32 {
        self.x + self.width
    }

    pub fn y_min(&self) -> f32 {
        self.y
    }

    pub fn y_max(&self) -> f32 {
        self.y + self.height
    }
}

/// A rectangular region of a texture, in pixels.
#[derive(Clone, Debug)]
pub struct Sprite {
    name: String,
    texture: Arc<Texture>,
    rect: Rect,
}

impl Sprite {
    pub fn new(name: impl Into<String>, texture: Arc<Texture>, rect: Rect) -> Self {
        Self {
            name: name.into(),
            texture,
            rect,
        }
    }

    /// A sprite covering the whole texture.
    pub fn full(texture: Arc<Texture>) -> Self {
        let rect = Rect::new(0.0, 0.0, texture.width() as f32, texture.height() as f32);
        Self::new(texture.name().to_owned(), texture, rect)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn texture(&self) -> &Arc<Texture> {
        &self.texture
    }

    /// Pixel rectangle within the texture.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Width over height of the pixel rectangle.
    pub fn aspect_ratio(&self) -> f32 {
        self.rect.width / self.rect.height
    }

    /// The pixel rectangle normalized by the texture dimensions.
    pub fn uv_rect(&self) -> Rect {
        let w = self.texture.width() as f32;
        let h = self.texture.height() as f32;
        Rect::new(
            self.rect.x / w,
            self.rect.y / h,
            self.rect.width / w,
            self.rect.height / h,
        )
    }
}

/// Opaque material handle, passed through to the renderer unchanged.
#[derive(Clone, Debug)]
pub struct Material {
    name: String,
    main_texture: Option<Arc<Texture>>,
}

impl Material {
    pub fn new(name: impl Into<String>, main_texture: Option<Arc<Texture>>) -> Self {
        Self {
            name: name.into(),
            main_texture,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn main_texture(&self) -> Option<&Arc<Texture>> {
        self.main_texture.as_ref()
    }

    /// Whether `sprite` is cut from this material's main texture.
    pub fn accepts(&self, sprite: &Sprite) -> bool {
        self.main_texture
            .as_ref()
            .is_some_and(|texture| Arc::ptr_eq(texture, sprite.texture()))
    }
}
