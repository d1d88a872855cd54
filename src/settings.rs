//! Per-projector configuration.

use crate::scene::{LayerMask, ObjectId, SourceCategories};

/// Which scene objects a projector may draw triangles from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceSelection {
    /// Every object whose category is in the set.
    Categories(SourceCategories),
    /// Exactly one object; categories are ignored.
    Single(ObjectId),
}

impl Default for SourceSelection {
    fn default() -> Self {
        SourceSelection::Categories(SourceCategories::default())
    }
}

/// Tunables of a decal projector.
///
/// Out-of-range values are never rejected; [`DecalSettings::clamped`]
/// pulls them back into range when the settings are handed to a projector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecalSettings {
    /// Keep the projector's X/Y scale locked to the sprite's aspect ratio.
    pub fixed_aspect: bool,
    /// Largest accepted angle, in degrees, between a surface normal and the
    /// projector's backward axis.
    pub max_angle: f32,
    /// Distance the finished mesh is pushed along its normals.
    pub offset: f32,
    pub layer_mask: LayerMask,
    pub source: SourceSelection,
}

impl DecalSettings {
    pub const MIN_MAX_ANGLE: f32 = 0.0;
    pub const MAX_MAX_ANGLE: f32 = 180.0;
    pub const MIN_OFFSET: f32 = 0.005;
    pub const MAX_OFFSET: f32 = 0.05;

    pub const DEFAULT_MAX_ANGLE: f32 = 120.0;
    pub const DEFAULT_OFFSET: f32 = 0.009;

    /// Facing limit for decals placed at runtime through
    /// [`DecalProjector::create`](crate::projector::DecalProjector::create).
    pub const PLACED_MAX_ANGLE: f32 = 90.0;

    /// Defaults for decals placed at runtime: only surfaces at most 90
    /// degrees away from the projector receive them.
    pub fn placed() -> Self {
        Self {
            max_angle: Self::PLACED_MAX_ANGLE,
            ..Self::default()
        }
    }

    /// Copy of these settings with angle and offset forced into range.
    ///
    /// NaN values fall back to the defaults.
    pub fn clamped(mut self) -> Self {
        self.max_angle = if self.max_angle.is_nan() {
            Self::DEFAULT_MAX_ANGLE
        } else {
            self.max_angle.clamp(Self::MIN_MAX_ANGLE, Self::MAX_MAX_ANGLE)
        };
        self.offset = if self.offset.is_nan() {
            Self::DEFAULT_OFFSET
        } else {
            self.offset.clamp(Self::MIN_OFFSET, Self::MAX_OFFSET)
        };
        self
    }

    pub fn with_max_angle(mut self, max_angle: f32) -> Self {
        self.max_angle = max_angle;
        self.clamped()
    }

    pub fn with_offset(mut self, offset: f32) -> Self {
        self.offset = offset;
        self.clamped()
    }

    pub fn with_layer_mask(mut self, layer_mask: LayerMask) -> Self {
        self.layer_mask = layer_mask;
        self
    }

    pub fn with_source(mut self, source: SourceSelection) -> Self {
        self.source = source;
        self
    }

    pub fn with_fixed_aspect(mut self, fixed_aspect: bool) -> Self {
        self.fixed_aspect = fixed_aspect;
        self
    }
}

impl Default for DecalSettings {
    fn default() -> Self {
        Self {
            fixed_aspect: true,
            max_angle: Self::DEFAULT_MAX_ANGLE,
            offset: Self::DEFAULT_OFFSET,
            layer_mask: LayerMask::EVERYTHING,
            source: SourceSelection::default(),
        }
    }
}
