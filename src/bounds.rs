//! Axis-aligned bounding boxes used for the coarse scene query.

use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;

/// An axis-aligned bounding box in world space.
///
/// Boxes are closed: touching boxes count as intersecting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub mins: Vec3,
    pub maxs: Vec3,
}

impl Aabb {
    pub fn new(mins: Vec3, maxs: Vec3) -> Self {
        Self { mins, maxs }
    }

    /// Creates an invalid box with inverted bounds, ready to grow with
    /// [`Aabb::take_point`].
    pub fn new_invalid() -> Self {
        Self::new(Vec3::splat(f32::MAX), Vec3::splat(-f32::MAX))
    }

    /// Smallest box enclosing every point. Empty input yields an invalid box.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut aabb = Self::new_invalid();
        for point in points {
            aabb.take_point(point);
        }
        aabb
    }

    /// The box enclosing the `[-0.5, 0.5]^3` cube after `local_to_world`.
    pub fn from_unit_cube(local_to_world: &Mat4) -> Self {
        let corners = (0..8).map(|i| {
            let corner = Vec3::new(
                if i & 1 == 0 { -0.5 } else { 0.5 },
                if i & 2 == 0 { -0.5 } else { 0.5 },
                if i & 4 == 0 { -0.5 } else { 0.5 },
            );
            *local_to_world * corner
        });
        Self::from_points(corners)
    }

    pub fn is_valid(&self) -> bool {
        self.mins.x <= self.maxs.x && self.mins.y <= self.maxs.y && self.mins.z <= self.maxs.z
    }

    pub fn center(&self) -> Vec3 {
        (self.mins + self.maxs) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.maxs - self.mins) * 0.5
    }

    /// Enlarges this box so it also contains `point`.
    pub fn take_point(&mut self, point: Vec3) {
        self.mins = self.mins.min(point);
        self.maxs = self.maxs.max(point);
    }

    /// Box enclosing this one after an affine transform.
    pub fn transform_by(&self, m: &Mat4) -> Self {
        let (lo, hi) = (self.mins, self.maxs);
        let corners = (0..8).map(|i| {
            let corner = Vec3::new(
                if i & 1 == 0 { lo.x } else { hi.x },
                if i & 2 == 0 { lo.y } else { hi.y },
                if i & 4 == 0 { lo.z } else { hi.z },
            );
            *m * corner
        });
        Self::from_points(corners)
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.mins.x <= other.maxs.x
            && self.maxs.x >= other.mins.x
            && self.mins.y <= other.maxs.y
            && self.maxs.y >= other.mins.y
            && self.mins.z <= other.maxs.z
            && self.maxs.z >= other.mins.z
    }
}
