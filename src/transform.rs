//! Transform component for projectors and scene objects.
//!
//! Provides a [`Transform`] struct with a fluent API for managing position,
//! rotation (Euler angles), and scale. Every mutation raises a change flag
//! that the host polls to decide when a decal needs recomputing.

use crate::math::{mat4::Mat4, vec3::Vec3};

/// A 3D transform with position, rotation (Euler angles), and scale.
///
/// Provides a fluent API where mutating methods return `&mut Self` for chaining:
///
/// ```ignore
/// transform
///     .set_position_xyz(5.0, 2.0, 0.0)
///     .rotate_y(0.1)
///     .set_scale_xyz(2.0, 1.0, 0.5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    position: Vec3,
    rotation: Vec3, // Euler angles in radians: x=pitch, y=yaw, z=roll
    scale: Vec3,
    changed: bool,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            changed: true,
        }
    }
}

impl Transform {
    /// Create a new transform with default values (position=0, rotation=0, scale=1).
    ///
    /// A fresh transform reports itself as changed.
    pub fn new() -> Self {
        Self::default()
    }

    // ============ Position ============

    /// Get the position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Set the position.
    pub fn set_position(&mut self, position: Vec3) -> &mut Self {
        self.position = position;
        self.mark_changed()
    }

    /// Set the position from x, y, z components.
    pub fn set_position_xyz(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.set_position(Vec3::new(x, y, z))
    }

    /// Translate by a delta vector.
    pub fn translate(&mut self, delta: Vec3) -> &mut Self {
        self.position = self.position + delta;
        self.mark_changed()
    }

    // ============ Rotation ============

    /// Get the rotation (Euler angles in radians).
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Set the rotation (Euler angles in radians).
    pub fn set_rotation(&mut self, rotation: Vec3) -> &mut Self {
        self.rotation = rotation;
        self.mark_changed()
    }

    /// Set the rotation from x, y, z components (radians).
    pub fn set_rotation_xyz(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.set_rotation(Vec3::new(x, y, z))
    }

    /// Rotate around the X axis (pitch).
    pub fn rotate_x(&mut self, angle: f32) -> &mut Self {
        self.rotation.x += angle;
        self.mark_changed()
    }

    /// Rotate around the Y axis (yaw).
    pub fn rotate_y(&mut self, angle: f32) -> &mut Self {
        self.rotation.y += angle;
        self.mark_changed()
    }

    /// Rotate around the Z axis (roll).
    pub fn rotate_z(&mut self, angle: f32) -> &mut Self {
        self.rotation.z += angle;
        self.mark_changed()
    }

    // ============ Scale ============

    /// Get the scale.
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Set the scale.
    pub fn set_scale(&mut self, scale: Vec3) -> &mut Self {
        self.scale = scale;
        self.mark_changed()
    }

    /// Set the scale from x, y, z components.
    pub fn set_scale_xyz(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.set_scale(Vec3::new(x, y, z))
    }

    /// Set uniform scale (same value for x, y, z).
    pub fn set_scale_uniform(&mut self, s: f32) -> &mut Self {
        self.set_scale(Vec3::new(s, s, s))
    }

    /// Overwrite the scale without touching the change flag.
    ///
    /// Used by aspect locking, which must not retrigger a recompute.
    pub(crate) fn set_scale_silently(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    // ============ Change tracking ============

    /// Whether the transform was mutated since the flag was last taken.
    pub fn has_changed(&self) -> bool {
        self.changed
    }

    /// Returns the change flag and clears it.
    pub fn take_changed(&mut self) -> bool {
        std::mem::replace(&mut self.changed, false)
    }

    fn mark_changed(&mut self) -> &mut Self {
        self.changed = true;
        self
    }

    // ============ Matrix Generation ============

    /// Generate the local-to-world matrix.
    ///
    /// Order: Translation * RotationX * RotationY * RotationZ * Scale
    /// (Scale applied first, then rotations, then translation)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::translation(self.position.x, self.position.y, self.position.z)
            * Mat4::rotation_x(self.rotation.x)
            * Mat4::rotation_y(self.rotation.y)
            * Mat4::rotation_z(self.rotation.z)
            * Mat4::scaling(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Generate the world-to-local matrix.
    ///
    /// Returns `None` when a scale component is zero.
    pub fn world_to_local(&self) -> Option<Mat4> {
        self.to_matrix().inverse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default() {
        let t = Transform::default();
        assert_eq!(t.position(), Vec3::ZERO);
        assert_eq!(t.rotation(), Vec3::ZERO);
        assert_eq!(t.scale(), Vec3::ONE);
        assert!(t.has_changed());
    }

    #[test]
    fn test_fluent_api() {
        let mut t = Transform::new();
        t.set_position_xyz(1.0, 2.0, 3.0)
            .rotate_y(0.5)
            .set_scale_uniform(2.0);

        assert_eq!(t.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(t.rotation().y, 0.5);
        assert_eq!(t.scale(), Vec3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_change_flag() {
        let mut t = Transform::new();
        assert!(t.take_changed());
        assert!(!t.has_changed());

        t.set_scale_silently(Vec3::new(3.0, 1.0, 1.0));
        assert!(!t.has_changed());

        t.translate(Vec3::UP);
        assert!(t.take_changed());
        assert!(!t.take_changed());
    }

    #[test]
    fn test_to_matrix_identity() {
        let t = Transform::default();
        let m = t.to_matrix();
        // Default transform should produce identity matrix
        assert_eq!(m, Mat4::identity());
    }

    #[test]
    fn test_world_to_local_maps_into_unit_space() {
        let mut t = Transform::new();
        t.set_position_xyz(10.0, 0.0, 0.0).set_scale_xyz(2.0, 2.0, 2.0);
        let to_local = t.world_to_local().expect("non-zero scale");
        let p = to_local * Vec3::new(11.0, 0.0, 0.0);
        assert_relative_eq!(p.x, 0.5, epsilon = 1e-6);

        t.set_scale_xyz(1.0, 0.0, 1.0);
        assert!(t.world_to_local().is_none());
    }
}
