//! Small linear-algebra toolkit used by the projection pipeline.

pub mod mat4;
pub mod vec2;
pub mod vec3;

/// Linear interpolation between `a` and `b`, with `t` clamped to `[0, 1]`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    a + (b - a) * t
}

/// Loose float equality used when comparing host-edited values such as scale.
#[inline]
pub fn approximately(a: f32, b: f32) -> bool {
    approx::relative_eq!(a, b, epsilon = 1e-6, max_relative = 1e-6)
}
