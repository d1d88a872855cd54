//! Polygon clipping against the projection volume.
//!
//! Candidate triangles arrive in projector-local space, where the decal
//! volume is the fixed cube `[-0.5, 0.5]^3`. Each triangle is clipped
//! against the six cube faces with the Sutherland-Hodgman algorithm;
//! see [`unit_cube`].

pub mod unit_cube;

pub use unit_cube::{ClippedFace, CubeFace, UnitCubeClipper};
