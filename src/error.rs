use thiserror::Error;

/// Errors surfaced by asset loading and by projector recomputes.
///
/// Recoverable pipeline conditions (unreadable sources, faces clipped away,
/// degenerate normals) are absorbed and never reported here.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to load OBJ geometry: {0}")]
    ObjLoad(#[from] tobj::LoadError),
    #[error("OBJ file contains no geometry")]
    EmptyObj,
    #[error("failed to read texture: {0}")]
    Image(#[from] image::ImageError),
    #[error("projector transform is singular (a scale component is zero)")]
    DegenerateTransform,
}
