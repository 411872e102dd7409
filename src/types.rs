use crate::maths::Mat4;

/// Maximum bones for a skinned mesh. You can't actually change this constant
/// without also changing the value in the skinning shader macro.
pub const MAX_BONES: usize = 100;

/// Trait for camera matrices, needed for rendering
pub trait CameraTrait {
    fn view_matrix(&self) -> Mat4;
    fn proj_matrix(&self) -> Mat4;
}
