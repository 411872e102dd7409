mod matrix;
mod quaternion;
mod vector;

// Re-exports
pub use {
    matrix::{Mat2, Mat4},
    quaternion::Quat,
    vector::{Vec2, Vec3, Vec4},
};
