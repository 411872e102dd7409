//! Skeletal animation toolkit for Vulkan style renderers.
//!
//! The crate is built around three layers: a small linear algebra core in
//! [`maths`], the animation evaluation pipeline in [`animation`], and the
//! glTF import boundary in [`asset_import`]. A renderer consumes the output
//! of [`animation::Animator`] as a bone matrix palette and the matrices from
//! [`camera::Camera`]; everything GPU side is out of scope for this crate.

pub mod animation;
pub mod asset_import;
pub mod camera;
pub mod ka_error;
pub mod maths;
pub mod types;
