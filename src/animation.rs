mod animator;
mod bone;
mod clip;
mod types;

// Re-exports
pub use {
    animator::Animator,
    bone::Bone,
    clip::{Animation, HierarchyNode},
    types::{
        BoneInfo, BoneRegistry, ChannelData, ClipData, KeyPosition,
        KeyRotation, KeyScale, NodeData,
    },
};
