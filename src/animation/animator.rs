use super::clip::Animation;
use crate::maths::Mat4;
use crate::types::MAX_BONES;
use log::{debug, warn};
use std::sync::Arc;

/// Per instance playback state
///
/// Owns the clock and the final bone matrix palette for one model instance.
/// The clip itself is shared read-only through an `Arc`, which is also the
/// hand-off from an asynchronous loader: an animator starts unbound with an
/// identity palette and only animates once `play` is given a finished clip.
#[derive(Clone, Debug)]
pub struct Animator {
    current_time: f32,
    animation: Option<Arc<Animation>>,
    final_bone_matrices: Vec<Mat4>,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new()
    }
}

impl Animator {
    /// New animator with no clip bound and an identity palette
    #[must_use]
    pub fn new() -> Self {
        Self {
            current_time: 0.0,
            animation: None,
            final_bone_matrices: vec![Mat4::identity(); MAX_BONES],
        }
    }

    /// Binds a clip and rewinds the clock
    pub fn play(&mut self, animation: Arc<Animation>) {
        self.current_time = 0.0;
        self.animation = Some(animation);
    }

    /// Advances the clock by `delta_time` seconds and recomputes the whole
    /// palette. Playback loops: the clock wraps modulo the clip duration and
    /// stays in `[0, duration)`. Without a bound clip this is a no-op and
    /// the palette remains identity.
    pub fn update_animation(&mut self, delta_time: f32) {
        let Some(animation) = self.animation.clone() else {
            return;
        };

        let duration = animation.duration();
        if duration > 0.0 {
            let ticks = animation.ticks_per_second() * delta_time;
            self.current_time =
                (self.current_time + ticks).rem_euclid(duration);
        }
        self.calculate_bone_transform(
            &animation,
            animation.root(),
            Mat4::identity(),
        );
    }

    /// Recursive hierarchy walk. Every node composes with its parent's
    /// accumulated transform; only nodes with a bone table entry write a
    /// palette slot, helper nodes just propagate.
    fn calculate_bone_transform(
        &mut self,
        animation: &Animation,
        node_index: usize,
        parent_transform: Mat4,
    ) {
        let Some(node) = animation.node(node_index) else {
            debug!("node index {} not in hierarchy", node_index);
            return;
        };

        let node_transform = animation
            .find_bone(&node.name)
            .map_or(node.transform, |bone| {
                bone.local_transform(self.current_time)
            });

        let global_transform = parent_transform * node_transform;

        if let Some(info) = animation.bone_info(&node.name) {
            if let Some(slot) = self.final_bone_matrices.get_mut(info.id) {
                *slot = global_transform * info.offset;
            } else {
                warn!(
                    "bone {:?} id {} exceeds palette size {}",
                    node.name, info.id, MAX_BONES
                );
            }
        }

        for &child in &node.children {
            self.calculate_bone_transform(animation, child, global_transform);
        }
    }

    /// The palette the skinning shader consumes, `MAX_BONES` column major
    /// matrices. Slots no bone writes to stay identity.
    #[must_use]
    pub fn final_bone_matrices(&self) -> &[Mat4] {
        &self.final_bone_matrices
    }

    #[must_use]
    pub const fn current_time(&self) -> f32 {
        self.current_time
    }

    #[must_use]
    pub fn animation(&self) -> Option<&Arc<Animation>> {
        self.animation.as_ref()
    }
}
