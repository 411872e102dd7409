use super::types::{ChannelData, KeyPosition, KeyRotation, KeyScale};
use crate::ka_error::KaError;
use crate::maths::{Mat4, Quat, Vec3};

/// Keyframe evaluator for a single bone
///
/// Holds the three channels imported for one node and produces the bone's
/// local transform for an arbitrary animation time. Evaluation is pure so a
/// clip can be shared read-only between any number of animators.
#[derive(Clone, Debug)]
pub struct Bone {
    name: String,
    id: usize,
    positions: Vec<KeyPosition>,
    rotations: Vec<KeyRotation>,
    scales: Vec<KeyScale>,
}

/// Index of the keyframe segment containing `animation_time`. Times past the
/// final keyframe clamp to the last segment so the pose holds there instead
/// of wrapping back to the start.
fn segment_index<K>(
    keys: &[K],
    stamp: impl Fn(&K) -> f32,
    animation_time: f32,
) -> usize {
    for index in 0..keys.len() - 1 {
        if animation_time < stamp(&keys[index + 1]) {
            return index;
        }
    }
    keys.len() - 2
}

/// Interpolation parameter within a segment, clamped to 0 to 1
fn scale_factor(
    last_time_stamp: f32,
    next_time_stamp: f32,
    animation_time: f32,
) -> f32 {
    const EPSILON: f32 = 0.0005;
    ((animation_time - last_time_stamp)
        / (next_time_stamp - last_time_stamp).max(EPSILON))
    .clamp(0.0, 1.0)
}

impl Bone {
    /// Takes ownership of an imported channel. A channel with no keyframes
    /// in any of the three tracks is malformed import data.
    ///
    /// # Errors
    /// `KaError::InvalidAnimationData` if any track is empty
    pub fn new(id: usize, channel: ChannelData) -> Result<Self, KaError> {
        if channel.positions.is_empty()
            || channel.rotations.is_empty()
            || channel.scales.is_empty()
        {
            return Err(KaError::InvalidAnimationData);
        }
        Ok(Self {
            name: channel.node_name,
            id,
            positions: channel.positions,
            rotations: channel.rotations,
            scales: channel.scales,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn id(&self) -> usize {
        self.id
    }

    /// The bone's local transform at `animation_time` (in ticks),
    /// translation applied last: `T * R * S`
    #[must_use]
    pub fn local_transform(&self, animation_time: f32) -> Mat4 {
        self.interpolate_position(animation_time)
            * self.interpolate_rotation(animation_time)
            * self.interpolate_scaling(animation_time)
    }

    fn interpolate_position(&self, animation_time: f32) -> Mat4 {
        if self.positions.len() == 1 {
            return Mat4::translation(self.positions[0].position);
        }

        let p0 = segment_index(
            &self.positions,
            |key| key.time_stamp,
            animation_time,
        );
        let p1 = p0 + 1;
        let factor = scale_factor(
            self.positions[p0].time_stamp,
            self.positions[p1].time_stamp,
            animation_time,
        );
        let position = Vec3::lerp(
            self.positions[p0].position,
            self.positions[p1].position,
            factor,
        );
        Mat4::translation(position)
    }

    fn interpolate_rotation(&self, animation_time: f32) -> Mat4 {
        if self.rotations.len() == 1 {
            return self.rotations[0].orientation.to_mat4();
        }

        let p0 = segment_index(
            &self.rotations,
            |key| key.time_stamp,
            animation_time,
        );
        let p1 = p0 + 1;
        let factor = scale_factor(
            self.rotations[p0].time_stamp,
            self.rotations[p1].time_stamp,
            animation_time,
        );
        let rotation = Quat::slerp(
            self.rotations[p0].orientation,
            self.rotations[p1].orientation,
            factor,
        );
        rotation.to_mat4()
    }

    fn interpolate_scaling(&self, animation_time: f32) -> Mat4 {
        if self.scales.len() == 1 {
            return Mat4::scale(self.scales[0].scale);
        }

        let p0 =
            segment_index(&self.scales, |key| key.time_stamp, animation_time);
        let p1 = p0 + 1;
        let factor = scale_factor(
            self.scales[p0].time_stamp,
            self.scales[p1].time_stamp,
            animation_time,
        );
        let scale = Vec3::lerp(
            self.scales[p0].scale,
            self.scales[p1].scale,
            factor,
        );
        Mat4::scale(scale)
    }
}

#[cfg(test)]
mod tests {
    use super::{scale_factor, segment_index};
    use crate::animation::KeyPosition;
    use crate::maths::Vec3;

    const EPSILON: f32 = 0.0005;

    fn keys(stamps: &[f32]) -> Vec<KeyPosition> {
        stamps
            .iter()
            .map(|&time_stamp| KeyPosition {
                position: Vec3::default(),
                time_stamp,
            })
            .collect()
    }

    #[test]
    fn factor_is_midway_between_stamps() {
        let x = scale_factor(0.0, 10.0, 5.0);
        assert!((x - 0.5).abs() < EPSILON);
        let x = scale_factor(0.0, 10.0, 12.0);
        assert!((x - 1.0).abs() < EPSILON);
        let x = scale_factor(0.0, 10.0, -2.0);
        assert!(x.abs() < EPSILON);
        let x = scale_factor(1.0, 1.0, 1.0);
        assert!((0.0..=1.0).contains(&x));
    }

    #[test]
    fn index_selects_current_segment() {
        let keys = keys(&[0.0, 1.0, 2.5, 4.0]);
        let stamp = |key: &KeyPosition| key.time_stamp;
        assert_eq!(segment_index(&keys, stamp, 0.5), 0);
        assert_eq!(segment_index(&keys, stamp, 1.0), 1);
        assert_eq!(segment_index(&keys, stamp, 3.0), 2);
    }

    #[test]
    fn index_clamps_past_the_last_key() {
        let keys = keys(&[0.0, 1.0, 2.5, 4.0]);
        let stamp = |key: &KeyPosition| key.time_stamp;
        assert_eq!(segment_index(&keys, stamp, 99.0), 2);
    }
}
