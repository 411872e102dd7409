use crate::maths::{Mat4, Quat, Vec3};
use ahash::HashMap;

/// Position sample of an animation channel, timestamp in ticks
#[derive(Clone, Copy, Debug)]
pub struct KeyPosition {
    pub position: Vec3,
    pub time_stamp: f32,
}

/// Rotation sample of an animation channel, timestamp in ticks
#[derive(Clone, Copy, Debug)]
pub struct KeyRotation {
    pub orientation: Quat,
    pub time_stamp: f32,
}

/// Scale sample of an animation channel, timestamp in ticks
#[derive(Clone, Copy, Debug)]
pub struct KeyScale {
    pub scale: Vec3,
    pub time_stamp: f32,
}

/// Palette slot and inverse bind matrix for one bone
#[derive(Clone, Copy, Debug)]
pub struct BoneInfo {
    pub id: usize,
    pub offset: Mat4,
}

/// Name to bone table shared by a skeleton
///
/// The skeleton is a property of the mesh, not of any one clip, so the model
/// loader owns the registry and every clip built against the model looks
/// bones up here by name. Ids are handed out in registration order and are
/// stable for the life of the registry; they index the final matrix palette.
#[derive(Clone, Debug, Default)]
pub struct BoneRegistry {
    map: HashMap<String, BoneInfo>,
}

impl BoneRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a bone with its inverse bind matrix, or updates the matrix
    /// if the name is already known. Returns the bone id.
    pub fn register(&mut self, name: &str, offset: Mat4) -> usize {
        let next_id = self.map.len();
        let info = self
            .map
            .entry(name.to_string())
            .or_insert(BoneInfo { id: next_id, offset });
        info.offset = offset;
        info.id
    }

    /// Returns the id for a name, registering it with an identity offset if
    /// it was not already known. Used for bones introduced by a clip that
    /// the base mesh skeleton never mentioned.
    pub fn ensure(&mut self, name: &str) -> usize {
        let next_id = self.map.len();
        self.map
            .entry(name.to_string())
            .or_insert(BoneInfo {
                id: next_id,
                offset: Mat4::identity(),
            })
            .id
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&BoneInfo> {
        self.map.get(name)
    }

    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[must_use]
    pub fn table(&self) -> &HashMap<String, BoneInfo> {
        &self.map
    }
}

/// Keyframe channel for one node as delivered by the importer
#[derive(Clone, Debug, Default)]
pub struct ChannelData {
    pub node_name: String,
    pub positions: Vec<KeyPosition>,
    pub rotations: Vec<KeyRotation>,
    pub scales: Vec<KeyScale>,
}

/// Rest pose hierarchy node as delivered by the importer. Not every node is
/// a bone; helper and socket nodes carry a transform but no channel.
#[derive(Clone, Debug, Default)]
pub struct NodeData {
    pub name: String,
    pub transform: Mat4,
    pub children: Vec<NodeData>,
}

/// One animation clip as delivered by the importer: the rest pose tree plus
/// a flat list of channels. Timestamps are in ticks; for glTF sources a tick
/// is a second and `ticks_per_second` is 1.
#[derive(Clone, Debug)]
pub struct ClipData {
    pub name: String,
    pub duration: f32,
    pub ticks_per_second: f32,
    pub root: NodeData,
    pub channels: Vec<ChannelData>,
}
