use super::bone::Bone;
use super::types::{BoneInfo, BoneRegistry, ClipData, NodeData};
use crate::ka_error::KaError;
use crate::maths::Mat4;
use ahash::HashMap;
use log::debug;
use smallvec::SmallVec;

/// Importers that report no tick rate get this one. Matches the usual asset
/// pipeline default for "unspecified".
const DEFAULT_TICKS_PER_SECOND: f32 = 25.0;

/// Rest pose node flattened into the clip's arena. `children` are arena
/// indices, never pointers, so the tree is a plain `Vec` with exclusive
/// ownership.
#[derive(Clone, Debug)]
pub struct HierarchyNode {
    pub name: String,
    pub transform: Mat4,
    pub children: SmallVec<[usize; 8]>,
}

/// One animation clip, immutable once built
///
/// Owns the bones driven by this clip, the rest pose hierarchy, and a
/// snapshot of the skeleton's bone table taken at build time. Independent of
/// any model instance; playback state lives in `Animator`.
#[derive(Clone, Debug)]
pub struct Animation {
    name: String,
    duration: f32,
    ticks_per_second: f32,
    bones: Vec<Bone>,
    nodes: Vec<HierarchyNode>,
    bone_info: HashMap<String, BoneInfo>,
}

/// Flattens the importer's node tree depth first, parent before children
fn flatten(nodes: &mut Vec<HierarchyNode>, data: NodeData) -> usize {
    let index = nodes.len();
    nodes.push(HierarchyNode {
        name: data.name,
        transform: data.transform,
        children: SmallVec::new(),
    });
    for child in data.children {
        let child_index = flatten(nodes, child);
        nodes[index].children.push(child_index);
    }
    index
}

impl Animation {
    /// Builds a clip from imported data. Channel names not present in the
    /// registry are registered with fresh ids and identity offsets, the
    /// same way the original skeleton grows when a clip animates a node the
    /// mesh never skinned.
    ///
    /// # Errors
    /// `KaError::InvalidAnimationData` if a channel has an empty track
    pub fn new(
        clip: ClipData,
        registry: &mut BoneRegistry,
    ) -> Result<Self, KaError> {
        let mut nodes = Vec::new();
        flatten(&mut nodes, clip.root);

        let mut bones = Vec::with_capacity(clip.channels.len());
        for channel in clip.channels {
            let id = registry.ensure(&channel.node_name);
            bones.push(Bone::new(id, channel)?);
        }
        debug!(
            "clip {:?}: {} bones, {} hierarchy nodes",
            clip.name,
            bones.len(),
            nodes.len()
        );

        let ticks_per_second = if clip.ticks_per_second > 0.0 {
            clip.ticks_per_second
        } else {
            DEFAULT_TICKS_PER_SECOND
        };

        Ok(Self {
            name: clip.name,
            duration: clip.duration,
            ticks_per_second,
            bones,
            nodes,
            bone_info: registry.table().clone(),
        })
    }

    /// The bone driven by this clip for `name`, or `None` for nodes that
    /// stay in their rest pose
    #[must_use]
    pub fn find_bone(&self, name: &str) -> Option<&Bone> {
        self.bones.iter().find(|bone| bone.name() == name)
    }

    #[must_use]
    pub fn bone_info(&self, name: &str) -> Option<&BoneInfo> {
        self.bone_info.get(name)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn duration(&self) -> f32 {
        self.duration
    }

    #[must_use]
    pub const fn ticks_per_second(&self) -> f32 {
        self.ticks_per_second
    }

    /// Arena index of the hierarchy root
    #[must_use]
    pub const fn root(&self) -> usize {
        0
    }

    #[must_use]
    pub fn node(&self, index: usize) -> Option<&HierarchyNode> {
        self.nodes.get(index)
    }

    #[must_use]
    pub fn nodes(&self) -> &[HierarchyNode] {
        &self.nodes
    }

    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }
}
