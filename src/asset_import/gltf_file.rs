use super::types::{FileToLoad, ImportError};
use crate::{
    animation::{
        BoneRegistry, ChannelData, ClipData, KeyPosition, KeyRotation,
        KeyScale, NodeData,
    },
    ka_error::KaError,
    maths::{Mat4, Quat, Vec3, Vec4},
};
use ahash::HashMap;
use gltf::{
    animation::{util::ReadOutputs, Interpolation},
    buffer::{self, Data},
    Document, Gltf, Node,
};
use itertools::izip;
use log::{info, warn};
use std::{fs, io, path::Path};

/// Change of basis from glTF +Y up to the engine's +Z up. Orthonormal, so
/// the inverse is the transpose.
const SWIZZLE: Mat4 = Mat4::from_cols(
    Vec4::new(1.0, 0.0, 0.0, 0.0),
    Vec4::new(0.0, 0.0, 1.0, 0.0),
    Vec4::new(0.0, -1.0, 0.0, 0.0),
    Vec4::new(0.0, 0.0, 0.0, 1.0),
);

/// glTF names are optional, so unnamed nodes get a stable synthetic name.
/// Channels, skins and the hierarchy all go through here so the names
/// agree.
fn node_label(node: &Node) -> String {
    node.name().map_or_else(
        || format!("node{}", node.index()),
        std::string::ToString::to_string,
    )
}

fn convert_position(p: [f32; 3], file: &FileToLoad) -> Vec3 {
    if file.swizzle {
        Vec3::new(p[0], -p[2], p[1]) * file.scale
    } else {
        Vec3::new(p[0], p[1], p[2]) * file.scale
    }
}

/// glTF rotations are x, y, z, w. The swizzle permutes the imaginary part
/// the same way it permutes positions.
fn convert_quat(q: [f32; 4], file: &FileToLoad) -> Quat {
    if file.swizzle {
        Quat::new(q[3], q[0], -q[2], q[1])
    } else {
        Quat::new(q[3], q[0], q[1], q[2])
    }
}

fn convert_scale(s: [f32; 3], file: &FileToLoad) -> Vec3 {
    if file.swizzle {
        Vec3::new(s[0], s[2], s[1])
    } else {
        Vec3::new(s[0], s[1], s[2])
    }
}

/// Conjugates a full matrix by the axis change and applies the uniform
/// scale to its translation column
fn convert_matrix(m: [[f32; 4]; 4], file: &FileToLoad) -> Mat4 {
    let mut m = Mat4::from(m);
    if file.swizzle {
        m = SWIZZLE * m * SWIZZLE.transpose();
    }
    m[3].x *= file.scale;
    m[3].y *= file.scale;
    m[3].z *= file.scale;
    m
}

fn load_impl<P>(path: P) -> Result<(Document, Vec<buffer::Data>), KaError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let base = path.parent().unwrap_or_else(|| Path::new("./"));
    let file = fs::File::open(path).map_err(KaError::StdIoError)?;
    let reader = io::BufReader::new(file);
    let gltf = Gltf::from_reader(reader)
        .map_err(|e| KaError::GltfError(Box::new(e)))?;
    let buffers = gltf::import_buffers(&gltf.document, Some(base), gltf.blob)
        .map_err(|e| KaError::GltfError(Box::new(e)))?;

    info!(
        "{:?}, base path={:?}, buffer count={}",
        path,
        base,
        buffers.len(),
    );

    Ok((gltf.document, buffers))
}

/// Recursive copy of the rest pose tree
fn build_node(node: &Node, file: &FileToLoad) -> NodeData {
    NodeData {
        name: node_label(node),
        transform: convert_matrix(node.transform().matrix(), file),
        children: node
            .children()
            .map(|child| build_node(&child, file))
            .collect(),
    }
}

fn build_root(
    document: &Document,
    file: &FileToLoad,
) -> Result<NodeData, KaError> {
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or(ImportError::EmptyScene)?;
    let mut roots: Vec<NodeData> =
        scene.nodes().map(|node| build_node(&node, file)).collect();

    // A glTF scene may have several root nodes but the clip hierarchy wants
    // exactly one, so extra roots get a synthetic parent.
    Ok(if roots.len() == 1 {
        roots.remove(0)
    } else {
        NodeData {
            name: "scene".to_string(),
            transform: Mat4::identity(),
            children: roots,
        }
    })
}

/// Registers every skin joint with its inverse bind matrix
fn load_skins(
    document: &Document,
    buffers: &[Data],
    file: &FileToLoad,
    registry: &mut BoneRegistry,
) -> Result<(), KaError> {
    for skin in document.skins() {
        let reader = skin.reader(|x| Some(&buffers[x.index()]));
        let Some(matrices) = reader.read_inverse_bind_matrices() else {
            return Err(ImportError::NoInverseBind.into());
        };
        let mut count = 0usize;
        for (joint, ibm) in skin.joints().zip(matrices) {
            registry.register(&node_label(&joint), convert_matrix(ibm, file));
            count += 1;
        }
        info!("skin={}, joints={}", skin.index(), count);
    }
    Ok(())
}

/// A channel whose three tracks hold the node's rest pose as single keys.
/// glTF channels only carry the property they animate, while a bone always
/// evaluates all three tracks, so the missing ones fall back to rest.
fn rest_channel(label: &str, node: &Node, file: &FileToLoad) -> ChannelData {
    let (translation, rotation, scale) = node.transform().decomposed();
    ChannelData {
        node_name: label.to_string(),
        positions: vec![KeyPosition {
            position: convert_position(translation, file),
            time_stamp: 0.0,
        }],
        rotations: vec![KeyRotation {
            orientation: convert_quat(rotation, file),
            time_stamp: 0.0,
        }],
        scales: vec![KeyScale {
            scale: convert_scale(scale, file),
            time_stamp: 0.0,
        }],
    }
}

/// Reads all channels of one clip, merged per target node, and the clip
/// duration in seconds
fn read_channels(
    animation: &gltf::Animation,
    buffers: &[Data],
    file: &FileToLoad,
) -> Result<(HashMap<String, ChannelData>, f32), KaError> {
    let mut channels: HashMap<String, ChannelData> = HashMap::default();
    let mut duration = 0.0f32;

    for channel in animation.channels() {
        if channel.sampler().interpolation() == Interpolation::CubicSpline {
            return Err(ImportError::UnsupportedInterpolation.into());
        }

        let node = channel.target().node();
        let label = node_label(&node);
        let reader = channel.reader(|x| Some(&buffers[x.index()]));
        let Some(inputs) = reader.read_inputs() else {
            return Err(ImportError::NoSampler.into());
        };
        let times: Vec<f32> = inputs.collect();
        duration = duration.max(times.last().copied().unwrap_or(0.0));

        let entry = channels
            .entry(label.clone())
            .or_insert_with(|| rest_channel(&label, &node, file));
        match reader.read_outputs() {
            Some(ReadOutputs::Translations(values)) => {
                entry.positions = izip!(&times, values)
                    .map(|(&time_stamp, p)| KeyPosition {
                        position: convert_position(p, file),
                        time_stamp,
                    })
                    .collect();
            }
            Some(ReadOutputs::Rotations(values)) => {
                entry.rotations = izip!(&times, values.into_f32())
                    .map(|(&time_stamp, q)| KeyRotation {
                        orientation: convert_quat(q, file),
                        time_stamp,
                    })
                    .collect();
            }
            Some(ReadOutputs::Scales(values)) => {
                entry.scales = izip!(&times, values)
                    .map(|(&time_stamp, s)| KeyScale {
                        scale: convert_scale(s, file),
                        time_stamp,
                    })
                    .collect();
            }
            Some(ReadOutputs::MorphTargetWeights(_)) => {
                return Err(ImportError::Morphing.into());
            }
            None => {
                return Err(ImportError::NoSampler.into());
            }
        }
    }

    Ok((channels, duration))
}

/// Loads every animation clip of a glTF file and registers the skeleton of
/// its skins. Clip timestamps stay in seconds, so `ticks_per_second` is 1.
///
/// Only a limited subset of glTF is supported, matching files exported from
/// Blender with linear or step samplers.
///
/// # Errors
/// May return `KaError`
pub fn load(
    file: &FileToLoad,
    registry: &mut BoneRegistry,
) -> Result<Vec<ClipData>, KaError> {
    let (document, buffers) = load_impl(Path::new(&file.filename))?;

    load_skins(&document, &buffers, file, registry)?;
    let root = build_root(&document, file)?;

    let mut clips = Vec::new();
    for animation in document.animations() {
        let name = animation.name().map_or_else(
            || format!("clip{}", animation.index()),
            std::string::ToString::to_string,
        );
        let (channels, duration) =
            read_channels(&animation, &buffers, file)?;
        info!(
            "clip={:?}, channels={}, duration={}s",
            name,
            channels.len(),
            duration
        );
        clips.push(ClipData {
            name,
            duration,
            ticks_per_second: 1.0,
            root: root.clone(),
            channels: channels.into_values().collect(),
        });
    }
    if clips.is_empty() {
        warn!("{:?} contains no animations", file.filename);
    }

    Ok(clips)
}
