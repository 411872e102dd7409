use serde::{Deserialize, Serialize};

/// One file of a batch and how to condition its data on the way in.
/// `swizzle` converts from glTF +Y up to the engine's +Z up convention and
/// `scale` is a uniform scale applied to translations and bind matrices.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct FileToLoad {
    pub filename: String,
    pub scale: f32,
    pub swizzle: bool,
}

impl Default for FileToLoad {
    fn default() -> Self {
        Self {
            filename: String::new(),
            scale: 1.0f32,
            swizzle: true,
        }
    }
}

/// Errors specific to importing animation data. `KaError` has a `From`
/// trait to handle these.
#[derive(Debug)]
pub enum ImportError {
    EmptyScene,
    NoSampler,
    UnsupportedInterpolation,
    Morphing,
    NoInverseBind,
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::EmptyScene => {
                write!(f, "the file contains no scene nodes")
            }
            Self::NoSampler => {
                write!(f, "a sampler is required for animation")
            }
            Self::UnsupportedInterpolation => {
                write!(f, "cubic spline interpolation is not supported")
            }
            Self::Morphing => {
                write!(f, "morphing animation is not supported")
            }
            Self::NoInverseBind => {
                write!(
                    f,
                    "inverse bind matrices are required for a skinned mesh"
                )
            }
        }
    }
}
