use std::{error, fmt};

/// Unified error type
///
/// Import related failures have their own taxonomy in
/// `asset_import::ImportError` and are converted into this type at the
/// module boundary. Some wrapped error types are large so are boxed.
#[derive(Debug)]
pub enum KaError {
    InvalidAnimationData,
    StdIoError(std::io::Error),
    SerdeYamlError(Box<serde_yaml::Error>),
    GltfError(Box<gltf::Error>),
    ImportError(crate::asset_import::ImportError),
}

impl error::Error for KaError {}

impl fmt::Display for KaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidAnimationData => {
                write!(f, "animation channel has no keyframes")
            }
            Self::StdIoError(e) => write!(f, "std::io::Error: {}", e.kind()),
            Self::SerdeYamlError(e) => {
                write!(f, "serde_yaml::Error: {e}")
            }
            Self::GltfError(e) => {
                write!(f, "gltf Error: {e}")
            }
            Self::ImportError(e) => write!(f, "import error: {e}"),
        }
    }
}

impl From<std::io::Error> for KaError {
    fn from(e: std::io::Error) -> Self {
        Self::StdIoError(e)
    }
}

impl From<serde_yaml::Error> for KaError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::SerdeYamlError(Box::new(e))
    }
}

impl From<crate::asset_import::ImportError> for KaError {
    fn from(e: crate::asset_import::ImportError) -> Self {
        Self::ImportError(e)
    }
}
