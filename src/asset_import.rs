pub mod batch;
pub mod gltf_file;
mod types;

// Re-exports
pub use {
    batch::{load_manifest, Batch},
    types::{FileToLoad, ImportError},
};
