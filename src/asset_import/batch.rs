use super::{gltf_file, types::FileToLoad};
use crate::animation::{Animation, BoneRegistry, ClipData};
use crate::ka_error::KaError;
use std::{fs, io, path::Path};

/// A batch is used to load multiple animation files against one shared
/// skeleton. Bones registered by one file keep their ids when later files
/// reference them by name, so every clip in the batch indexes the same
/// palette layout.
#[derive(Default)]
pub struct Batch {
    pub registry: BoneRegistry,
    pub clips: Vec<ClipData>,
}

impl Batch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the clips and skins of one glTF file into this batch
    ///
    /// # Errors
    /// May return `KaError`
    pub fn load(&mut self, file: &FileToLoad) -> Result<(), KaError> {
        let mut clips = gltf_file::load(file, &mut self.registry)?;
        self.clips.append(&mut clips);
        Ok(())
    }

    /// Builds the runtime clips, consuming the batch. The returned registry
    /// is the finished skeleton table including any bones the clips
    /// introduced.
    ///
    /// # Errors
    /// May return `KaError`
    pub fn into_animations(
        self,
    ) -> Result<(Vec<Animation>, BoneRegistry), KaError> {
        let mut registry = self.registry;
        let mut animations = Vec::with_capacity(self.clips.len());
        for clip in self.clips {
            animations.push(Animation::new(clip, &mut registry)?);
        }
        Ok((animations, registry))
    }
}

/// Reads a YAML manifest listing the files of a batch
///
/// # Errors
/// May return `KaError`
pub fn load_manifest<P>(path: P) -> Result<Vec<FileToLoad>, KaError>
where
    P: AsRef<Path>,
{
    let file = fs::File::open(path)?;
    let files = serde_yaml::from_reader(io::BufReader::new(file))?;
    Ok(files)
}
