use std::path::{Path, PathBuf};

pub const CLASSIFICATIONS_FILE: &str = "classifications.json";
pub const SPACES_FILE: &str = "spaces.json";
pub const OCCUPATIONS_FILE: &str = "occupations.json";

pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Where the classification tree comes from when the store has none yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationSource {
    Defaults,
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub classifications: ClassificationSource,
    pub spaces_file: PathBuf,
    pub occupations_file: PathBuf,
    pub with_occupations: bool,
    pub chunk_size: usize,
}

impl RunConfig {
    /// Resolve the fixed export file names inside `import_dir`.
    pub fn from_import_dir(import_dir: &Path, classifications_from_file: bool) -> Self {
        let classifications = if classifications_from_file {
            ClassificationSource::File(import_dir.join(CLASSIFICATIONS_FILE))
        } else {
            ClassificationSource::Defaults
        };
        Self {
            classifications,
            spaces_file: import_dir.join(SPACES_FILE),
            occupations_file: import_dir.join(OCCUPATIONS_FILE),
            with_occupations: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Exports read on every run, in pipeline order. The classification file is
    /// only read, and hashed, when the store has no tree yet.
    pub fn input_files(&self) -> Vec<&Path> {
        let mut out: Vec<&Path> = vec![self.spaces_file.as_path()];
        if self.with_occupations {
            out.push(&self.occupations_file);
        }
        out
    }
}
