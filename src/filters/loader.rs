//! Device-program source loading.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::FilterError;

use super::registry::{self, FilterDescriptor};

/// Resolves filter names and reads the matching WGSL source from disk.
///
/// Sources are re-read on every run; compilation dominates cost, so there is
/// nothing worth caching here.
#[derive(Debug, Clone)]
pub struct ProgramLoader {
    root: PathBuf,
}

impl ProgramLoader {
    /// Loader rooted at an explicit program directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Loader rooted at the crate's own `shaders/` directory.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Look up a filter in the registry. No I/O, no device interaction.
    pub fn resolve(&self, filter_name: &str) -> Result<&'static FilterDescriptor, FilterError> {
        registry::resolve(filter_name)
    }

    /// Read the descriptor's program source as UTF-8 text.
    pub fn load_source(&self, descriptor: &FilterDescriptor) -> Result<String, FilterError> {
        let path = self.root.join(format!("{}.wgsl", descriptor.source_id));
        fs::read_to_string(&path).map_err(|source| FilterError::SourceUnavailable { path, source })
    }
}

impl Default for ProgramLoader {
    /// Loader rooted at `shaders/` relative to the working directory.
    fn default() -> Self {
        Self::new("shaders")
    }
}
