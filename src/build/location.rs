//! Where a build's results live in the cache.
//!
//! Pure path arithmetic, nothing touches the filesystem.

use std::path::{Path, PathBuf};

use super::{BuildReference, Layer};
use crate::constants::{ARCHIVE_FILE_NAME, LAYER_ARTIFACT_SUBPATH};
use crate::repository::BuildStatus;

/// The cache directory of one build reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResultLocation {
    dir: PathBuf,
}

impl BuildResultLocation {
    /// `<cache_root>/<reference>`.
    pub fn new(cache_root: impl AsRef<Path>, reference: &BuildReference) -> Self {
        Self {
            dir: cache_root.as_ref().join(reference),
        }
    }

    /// Location under the cache root reported by `status`.
    pub fn for_reference(status: &dyn BuildStatus, reference: &BuildReference) -> Self {
        Self::new(status.cache_root(), reference)
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/dojo.zip`
    #[must_use]
    pub fn archive_path(&self) -> PathBuf {
        self.dir.join(ARCHIVE_FILE_NAME)
    }

    /// `<dir>/dojo/dojo/<layer name>`
    ///
    /// Layer names are joined as given. Callers pass layers from a validated
    /// [`BuildParameters`](super::BuildParameters), whose names are single
    /// path segments.
    #[must_use]
    pub(crate) fn layer_output(&self, layer: &Layer) -> PathBuf {
        self.dir.join(LAYER_ARTIFACT_SUBPATH).join(&layer.name)
    }

    /// Output path of every layer, in layer order.
    #[must_use]
    pub(crate) fn layer_outputs(&self, layers: &[Layer]) -> Vec<PathBuf> {
        layers.iter().map(|layer| self.layer_output(layer)).collect()
    }
}
