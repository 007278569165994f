use std::io;
use std::path::{Path, PathBuf};

/// A handle to a binary payload stored out-of-line.
///
/// Handles are produced by [`AssetStager`](crate::assets::AssetStager) during
/// encoding and read back during decoding.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AssetHandle {
    path: PathBuf,
}

impl AssetHandle {
    #[inline]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the location of the payload.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole payload.
    pub fn read(&self) -> io::Result<Vec<u8>> {
        std::fs::read(&self.path)
    }
}
