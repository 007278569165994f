//! Staging of binary payloads as out-of-line assets.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use crate::record::AssetHandle;

// -----------------------------------------------------------------------------
// AssetStager

/// Writes binary payloads to uniquely named files.
///
/// Every staged payload gets its own file; files are kept after staging and
/// belong to the caller (or the store) from then on.
///
/// The encoder uses [`AssetStager::shared`] unless one is supplied through
/// [`RecordEncoder::with_stager`](crate::engine::RecordEncoder::with_stager).
///
/// # Example
///
/// ```
/// use rk_mapper::assets::AssetStager;
///
/// let dir = tempfile::tempdir().unwrap();
/// let stager = AssetStager::new(dir.path());
///
/// let handle = stager.stage(b"payload").unwrap();
/// assert_eq!(handle.read().unwrap(), b"payload");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetStager {
    directory: PathBuf,
}

static SHARED_STAGER: RwLock<Option<AssetStager>> = RwLock::new(None);

impl AssetStager {
    const PREFIX: &'static str = "rk-asset-";
    const SUFFIX: &'static str = ".data";

    /// Creates a stager writing into `directory`.
    #[inline]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    #[inline]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Writes `bytes` to a fresh file and returns its handle.
    pub fn stage(&self, bytes: &[u8]) -> io::Result<AssetHandle> {
        let mut file = tempfile::Builder::new()
            .prefix(Self::PREFIX)
            .suffix(Self::SUFFIX)
            .tempfile_in(&self.directory)?;
        file.write_all(bytes)?;
        file.flush()?;
        let (_, path) = file.keep().map_err(|e| e.error)?;
        log::trace!("staged {} bytes at {}", bytes.len(), path.display());
        Ok(AssetHandle::new(path))
    }

    /// Returns the process-wide stager.
    ///
    /// Defaults to the system temporary directory until [`configure`] is called.
    ///
    /// [`configure`]: Self::configure
    pub fn shared() -> AssetStager {
        SHARED_STAGER
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .unwrap_or_else(|| AssetStager::new(std::env::temp_dir()))
    }

    /// Replaces the process-wide stager.
    pub fn configure(stager: AssetStager) {
        *SHARED_STAGER.write().unwrap_or_else(PoisonError::into_inner) = Some(stager);
    }
}
