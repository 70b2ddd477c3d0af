//! On-disk blob handling for image clips.
//!
//! Blob removal is best-effort by design: eviction is the source of truth
//! and must never be blocked or reversed because a secondary file could not
//! be cleaned up. Every swallowed failure is reported through `tracing`.

use crate::error::Result;
use crate::types::{Clip, ClipKind, Timestamp};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Relative directory for image blobs under the working directory.
const IMAGE_DIR: &str = "data/images";

/// Disambiguates blob paths minted within the same millisecond.
static IMAGE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Writes and removes blob files under a working directory.
#[derive(Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    /// Create a blob store rooted at the given working directory. No
    /// directories are created until the first write.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Relative path for an image captured at `at`.
    ///
    /// A sequence suffix keeps two captures within the same millisecond
    /// from sharing a path, which would let the first clip's eviction
    /// delete the file the second still references.
    pub fn image_path(at: Timestamp) -> String {
        let seq = IMAGE_SEQ.fetch_add(1, Ordering::Relaxed);
        format!("{}/{}-{}.png", IMAGE_DIR, at.0, seq)
    }

    /// Write blob bytes at a relative path, creating missing parent
    /// directories.
    pub fn write(&self, relative: &str, bytes: &[u8]) -> Result<()> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = File::create(&path)?;
        file.write_all(bytes)?;
        file.sync_all()?;

        Ok(())
    }

    /// Remove the blob backing an evicted clip.
    ///
    /// Never fails: a clip without a blob reference, a missing file, or a
    /// deletion error all log and return. Only image clips are touched;
    /// a text clip's `raw` is arbitrary clipboard content and must never
    /// be interpreted as a path. Blob paths that escape the working
    /// directory (absolute, or parent-traversing) are refused outright.
    pub fn remove(&self, clip: &Clip) {
        if clip.kind != ClipKind::Image {
            debug!(id = %clip.id, "clip carries no blob, nothing to remove");
            return;
        }

        if clip.raw.is_empty() {
            warn!(id = %clip.id, "image clip has no blob path, nothing to remove");
            return;
        }

        let relative = Path::new(&clip.raw);
        if relative.is_absolute()
            || relative
                .components()
                .any(|c| matches!(c, Component::ParentDir))
        {
            warn!(id = %clip.id, raw = %clip.raw, "blob path escapes the working directory, refusing removal");
            return;
        }

        let path = self.root.join(relative);

        // Accessibility check first, so a vanished file is a warning rather
        // than a deletion error.
        if let Err(err) = fs::metadata(&path) {
            warn!(id = %clip.id, path = %path.display(), %err, "blob not accessible, skipping removal");
            return;
        }

        match fs::remove_file(&path) {
            Ok(()) => debug!(id = %clip.id, path = %path.display(), "removed blob"),
            Err(err) => {
                warn!(id = %clip.id, path = %path.display(), %err, "failed to remove blob")
            }
        }
    }
}
