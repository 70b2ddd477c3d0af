//! Clipboard change detection.
//!
//! One `capture` call per poll tick: read the clipboard, fingerprint the
//! content, and upsert a clip when it differs from the previous observation.
//! Duplicate suppression is a streaming check against the last *observed*
//! capture, not a uniqueness constraint over the store; re-copying earlier
//! content after intervening changes produces a new clip.

use crate::blobs::BlobStore;
use crate::clipboard::{ClipboardSource, ImageContent};
use crate::error::Result;
use crate::store::CappedStore;
use crate::types::{readable_size, ClipInput, ClipKind, Fingerprint, Timestamp};
use std::sync::Arc;
use tracing::{debug, warn};

/// Format markers whose content must not be persisted (password managers,
/// concealed or auto-generated pasteboard types). A denylist, not a
/// guarantee; unknown transient markers are not caught.
pub const TRANSIENT_FORMATS: &[&str] = &[
    "de.petermaurer.TransientPasteboardType",
    "com.typeit4me.clipping",
    "Pasteboard generator type",
    "com.agilebits.onepassword",
    "org.nspasteboard.TransientType",
    "org.nspasteboard.ConcealedType",
    "org.nspasteboard.AutoGeneratedType",
];

/// Kind + fingerprint of the previous observed capture.
#[derive(Clone, Copy, PartialEq, Eq)]
struct LastSeen {
    kind: ClipKind,
    fingerprint: Fingerprint,
}

/// Watches a clipboard source and feeds novel captures into the store.
pub struct Monitor<C: ClipboardSource> {
    clipboard: C,
    store: Arc<CappedStore>,
    blobs: BlobStore,

    /// In-memory marker, independent of store contents.
    last_seen: Option<LastSeen>,
}

/// What one read of the clipboard produced.
enum Capture<I> {
    Text(String),
    Image {
        image: I,
        blob_path: String,
        fingerprint: Fingerprint,
    },
}

impl<C: ClipboardSource> Monitor<C> {
    pub fn new(clipboard: C, store: Arc<CappedStore>, blobs: BlobStore) -> Self {
        Self {
            clipboard,
            store,
            blobs,
            last_seen: None,
        }
    }

    /// Run one capture cycle. Idempotent per external clipboard state.
    ///
    /// Clipboard read failures are logged and treated as "no novel capture
    /// this tick". Store persistence failures propagate; the last-seen
    /// marker is updated first, so a failed write is dropped rather than
    /// retried on every subsequent tick.
    pub fn capture(&mut self, ignore_images: bool) -> Result<()> {
        if self.is_transient() {
            debug!("transient clipboard content, skipping");
            return Ok(());
        }

        let capture = match self.read_capture(ignore_images) {
            Ok(capture) => capture,
            Err(err) => {
                warn!(%err, "clipboard read failed, skipping tick");
                return Ok(());
            }
        };

        let input = match capture {
            Capture::Text(raw) => {
                if raw.is_empty() {
                    return Ok(());
                }
                let input = ClipInput::text(raw);
                if !self.is_novel(ClipKind::Text, input.fingerprint) {
                    return Ok(());
                }
                input
            }
            Capture::Image {
                image,
                blob_path,
                fingerprint,
            } => {
                if !self.is_novel(ClipKind::Image, fingerprint) {
                    return Ok(());
                }
                let title = self.materialize(&image, &blob_path);
                ClipInput::image(blob_path, fingerprint, title)
            }
        };

        self.last_seen = Some(LastSeen {
            kind: input.kind,
            fingerprint: input.fingerprint,
        });

        let clip = self.store.upsert(input)?;
        debug!(id = %clip.id, kind = ?clip.kind, "stored clip");

        Ok(())
    }

    /// Whether the clipboard carries a "do not persist" format marker.
    fn is_transient(&self) -> bool {
        TRANSIENT_FORMATS
            .iter()
            .any(|marker| self.clipboard.has_format(marker))
    }

    fn read_capture(&self, ignore_images: bool) -> Result<Capture<C::Image>> {
        if !ignore_images {
            let image = self.clipboard.read_image()?;
            if !image.is_empty() {
                let fingerprint = Self::image_fingerprint(&image);
                let blob_path = BlobStore::image_path(Timestamp::now());
                return Ok(Capture::Image {
                    image,
                    blob_path,
                    fingerprint,
                });
            }
        }

        Ok(Capture::Text(self.clipboard.read_text()?))
    }

    /// Hash the representation that is cheap to extract on this platform.
    /// Raw bitmaps are fast on Windows and macOS; on Linux the encoded
    /// data-URL form is materially faster.
    fn image_fingerprint(image: &C::Image) -> Fingerprint {
        if cfg!(target_os = "linux") {
            Fingerprint::from_bytes(image.to_data_url().as_bytes())
        } else {
            Fingerprint::from_bytes(&image.bitmap())
        }
    }

    fn is_novel(&self, kind: ClipKind, fingerprint: Fingerprint) -> bool {
        self.last_seen != Some(LastSeen { kind, fingerprint })
    }

    /// Encode the image to PNG, write it to disk, and build the display
    /// title. A write failure is logged and the clip is still stored; the
    /// record may then reference a file that never landed.
    fn materialize(&self, image: &C::Image, blob_path: &str) -> String {
        let png = image.to_png();

        if let Err(err) = self.blobs.write(blob_path, &png) {
            warn!(path = blob_path, %err, "failed to save image blob");
        } else {
            debug!(path = blob_path, "saved image blob");
        }

        let (width, height) = image.dimensions();
        format!("Image: {}x{} ({})", width, height, readable_size(png.len()))
    }
}
