//! Core types for the clipboard history store.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Unique identifier for a clip.
///
/// Ids are minted by the store from a persisted counter, so they stay
/// unique across restarts.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClipId(pub u64);

impl fmt::Debug for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClipId({})", self.0)
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a capture contained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipKind {
    Text,
    Image,
}

/// Content hash used for novelty comparison (SHA-256).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub [u8; 32]);

impl Fingerprint {
    /// Compute a fingerprint from raw content bytes.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Fingerprint(hasher.finalize().into())
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| hex::FromHexError::InvalidStringLength)?;
        Ok(Fingerprint(arr))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({}...)", &self.to_hex()[..8])
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Milliseconds since Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Current time.
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards");
        Timestamp(duration.as_millis() as i64)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single clipboard capture.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Clip {
    /// Unique identifier (assigned by store).
    pub id: ClipId,

    /// Text or image.
    pub kind: ClipKind,

    /// For text, the captured string; for images, the relative path of the
    /// on-disk blob.
    pub raw: String,

    /// Content hash for novelty comparison.
    pub fingerprint: Fingerprint,

    /// Optional human-readable summary (dimensions + size for images).
    pub title: Option<String>,

    /// When the capture happened. Set once, never updated.
    pub created_at: Timestamp,
}

/// Input for upserting a clip (before an id is assigned).
#[derive(Clone, Debug)]
pub struct ClipInput {
    /// `None` inserts with a fresh id; `Some` replaces the clip with that id
    /// in place, or inserts it if unknown.
    pub id: Option<ClipId>,
    pub kind: ClipKind,
    pub raw: String,
    pub fingerprint: Fingerprint,
    pub title: Option<String>,
    pub created_at: Timestamp,
}

impl ClipInput {
    /// A text capture.
    pub fn text(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let fingerprint = Fingerprint::from_bytes(raw.as_bytes());
        Self {
            id: None,
            kind: ClipKind::Text,
            raw,
            fingerprint,
            title: None,
            created_at: Timestamp::now(),
        }
    }

    /// An image capture referencing an on-disk blob.
    pub fn image(
        blob_path: impl Into<String>,
        fingerprint: Fingerprint,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            kind: ClipKind::Image,
            raw: blob_path.into(),
            fingerprint,
            title: Some(title.into()),
            created_at: Timestamp::now(),
        }
    }

    /// Target an existing id (replace in place if present).
    pub fn with_id(mut self, id: ClipId) -> Self {
        self.id = Some(id);
        self
    }

    /// Override the capture timestamp.
    pub fn with_created_at(mut self, at: Timestamp) -> Self {
        self.created_at = at;
        self
    }
}

/// Format a byte count with human-readable units, one decimal ("12.4KB").
pub fn readable_size(bytes: usize) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{}{}", bytes, UNITS[unit])
    } else {
        format!("{:.1}{}", value, UNITS[unit])
    }
}
