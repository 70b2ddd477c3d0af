//! Host-supplied configuration.

use serde::{Deserialize, Serialize};

/// Interval setting as delivered by the host: either a number of
/// milliseconds or a free-form string.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntervalSetting {
    Millis(i64),
    Text(String),
}

/// Per-session plugin configuration.
///
/// Delivered as camelCase JSON by the host transport. Missing fields fall
/// back to defaults; a malformed interval is normalized, never reported.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginEnv {
    /// Store capacity; `None` means the default (50).
    pub size: Option<usize>,

    /// Poll interval; unparseable values resolve to the platform default.
    pub update_interval: Option<IntervalSetting>,

    /// When set, image content is never read and every capture is treated
    /// as text-shaped.
    pub ignore_images: bool,
}
