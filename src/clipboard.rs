//! Abstraction over the operating-system clipboard.
//!
//! The host supplies an implementation; the monitor only needs format
//! queries and raw text/image reads. Read failures are surfaced as errors
//! and downgraded to "no capture this tick" by the monitor.

use crate::error::Result;

/// Image content read from the clipboard.
pub trait ImageContent {
    /// Whether the clipboard held no image.
    fn is_empty(&self) -> bool;

    /// Raw bitmap bytes. Fast on Windows and macOS, slow on Linux.
    fn bitmap(&self) -> Vec<u8>;

    /// Encoded data-URL form. The faster representation on Linux.
    fn to_data_url(&self) -> String;

    /// Lossless PNG encoding for on-disk persistence.
    fn to_png(&self) -> Vec<u8>;

    /// Pixel dimensions (width, height).
    fn dimensions(&self) -> (u32, u32);
}

/// Read access to the OS clipboard.
pub trait ClipboardSource {
    type Image: ImageContent;

    /// Whether the clipboard currently carries the given format marker.
    fn has_format(&self, marker: &str) -> bool;

    /// Current text contents (empty string when none).
    fn read_text(&self) -> Result<String>;

    /// Current image contents (an empty image when none).
    fn read_image(&self) -> Result<Self::Image>;
}
