//! Shared test doubles for the integration suites.

use clipkeep::{ClipError, ClipboardSource, ImageContent, Result};
use parking_lot::Mutex;
use std::sync::Arc;

/// Route tracing output through the test harness. Safe to call repeatedly.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[derive(Clone, Default)]
pub struct MockImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl ImageContent for MockImage {
    fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    fn bitmap(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    fn to_data_url(&self) -> String {
        format!("data:image/png;base64,{:?}", self.pixels)
    }

    fn to_png(&self) -> Vec<u8> {
        let mut png = b"PNG".to_vec();
        png.extend_from_slice(&self.pixels);
        png
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[derive(Default)]
struct State {
    formats: Vec<String>,
    text: String,
    image: MockImage,
    fail_reads: bool,
}

/// Scriptable clipboard: tests keep a clone and mutate it between captures.
#[derive(Clone, Default)]
pub struct MockClipboard {
    state: Arc<Mutex<State>>,
}

impl MockClipboard {
    pub fn set_text(&self, text: &str) {
        let mut state = self.state.lock();
        state.text = text.to_string();
        state.image = MockImage::default();
    }

    pub fn set_image(&self, pixels: &[u8], width: u32, height: u32) {
        self.state.lock().image = MockImage {
            pixels: pixels.to_vec(),
            width,
            height,
        };
    }

    pub fn set_formats(&self, formats: &[&str]) {
        self.state.lock().formats = formats.iter().map(|s| s.to_string()).collect();
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.state.lock().fail_reads = fail;
    }
}

impl ClipboardSource for MockClipboard {
    type Image = MockImage;

    fn has_format(&self, marker: &str) -> bool {
        self.state.lock().formats.iter().any(|f| f == marker)
    }

    fn read_text(&self) -> Result<String> {
        let state = self.state.lock();
        if state.fail_reads {
            return Err(ClipError::Clipboard("mock read failure".into()));
        }
        Ok(state.text.clone())
    }

    fn read_image(&self) -> Result<MockImage> {
        let state = self.state.lock();
        if state.fail_reads {
            return Err(ClipError::Clipboard("mock read failure".into()));
        }
        Ok(state.image.clone())
    }
}
