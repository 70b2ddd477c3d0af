//! # Clipkeep
//!
//! A bounded, persistent history of clipboard captures.
//!
//! ## Core Concepts
//!
//! - **Clips**: One record per clipboard capture, text or image
//! - **Capped store**: Insertion-ordered collection that evicts the oldest
//!   clip past capacity and notifies a listener before removal
//! - **Blob lifecycle**: Image payloads live on disk and are deleted,
//!   best-effort, exactly when their clip is evicted
//! - **Monitor**: Fingerprint-based change detection over the OS clipboard
//! - **Poller**: Self-rescheduling wait-then-capture loop, one cycle in
//!   flight at a time
//!
//! ## Example
//!
//! ```ignore
//! use clipkeep::{Plugin, PluginEnv};
//!
//! let env: PluginEnv = serde_json::from_str(r#"{"size": 50}"#)?;
//! let plugin = Plugin::open("./history", &env)?;
//!
//! // The host drives queries over a channel...
//! std::thread::spawn({
//!     let store = plugin.store();
//!     move || { let _ = store.last(); }
//! });
//!
//! // ...while the poller watches the clipboard forever.
//! plugin.poller(clipboard, &env).run();
//! ```

pub mod blobs;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod monitor;
pub mod plugin;
pub mod scheduler;
pub mod store;
pub mod types;

// Re-exports
pub use blobs::BlobStore;
pub use clipboard::{ClipboardSource, ImageContent};
pub use config::{IntervalSetting, PluginEnv};
pub use error::{ClipError, Result};
pub use monitor::{Monitor, TRANSIENT_FORMATS};
pub use plugin::{Plugin, Request};
pub use scheduler::{resolve_interval, PollState, Poller, MINIMUM_INTERVAL_MS};
pub use store::{CappedStore, EvictionListener, StoreConfig, DEFAULT_CAPACITY};
pub use types::*;
