//! Host-facing plugin surface.
//!
//! Wires the store, blob cleanup, and monitor together at startup and
//! answers host queries over a channel. Nothing here throws across the
//! boundary: failures are logged and an empty reply is sent instead.

use crate::blobs::BlobStore;
use crate::clipboard::ClipboardSource;
use crate::config::PluginEnv;
use crate::error::Result;
use crate::monitor::Monitor;
use crate::scheduler::Poller;
use crate::store::{CappedStore, StoreConfig, DEFAULT_CAPACITY};
use crate::types::{Clip, ClipId, ClipInput};
use crossbeam_channel::{Receiver, Sender};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

/// A query or command from the host transport, with a reply channel.
pub enum Request {
    /// Most-recently-upserted clip.
    Last(Sender<Option<Clip>>),

    /// Point lookup by id.
    FindOne(ClipId, Sender<Option<Clip>>),

    /// Insert or replace a clip.
    Upsert(ClipInput, Sender<Option<Clip>>),

    /// Full snapshot in store order.
    All(Sender<Vec<Clip>>),

    /// Apply per-session settings (the host sends this on every ping).
    Configure(PluginEnv, Sender<bool>),
}

/// One plugin instance: an owned store handle plus the blob store rooted at
/// the host-supplied working directory.
pub struct Plugin {
    cwd: PathBuf,
    store: Arc<CappedStore>,
    blobs: BlobStore,
}

impl Plugin {
    /// Open the store under `cwd` with blob cleanup attached to eviction.
    ///
    /// This is the only fallible setup step; a store that cannot be opened
    /// at all is surfaced once, here, not per tick.
    pub fn open(cwd: impl AsRef<Path>, env: &PluginEnv) -> Result<Self> {
        let cwd = cwd.as_ref().to_path_buf();

        let blobs = BlobStore::new(&cwd);
        let janitor = blobs.clone();

        let store = CappedStore::open(
            StoreConfig {
                path: cwd.clone(),
                capacity: env.size.unwrap_or(DEFAULT_CAPACITY),
            },
            Box::new(move |clip| janitor.remove(clip)),
        )?;

        info!(cwd = %cwd.display(), capacity = store.capacity(), "clip store opened");

        Ok(Self {
            cwd,
            store: Arc::new(store),
            blobs,
        })
    }

    /// Working directory this plugin is rooted at.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Shared handle to the store.
    pub fn store(&self) -> Arc<CappedStore> {
        Arc::clone(&self.store)
    }

    /// Build a monitor over the given clipboard source.
    pub fn monitor<C: ClipboardSource>(&self, clipboard: C) -> Monitor<C> {
        Monitor::new(clipboard, self.store(), self.blobs.clone())
    }

    /// Build the poll loop for the given clipboard source and settings.
    pub fn poller<C: ClipboardSource>(&self, clipboard: C, env: &PluginEnv) -> Poller<C> {
        Poller::new(self.monitor(clipboard), env)
    }

    /// Apply per-session settings. Capacity changes are user-observable
    /// immediately (shrink evicts); failures are logged, never raised.
    pub fn apply_env(&self, env: &PluginEnv) {
        let capacity = env.size.unwrap_or(DEFAULT_CAPACITY);
        if let Err(err) = self.store.set_capacity(capacity) {
            error!(%err, capacity, "failed to apply store capacity");
        }
    }

    /// Handle one host request. Never panics and never propagates errors;
    /// the reply is best-effort (a dropped receiver is logged and ignored).
    pub fn handle(&self, request: Request) {
        match request {
            Request::Last(reply) => {
                Self::respond("last", reply, self.store.last());
            }
            Request::FindOne(id, reply) => {
                Self::respond("findOne", reply, self.store.find_one(id));
            }
            Request::Upsert(input, reply) => {
                let clip = match self.store.upsert(input) {
                    Ok(clip) => Some(clip),
                    Err(err) => {
                        error!(%err, "upsert failed");
                        None
                    }
                };
                Self::respond("upsert", reply, clip);
            }
            Request::All(reply) => {
                Self::respond("all", reply, self.store.all());
            }
            Request::Configure(env, reply) => {
                self.apply_env(&env);
                Self::respond("configure", reply, true);
            }
        }
    }

    /// Serve requests until the host drops its sender.
    pub fn serve(&self, requests: Receiver<Request>) {
        for request in requests {
            self.handle(request);
        }
        debug!("request channel closed, plugin surface shutting down");
    }

    fn respond<T>(what: &str, reply: Sender<T>, value: T) {
        if reply.send(value).is_err() {
            debug!(what, "reply receiver dropped");
        }
    }
}
