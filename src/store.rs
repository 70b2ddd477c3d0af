//! Capacity-bounded persistent clip collection.

use crate::error::{ClipError, Result};
use crate::types::{Clip, ClipId, ClipInput};
use fs2::FileExt;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Default number of clips kept before eviction.
pub const DEFAULT_CAPACITY: usize = 50;

/// Collection file name inside the working directory.
const COLLECTION_FILE: &str = "clips.json";

/// Current collection format version.
const COLLECTION_VERSION: u8 = 1;

/// Store configuration.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Working directory for the collection file and blobs.
    pub path: PathBuf,

    /// Maximum number of clips to keep (floor 1).
    pub capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./clipkeep"),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Called with each evicted clip, before it leaves the backing store.
///
/// The listener runs inside the store's write section and must not call
/// back into the store. It is expected to be infallible; resource cleanup
/// failures belong to the listener, not the store.
pub type EvictionListener = Box<dyn Fn(&Clip) + Send + Sync>;

/// Persisted shape of the collection file.
#[derive(Serialize, Deserialize)]
struct Collection {
    version: u8,
    next_id: u64,
    clips: VecDeque<Clip>,
}

struct Inner {
    capacity: usize,
    next_id: u64,
    /// Insertion/update order; front is oldest, back is most recent.
    clips: VecDeque<Clip>,
}

/// A capacity-limited, persistent clip collection.
///
/// Clips are kept in insertion order. Inserting past capacity evicts the
/// single oldest clip and hands it to the eviction listener before removal,
/// so the listener can resolve the clip's backing resources. Shrinking the
/// capacity evicts immediately, oldest first, which keeps eviction bounded
/// to one clip per upsert.
pub struct CappedStore {
    collection_path: PathBuf,

    /// Lock file for exclusive access to the working directory.
    _lock_file: File,

    /// Supplied at construction so no eviction can happen unobserved.
    on_evict: EvictionListener,

    inner: Mutex<Inner>,
}

impl CappedStore {
    /// Open the collection in `config.path`, creating the directory and an
    /// empty collection if missing.
    pub fn open(config: StoreConfig, on_evict: EvictionListener) -> Result<Self> {
        fs::create_dir_all(&config.path)?;

        let lock_file = Self::acquire_lock(&config.path)?;

        let collection_path = config.path.join(COLLECTION_FILE);
        let (next_id, clips) = if collection_path.exists() {
            Self::load(&collection_path)?
        } else {
            (1, VecDeque::new())
        };

        Ok(Self {
            collection_path,
            _lock_file: lock_file,
            on_evict,
            inner: Mutex::new(Inner {
                capacity: config.capacity.max(1),
                next_id,
                clips,
            }),
        })
    }

    /// Insert a new clip or replace an existing one (matched by id).
    ///
    /// Replacement keeps the clip's position and never evicts. Insertion
    /// past capacity evicts the oldest clip, invoking the eviction listener
    /// with it first. Returns the upserted clip.
    pub fn upsert(&self, input: ClipInput) -> Result<Clip> {
        let mut inner = self.inner.lock();

        let id = match input.id {
            Some(id) => {
                // Keep fresh ids ahead of any caller-supplied one.
                if id.0 >= inner.next_id {
                    inner.next_id = id.0 + 1;
                }
                id
            }
            None => {
                let id = ClipId(inner.next_id);
                inner.next_id += 1;
                id
            }
        };

        let clip = Clip {
            id,
            kind: input.kind,
            raw: input.raw,
            fingerprint: input.fingerprint,
            title: input.title,
            created_at: input.created_at,
        };

        if let Some(pos) = inner.clips.iter().position(|c| c.id == clip.id) {
            inner.clips[pos] = clip.clone();
        } else {
            inner.clips.push_back(clip.clone());

            // Capacity can only be exceeded by one here, so a single
            // eviction restores the bound.
            if inner.clips.len() > inner.capacity {
                if let Some(evicted) = inner.clips.front().cloned() {
                    (self.on_evict)(&evicted);
                    inner.clips.pop_front();
                }
            }
        }

        self.persist(&inner)?;

        Ok(clip)
    }

    /// Point lookup; absence is not an error.
    pub fn find_one(&self, id: ClipId) -> Option<Clip> {
        let inner = self.inner.lock();
        inner.clips.iter().find(|c| c.id == id).cloned()
    }

    /// The most-recently-upserted clip.
    pub fn last(&self) -> Option<Clip> {
        let inner = self.inner.lock();
        inner.clips.back().cloned()
    }

    /// Full snapshot in store order. The returned clips are independent of
    /// the store.
    pub fn all(&self) -> Vec<Clip> {
        let inner = self.inner.lock();
        inner.clips.iter().cloned().collect()
    }

    /// Number of live clips.
    pub fn len(&self) -> usize {
        self.inner.lock().clips.len()
    }

    /// Whether the store holds no clips.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().clips.is_empty()
    }

    /// Current capacity.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity
    }

    /// Update the capacity (floor 1).
    ///
    /// Shrinking below the live count evicts the excess immediately, oldest
    /// first, with the eviction listener invoked per clip. This is stricter
    /// than lazily enforcing the bound on the next upsert and is
    /// user-observable: stored clips disappear as soon as the setting lands.
    pub fn set_capacity(&self, capacity: usize) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.capacity = capacity.max(1);

        let mut evicted_any = false;
        while inner.clips.len() > inner.capacity {
            if let Some(evicted) = inner.clips.front().cloned() {
                (self.on_evict)(&evicted);
                inner.clips.pop_front();
                evicted_any = true;
            }
        }

        if evicted_any {
            self.persist(&inner)?;
        }

        Ok(())
    }

    // --- Private helpers ---

    fn load(path: &Path) -> Result<(u64, VecDeque<Clip>)> {
        let bytes = fs::read(path)?;
        let collection: Collection = serde_json::from_slice(&bytes)?;

        if collection.version != COLLECTION_VERSION {
            return Err(ClipError::InvalidFormat(format!(
                "Unsupported collection version: {}",
                collection.version
            )));
        }

        Ok((collection.next_id, collection.clips))
    }

    /// Rewrite the collection file atomically (temp file + rename).
    fn persist(&self, inner: &Inner) -> Result<()> {
        let collection = Collection {
            version: COLLECTION_VERSION,
            next_id: inner.next_id,
            clips: inner.clips.clone(),
        };
        let bytes = serde_json::to_vec(&collection)?;

        let tmp_path = self.collection_path.with_extension("json.tmp");
        {
            use std::io::Write;
            let mut file = File::create(&tmp_path)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.collection_path)?;

        Ok(())
    }

    fn acquire_lock(path: &Path) -> Result<File> {
        let lock_path = path.join("LOCK");
        let lock_file = File::create(lock_path)?;

        lock_file
            .try_lock_exclusive()
            .map_err(|_| ClipError::Locked)?;

        Ok(lock_file)
    }
}
