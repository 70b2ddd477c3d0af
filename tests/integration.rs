//! End-to-end tests for the clipboard history plugin.

mod common;

use clipkeep::{ClipInput, ClipKind, Plugin, PluginEnv, Request};
use common::MockClipboard;
use crossbeam_channel::bounded;
use tempfile::TempDir;

fn env_with_size(size: usize) -> PluginEnv {
    PluginEnv {
        size: Some(size),
        ..Default::default()
    }
}

// --- Capture Workflows ---

#[test]
fn test_capture_evict_cleanup_flow() {
    common::init_tracing();

    let dir = TempDir::new().unwrap();
    let plugin = Plugin::open(dir.path(), &env_with_size(1)).unwrap();
    assert_eq!(plugin.cwd(), dir.path());
    let store = plugin.store();

    let clipboard = MockClipboard::default();
    let mut monitor = plugin.monitor(clipboard.clone());

    // Capture an image; the blob must land on disk.
    clipboard.set_image(&[1, 2, 3], 3, 1);
    monitor.capture(false).unwrap();

    let image_clip = store.last().unwrap();
    assert_eq!(image_clip.kind, ClipKind::Image);
    let blob_path = dir.path().join(&image_clip.raw);
    assert!(blob_path.exists());

    // A new capture over capacity 1 evicts the image and deletes its blob.
    clipboard.set_text("next capture");
    monitor.capture(false).unwrap();

    assert!(!blob_path.exists());
    assert!(store.find_one(image_clip.id).is_none());
    assert_eq!(store.last().unwrap().raw, "next capture");
}

#[test]
fn test_evicting_text_clip_touches_no_files() {
    let dir = TempDir::new().unwrap();
    let plugin = Plugin::open(dir.path(), &env_with_size(1)).unwrap();
    let store = plugin.store();

    let clipboard = MockClipboard::default();
    let mut monitor = plugin.monitor(clipboard.clone());

    clipboard.set_text("first");
    monitor.capture(false).unwrap();
    clipboard.set_text("second");
    monitor.capture(false).unwrap();

    // Cleanup ran for the evicted text clip and was a no-op: text content
    // is never interpreted as a blob path.
    assert_eq!(store.len(), 1);
    assert_eq!(store.last().unwrap().raw, "second");
}

#[test]
fn test_evicted_text_content_never_deletes_files() {
    let dir = TempDir::new().unwrap();
    let plugin = Plugin::open(dir.path().join("store"), &env_with_size(1)).unwrap();
    let store = plugin.store();

    // A user copies the path of one of their files, then keeps copying.
    let victim = dir.path().join("notes.txt");
    std::fs::write(&victim, b"important").unwrap();

    store
        .upsert(ClipInput::text(victim.to_str().unwrap()))
        .unwrap();
    store.upsert(ClipInput::text("something else")).unwrap();

    // Evicting the path-shaped text clip must not touch the named file.
    assert_eq!(store.len(), 1);
    assert!(victim.exists());
    assert_eq!(std::fs::read(&victim).unwrap(), b"important");
}

#[test]
fn test_duplicate_stream_with_interleaved_change() {
    let dir = TempDir::new().unwrap();
    let plugin = Plugin::open(dir.path(), &env_with_size(10)).unwrap();
    let store = plugin.store();

    let clipboard = MockClipboard::default();
    let mut monitor = plugin.monitor(clipboard.clone());

    clipboard.set_text("alpha");
    monitor.capture(false).unwrap();
    monitor.capture(false).unwrap(); // identical, suppressed

    clipboard.set_text("beta");
    monitor.capture(false).unwrap();

    clipboard.set_text("alpha"); // re-copy after a change: new clip
    monitor.capture(false).unwrap();

    let raws: Vec<_> = store.all().iter().map(|c| c.raw.clone()).collect();
    assert_eq!(raws, vec!["alpha", "beta", "alpha"]);
}

#[test]
fn test_capacity_scenario_a_b_c() {
    let dir = TempDir::new().unwrap();
    let plugin = Plugin::open(dir.path(), &env_with_size(2)).unwrap();
    let store = plugin.store();

    let a = store.upsert(ClipInput::text("A")).unwrap();
    store.upsert(ClipInput::text("B")).unwrap();
    store.upsert(ClipInput::text("C")).unwrap();

    let raws: Vec<_> = store.all().iter().map(|c| c.raw.clone()).collect();
    assert_eq!(raws, vec!["B", "C"]);
    assert!(store.find_one(a.id).is_none());
}

// --- Host Query Surface ---

#[test]
fn test_served_queries_across_threads() {
    let dir = TempDir::new().unwrap();
    let plugin = Plugin::open(dir.path(), &env_with_size(10)).unwrap();

    let (req_tx, req_rx) = bounded(16);
    let server = std::thread::spawn(move || plugin.serve(req_rx));

    let (tx, rx) = bounded(1);
    req_tx
        .send(Request::Upsert(ClipInput::text("from host"), tx))
        .unwrap();
    let clip = rx.recv().unwrap().unwrap();

    let (tx, rx) = bounded(1);
    req_tx.send(Request::FindOne(clip.id, tx)).unwrap();
    assert_eq!(rx.recv().unwrap().unwrap().raw, "from host");

    let (tx, rx) = bounded(1);
    req_tx.send(Request::All(tx)).unwrap();
    assert_eq!(rx.recv().unwrap().len(), 1);

    drop(req_tx);
    server.join().unwrap();
}

#[test]
fn test_reads_interleaved_with_captures_never_see_overflow() {
    let dir = TempDir::new().unwrap();
    let plugin = Plugin::open(dir.path(), &env_with_size(5)).unwrap();
    let store = plugin.store();

    let clipboard = MockClipboard::default();
    let mut monitor = plugin.monitor(clipboard.clone());

    let reader_store = plugin.store();
    let reader = std::thread::spawn(move || {
        for _ in 0..200 {
            assert!(reader_store.all().len() <= 5);
            assert!(reader_store.len() <= 5);
        }
    });

    for i in 0..50 {
        clipboard.set_text(&format!("capture {}", i));
        monitor.capture(false).unwrap();
    }

    reader.join().unwrap();
    assert_eq!(store.len(), 5);
}

// --- Persistence ---

#[test]
fn test_history_survives_reopen() {
    let dir = TempDir::new().unwrap();

    let kept;
    {
        let plugin = Plugin::open(dir.path(), &env_with_size(10)).unwrap();
        let store = plugin.store();
        store.upsert(ClipInput::text("keep me")).unwrap();
        kept = store.last().unwrap();
    }

    let plugin = Plugin::open(dir.path(), &env_with_size(10)).unwrap();
    let store = plugin.store();
    assert_eq!(store.len(), 1);
    assert_eq!(store.find_one(kept.id).unwrap().raw, "keep me");
}

#[test]
fn test_configure_shrink_is_observable_and_persisted() {
    let dir = TempDir::new().unwrap();

    {
        let plugin = Plugin::open(dir.path(), &env_with_size(10)).unwrap();
        let store = plugin.store();
        for i in 0..6 {
            store.upsert(ClipInput::text(format!("clip {}", i))).unwrap();
        }

        let (tx, rx) = bounded(1);
        plugin.handle(Request::Configure(env_with_size(3), tx));
        assert!(rx.recv().unwrap());
        assert_eq!(store.len(), 3);
    }

    let plugin = Plugin::open(dir.path(), &env_with_size(10)).unwrap();
    assert_eq!(plugin.store().len(), 3);
}
