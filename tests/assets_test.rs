//! Asset resolution: idempotency, duplicate handling, and normalization.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use bindery::{
    AssetFetcher, AssetRecord, Error, ImageNormalizer, NoProgress, ProgressReporter,
    StandardNormalizer, resolve_assets, unique_asset_name,
};

// ============================================================================
// Test Doubles
// ============================================================================

/// Fetcher that writes a fixed payload and records every call.
struct MemFetcher {
    payload: Vec<u8>,
    calls: Vec<(String, PathBuf)>,
}

impl MemFetcher {
    fn new(payload: &[u8]) -> Self {
        MemFetcher {
            payload: payload.to_vec(),
            calls: Vec::new(),
        }
    }
}

impl AssetFetcher for MemFetcher {
    fn fetch(&mut self, url: &str, target: &Path) -> bindery::Result<()> {
        self.calls.push((url.to_string(), target.to_path_buf()));
        fs::write(target, &self.payload)?;
        Ok(())
    }
}

/// Fetcher that always fails.
struct FailFetcher;

impl AssetFetcher for FailFetcher {
    fn fetch(&mut self, url: &str, _target: &Path) -> bindery::Result<()> {
        Err(Error::AssetFetch {
            uid: String::new(),
            url: url.to_string(),
            reason: "simulated outage".to_string(),
        })
    }
}

/// Normalizer that treats everything as an image and counts invocations.
struct CountingNormalizer {
    calls: RefCell<usize>,
}

impl CountingNormalizer {
    fn new() -> Self {
        CountingNormalizer {
            calls: RefCell::new(0),
        }
    }

    fn count(&self) -> usize {
        *self.calls.borrow()
    }
}

impl ImageNormalizer for CountingNormalizer {
    fn is_image(&self, _path: &Path) -> bool {
        true
    }

    fn normalize(&self, _path: &Path) -> bindery::Result<()> {
        *self.calls.borrow_mut() += 1;
        Ok(())
    }
}

/// Normalizer that touches nothing.
struct NoopNormalizer;

impl ImageNormalizer for NoopNormalizer {
    fn is_image(&self, _path: &Path) -> bool {
        false
    }

    fn normalize(&self, _path: &Path) -> bindery::Result<()> {
        Ok(())
    }
}

struct NameCollector {
    names: Vec<String>,
}

impl ProgressReporter for NameCollector {
    fn on_asset(&mut self, _done: usize, _total: usize, name: &str) {
        self.names.push(name.to_string());
    }
}

// ============================================================================
// Fixtures
// ============================================================================

fn record(uid: &str, name: &str) -> AssetRecord {
    AssetRecord {
        uid: uid.to_string(),
        name: name.to_string(),
        download_url: format!("https://example.com/files/{uid}"),
    }
}

fn manifest(records: &[AssetRecord]) -> BTreeMap<String, AssetRecord> {
    records
        .iter()
        .map(|r| (r.uid.clone(), r.clone()))
        .collect()
}

/// Create an export dir with the given bundled asset files.
fn source_with_bundled(files: &[(&str, &[u8])]) -> TempDir {
    let dir = TempDir::new().unwrap();
    let assets = dir.path().join("assets");
    fs::create_dir_all(&assets).unwrap();
    for (name, data) in files {
        fs::write(assets.join(name), data).unwrap();
    }
    dir
}

fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ============================================================================
// Copy vs Download
// ============================================================================

#[test]
fn bundled_asset_is_copied_not_fetched() {
    let source = source_with_bundled(&[("logo.png", b"bundled-bytes")]);
    let target = TempDir::new().unwrap();
    let assets = manifest(&[record("a1", "logo.png")]);

    let mut fetcher = MemFetcher::new(b"remote-bytes");
    resolve_assets(
        &assets,
        source.path(),
        target.path(),
        &mut fetcher,
        &NoopNormalizer,
        &mut NoProgress,
    )
    .unwrap();

    assert!(fetcher.calls.is_empty());
    let materialized = target.path().join(unique_asset_name("a1", "logo.png"));
    assert_eq!(fs::read(materialized).unwrap(), b"bundled-bytes");
}

#[test]
fn missing_bundled_asset_is_fetched() {
    let source = source_with_bundled(&[]);
    let target = TempDir::new().unwrap();
    let assets = manifest(&[record("a1", "logo.png")]);

    let mut fetcher = MemFetcher::new(b"remote-bytes");
    resolve_assets(
        &assets,
        source.path(),
        target.path(),
        &mut fetcher,
        &NoopNormalizer,
        &mut NoProgress,
    )
    .unwrap();

    assert_eq!(fetcher.calls.len(), 1);
    assert_eq!(fetcher.calls[0].0, "https://example.com/files/a1");
    let materialized = target.path().join(unique_asset_name("a1", "logo.png"));
    assert_eq!(fs::read(materialized).unwrap(), b"remote-bytes");
}

#[test]
fn duplicate_names_always_fetched() {
    // Two records share a name; the bundled file could belong to either, so
    // neither may use it.
    let source = source_with_bundled(&[("photo.jpg", b"ambiguous-bytes")]);
    let target = TempDir::new().unwrap();
    let assets = manifest(&[record("a1", "photo.jpg"), record("a2", "photo.jpg")]);

    let mut fetcher = MemFetcher::new(b"remote-bytes");
    resolve_assets(
        &assets,
        source.path(),
        target.path(),
        &mut fetcher,
        &NoopNormalizer,
        &mut NoProgress,
    )
    .unwrap();

    assert_eq!(fetcher.calls.len(), 2);
    for uid in ["a1", "a2"] {
        let materialized = target.path().join(unique_asset_name(uid, "photo.jpg"));
        assert_eq!(fs::read(materialized).unwrap(), b"remote-bytes");
    }
}

#[test]
fn colliding_names_get_distinct_targets() {
    let source = source_with_bundled(&[]);
    let target = TempDir::new().unwrap();
    let assets = manifest(&[record("a1", "photo.jpg"), record("a2", "photo.jpg")]);

    let mut fetcher = MemFetcher::new(b"x");
    resolve_assets(
        &assets,
        source.path(),
        target.path(),
        &mut fetcher,
        &NoopNormalizer,
        &mut NoProgress,
    )
    .unwrap();

    assert_eq!(list_files(target.path()).len(), 2);
}

// ============================================================================
// Idempotency
// ============================================================================

#[test]
fn second_run_performs_no_work() {
    let source = source_with_bundled(&[("logo.png", b"bundled-bytes")]);
    let target = TempDir::new().unwrap();
    let assets = manifest(&[record("a1", "logo.png"), record("a2", "chart.png")]);

    let first_normalizer = CountingNormalizer::new();
    let mut first_fetcher = MemFetcher::new(b"remote-bytes");
    resolve_assets(
        &assets,
        source.path(),
        target.path(),
        &mut first_fetcher,
        &first_normalizer,
        &mut NoProgress,
    )
    .unwrap();
    assert_eq!(first_fetcher.calls.len(), 1); // chart.png only
    assert_eq!(first_normalizer.count(), 2);
    let files_after_first = list_files(target.path());

    let second_normalizer = CountingNormalizer::new();
    let mut second_fetcher = MemFetcher::new(b"remote-bytes");
    resolve_assets(
        &assets,
        source.path(),
        target.path(),
        &mut second_fetcher,
        &second_normalizer,
        &mut NoProgress,
    )
    .unwrap();

    // Zero copies, fetches, or normalizations the second time around.
    assert!(second_fetcher.calls.is_empty());
    assert_eq!(second_normalizer.count(), 0);
    assert_eq!(list_files(target.path()), files_after_first);
}

#[test]
fn skipped_assets_still_report_progress() {
    let source = source_with_bundled(&[("logo.png", b"bundled-bytes")]);
    let target = TempDir::new().unwrap();
    let assets = manifest(&[record("a1", "logo.png")]);

    for _ in 0..2 {
        let mut progress = NameCollector { names: Vec::new() };
        resolve_assets(
            &assets,
            source.path(),
            target.path(),
            &mut MemFetcher::new(b"x"),
            &NoopNormalizer,
            &mut progress,
        )
        .unwrap();
        assert_eq!(progress.names, vec!["logo.png".to_string()]);
    }
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn fetch_failure_propagates() {
    let source = source_with_bundled(&[]);
    let target = TempDir::new().unwrap();
    let assets = manifest(&[record("a1", "logo.png")]);

    let result = resolve_assets(
        &assets,
        source.path(),
        target.path(),
        &mut FailFetcher,
        &NoopNormalizer,
        &mut NoProgress,
    );
    assert!(matches!(result, Err(Error::AssetFetch { .. })));
}

// ============================================================================
// Normalization End-to-End
// ============================================================================

#[test]
fn wide_bundled_image_is_normalized() {
    let mut png = Vec::new();
    image::RgbImage::from_pixel(1000, 400, image::Rgb([10, 20, 30]))
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();

    let source = source_with_bundled(&[("banner.png", &png)]);
    let target = TempDir::new().unwrap();
    let assets = manifest(&[record("a1", "banner.png")]);

    resolve_assets(
        &assets,
        source.path(),
        target.path(),
        &mut MemFetcher::new(b"unused"),
        &StandardNormalizer::default(),
        &mut NoProgress,
    )
    .unwrap();

    let materialized = target.path().join(unique_asset_name("a1", "banner.png"));
    let img = image::open(materialized).unwrap();
    assert_eq!(img.width(), 700);
    assert_eq!(img.height(), 280);
}

#[test]
fn non_image_left_untouched() {
    let source = source_with_bundled(&[("notes.txt", b"plain text")]);
    let target = TempDir::new().unwrap();
    let assets = manifest(&[record("a1", "notes.txt")]);

    resolve_assets(
        &assets,
        source.path(),
        target.path(),
        &mut MemFetcher::new(b"unused"),
        &StandardNormalizer::default(),
        &mut NoProgress,
    )
    .unwrap();

    let materialized = target.path().join(unique_asset_name("a1", "notes.txt"));
    assert_eq!(fs::read(materialized).unwrap(), b"plain text");
}
