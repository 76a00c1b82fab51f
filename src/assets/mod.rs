//! Asset resolution: materializing every manifest asset into a target
//! directory, idempotently.
//!
//! Each asset gets a deterministic, collision-free filename derived from its
//! uid and original name. Assets whose original name is shared by another
//! record are always fetched from their download URL, because the bundled
//! `assets/<name>` file on disk could belong to either record. Already
//! materialized files are skipped wholesale, which makes repeated runs over
//! the same target directory cheap and safe.

pub mod image;

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::Result;
use crate::export::{AssetRecord, BookExport};

pub use self::image::{ImageNormalizer, StandardNormalizer};

// ============================================================================
// Collaborator Traits
// ============================================================================

/// Downloads a URL to a local path.
///
/// The transport is deliberately opaque; implementations may stream, retry,
/// or authenticate however they like. A failed fetch must return an error:
/// the resolver treats it as fatal for that asset and propagates it.
pub trait AssetFetcher {
    fn fetch(&mut self, url: &str, target: &Path) -> Result<()>;
}

/// Receives one callback per asset processed (materialized or skipped).
pub trait ProgressReporter {
    fn on_asset(&mut self, done: usize, total: usize, name: &str);
}

/// Progress reporter that discards all callbacks.
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn on_asset(&mut self, _done: usize, _total: usize, _name: &str) {}
}

// ============================================================================
// Resolution
// ============================================================================

/// Compute the unique on-disk filename for an asset.
///
/// Injective in `uid`: two distinct assets never map to the same name, even
/// when their original names collide.
pub fn unique_asset_name(uid: &str, name: &str) -> String {
    format!("asset{uid}-{name}")
}

/// Materialize every asset in the manifest into `target_dir`.
///
/// `source_dir` is the export directory root; locally-bundled files are
/// looked up under its `assets/` subdirectory. For each asset, in order:
///
/// 1. Skip if the target file already exists (idempotency).
/// 2. Copy the bundled `assets/<name>` file when it exists and no other
///    record shares the name.
/// 3. Otherwise fetch from the record's download URL.
/// 4. Normalize the result if it is an image.
pub fn resolve_assets(
    assets: &BTreeMap<String, AssetRecord>,
    source_dir: &Path,
    target_dir: &Path,
    fetcher: &mut dyn AssetFetcher,
    normalizer: &dyn ImageNormalizer,
    progress: &mut dyn ProgressReporter,
) -> Result<()> {
    fs::create_dir_all(target_dir)?;

    // One frequency pass up front; materialization stays a linear scan.
    let mut name_counts: HashMap<&str, usize> = HashMap::new();
    for record in assets.values() {
        *name_counts.entry(record.name.as_str()).or_insert(0) += 1;
    }

    let total = assets.len();
    for (index, record) in assets.values().enumerate() {
        let target = target_dir.join(unique_asset_name(&record.uid, &record.name));

        if target.exists() {
            debug!("asset {} already materialized, skipping", record.uid);
        } else {
            materialize(record, source_dir, &target, &name_counts, fetcher)?;
            if normalizer.is_image(&target) {
                normalizer.normalize(&target)?;
            }
        }

        progress.on_asset(index + 1, total, &record.name);
    }

    info!("resolved {total} assets into {}", target_dir.display());
    Ok(())
}

/// Put one asset's bytes at `target`, by local copy or download.
fn materialize(
    record: &AssetRecord,
    source_dir: &Path,
    target: &Path,
    name_counts: &HashMap<&str, usize>,
    fetcher: &mut dyn AssetFetcher,
) -> Result<()> {
    let bundled = bundled_asset_path(source_dir, &record.name);
    let ambiguous = name_counts.get(record.name.as_str()).copied().unwrap_or(0) > 1;

    if bundled.is_file() && !ambiguous {
        debug!("asset {}: copying bundled {}", record.uid, record.name);
        fs::copy(&bundled, target)?;
    } else {
        debug!("asset {}: fetching {}", record.uid, record.download_url);
        fetcher.fetch(&record.download_url, target)?;
    }
    Ok(())
}

fn bundled_asset_path(source_dir: &Path, name: &str) -> PathBuf {
    source_dir.join("assets").join(name)
}

impl BookExport {
    /// Resolve this export's assets into `target_dir`.
    ///
    /// Convenience wrapper over [`resolve_assets`] using the export's own
    /// directory as the bundled-asset source.
    pub fn resolve_assets(
        &self,
        target_dir: &Path,
        fetcher: &mut dyn AssetFetcher,
        normalizer: &dyn ImageNormalizer,
        progress: &mut dyn ProgressReporter,
    ) -> Result<()> {
        resolve_assets(
            &self.manifest.assets,
            &self.dir,
            target_dir,
            fetcher,
            normalizer,
            progress,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
