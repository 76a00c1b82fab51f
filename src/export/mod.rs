//! Book-export directory reading.
//!
//! An export directory contains `revision.json` (versions, page trees, asset
//! metadata), `space.json` (book title), and an optional `assets/` directory
//! with locally-bundled asset files. This module parses the manifests into
//! typed structures; it performs no asset I/O itself.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

// ============================================================================
// Manifest Types
// ============================================================================

/// The parsed `revision.json` document.
///
/// Immutable once loaded; both the TOC builder and the asset resolver read
/// from it independently.
#[derive(Debug, Clone, Deserialize)]
pub struct RevisionManifest {
    /// Identifier of the default ("current") version.
    #[serde(rename = "primaryVersionID")]
    pub primary_version_id: String,

    /// All versions, keyed by version ID.
    #[serde(default)]
    pub versions: BTreeMap<String, Version>,

    /// All assets, keyed by asset ID.
    #[serde(default)]
    pub assets: BTreeMap<String, AssetRecord>,
}

/// A single book version with its page tree.
#[derive(Debug, Clone, Deserialize)]
pub struct Version {
    pub title: String,
    /// Root page of this version. Every version has exactly one.
    pub page: PageNode,
}

/// A node in a version's page tree.
///
/// Manifests omit fields freely: `uID` is absent on some nodes, `path` is
/// empty for pure section nodes, and leaf nodes may lack `pages` entirely.
/// Absent fields always default; they are never an error.
#[derive(Debug, Clone, Deserialize)]
pub struct PageNode {
    /// Unique identifier; absent on some nodes.
    #[serde(rename = "uID", default)]
    pub uid: Option<String>,

    pub title: String,

    #[serde(default)]
    pub kind: PageKind,

    /// Relative content path; empty for grouping nodes.
    #[serde(default)]
    pub path: String,

    /// Ordered child pages.
    #[serde(default)]
    pub pages: Vec<PageNode>,
}

/// Page node kind as written in the manifest.
///
/// Only `document` is meaningful to the TOC type mapping; every other kind
/// (grouping values included) maps to a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum PageKind {
    #[default]
    Document,
    Group,
    Other,
}

impl From<String> for PageKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "document" => PageKind::Document,
            "group" => PageKind::Group,
            _ => PageKind::Other,
        }
    }
}

/// Metadata for one asset referenced by page content.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetRecord {
    pub uid: String,

    /// Original filename. Not guaranteed unique across records.
    pub name: String,

    /// Remote fallback source.
    #[serde(rename = "downloadURL", default)]
    pub download_url: String,
}

/// The parsed `space.json` document.
#[derive(Debug, Clone, Default, Deserialize)]
struct Space {
    #[serde(default)]
    name: String,
}

// ============================================================================
// Export Directory
// ============================================================================

/// An opened book-export directory.
///
/// # Example
///
/// ```no_run
/// use bindery::BookExport;
///
/// let export = BookExport::open("path/to/export")?;
/// println!("Title: {}", export.title);
/// println!("Versions: {}", export.manifest.versions.len());
/// # Ok::<(), bindery::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct BookExport {
    /// Root of the export directory.
    pub dir: PathBuf,
    /// Book title from `space.json`; empty if the file is missing.
    pub title: String,
    pub manifest: RevisionManifest,
}

impl BookExport {
    /// Open an export directory and parse its manifests.
    ///
    /// A directory without `revision.json` is not a book export; this is
    /// fatal and surfaced immediately as [`Error::NotABookExport`].
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let revision_path = dir.join("revision.json");
        if !revision_path.is_file() {
            return Err(Error::NotABookExport(dir.to_path_buf()));
        }

        let manifest: RevisionManifest = serde_json::from_slice(&fs::read(&revision_path)?)?;

        // space.json carries only the title; a missing file defaults it.
        let space_path = dir.join("space.json");
        let title = if space_path.is_file() {
            let space: Space = serde_json::from_slice(&fs::read(&space_path)?)?;
            space.name
        } else {
            String::new()
        };

        Ok(BookExport {
            dir: dir.to_path_buf(),
            title,
            manifest,
        })
    }

    /// Directory holding the locally-bundled asset files, if any.
    pub fn assets_dir(&self) -> PathBuf {
        self.dir.join("assets")
    }
}

// ============================================================================
// Tests
// ============================================================================
