//! # bindery
//!
//! A library for ingesting structured book exports: a directory tree of
//! pages, versions, and assets described by JSON manifests.
//!
//! ## Features
//!
//! - Parse `revision.json` / `space.json` manifests into typed structures
//! - Build a navigable table of contents for any version
//! - Materialize assets locally with dedup detection and idempotent re-runs
//! - Normalize oversized images (resize to 700px wide, re-encode)
//! - Render embed cards for externally-linked content
//!
//! ## Quick Start
//!
//! ```no_run
//! use bindery::{build_toc, BookExport, CURRENT_VERSION};
//!
//! let export = BookExport::open("path/to/export")?;
//! let toc = build_toc(&export.manifest, CURRENT_VERSION);
//! for node in &toc {
//!     println!("{} ({})", node.title, node.path);
//! }
//! # Ok::<(), bindery::Error>(())
//! ```
//!
//! ## Resolving Assets
//!
//! Asset resolution needs a download transport, which is supplied as an
//! [`AssetFetcher`] implementation; the library ships the filesystem logic
//! (unique naming, duplicate detection, skip-if-present) and the default
//! [`StandardNormalizer`] for images.

pub mod assets;
pub mod embed;
pub mod error;
pub mod export;
pub mod toc;

pub use assets::{
    AssetFetcher, ImageNormalizer, NoProgress, ProgressReporter, StandardNormalizer,
    resolve_assets, unique_asset_name,
};
pub use embed::{EmbedMetadata, EmbedResolver, render_embed, render_embed_card};
pub use error::{Error, Result};
pub use export::{AssetRecord, BookExport, PageKind, PageNode, RevisionManifest, Version};
pub use toc::{CURRENT_VERSION, NavNode, NavType, build_toc};
