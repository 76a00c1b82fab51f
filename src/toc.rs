//! Table-of-contents construction from a version's page tree.
//!
//! Transforms the manifest's recursive page tree into a rendering-ready
//! navigation sequence: the version's root page first as a standalone anchor,
//! followed by its descendants as a flattened forest of top-level siblings
//! (each subtree keeps its nesting below the top level).

use serde::Serialize;

use crate::export::{PageKind, PageNode, RevisionManifest};

/// Version selector that resolves to the manifest's primary version.
pub const CURRENT_VERSION: &str = "current";

// ============================================================================
// Public Types
// ============================================================================

/// A normalized navigation node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavNode {
    /// Source node's `uID`; empty string when absent.
    pub uid: String,
    pub title: String,
    #[serde(rename = "type")]
    pub node_type: NavType,
    pub path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavNode>,
}

/// Navigation node type, derived from the manifest's page kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NavType {
    Page,
    Section,
}

impl From<PageKind> for NavType {
    fn from(kind: PageKind) -> Self {
        match kind {
            PageKind::Document => NavType::Page,
            _ => NavType::Section,
        }
    }
}

// ============================================================================
// Construction
// ============================================================================

/// Build the TOC for the selected version.
///
/// `selector` is either a version ID or [`CURRENT_VERSION`], which resolves
/// to `manifest.primary_version_id`. An unknown version yields an empty
/// sequence rather than an error; there is simply no TOC for it.
///
/// The root page is always emitted first with type `page` and no nested
/// children, regardless of its kind; its descendants follow as top-level
/// siblings with full recursive nesting.
pub fn build_toc(manifest: &RevisionManifest, selector: &str) -> Vec<NavNode> {
    let version_id = if selector == CURRENT_VERSION {
        manifest.primary_version_id.as_str()
    } else {
        selector
    };

    let Some(version) = manifest.versions.get(version_id) else {
        return Vec::new();
    };
    let top = &version.page;

    let mut toc = Vec::with_capacity(1 + top.pages.len());
    toc.push(NavNode {
        uid: top.uid.clone().unwrap_or_default(),
        title: top.title.clone(),
        node_type: NavType::Page,
        path: top.path.clone(),
        children: Vec::new(),
    });
    toc.extend(top.pages.iter().map(nav_node));
    toc
}

/// Recursively transform one page subtree into a [`NavNode`] subtree.
fn nav_node(page: &PageNode) -> NavNode {
    NavNode {
        uid: page.uid.clone().unwrap_or_default(),
        title: page.title.clone(),
        node_type: page.kind.into(),
        path: page.path.clone(),
        children: page.pages.iter().map(nav_node).collect(),
    }
}

// ============================================================================
// Tests
// ============================================================================
