//! Corpus loading: a directory of HTML pages into a [`LinkGraph`].
//!
//! Every `*.html` file directly inside the directory is one page, named by
//! its file name. Links are the `href` values of `<a>` tags. A page's link
//! to itself is ignored, as is any link to a file that is not part of the
//! corpus.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, instrument};

use crate::graph::LinkGraph;

static ANCHOR_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a\s+[^>]*?href="([^"]*)""#).expect("anchor regex must compile")
});

/// Crawl `dir` and build the link graph of its HTML pages.
///
/// # Errors
///
/// Returns an error if the directory or any page cannot be read, or if the
/// directory holds no `.html` pages.
#[instrument]
pub fn crawl(dir: &Path) -> Result<LinkGraph> {
    let mut pages: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read corpus {}", dir.display()))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.ends_with(".html") || !path.is_file() {
            continue;
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read page {}", path.display()))?;
        let mut links = extract_links(&contents);
        links.remove(name);
        pages.insert(name.to_string(), links);
    }

    debug!(pages = pages.len(), "corpus crawled");

    LinkGraph::from_links_lenient(pages)
        .with_context(|| format!("No .html pages found in {}", dir.display()))
}

/// Every distinct `href` target of an `<a>` tag in `html`.
#[must_use]
pub fn extract_links(html: &str) -> BTreeSet<String> {
    ANCHOR_HREF
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
