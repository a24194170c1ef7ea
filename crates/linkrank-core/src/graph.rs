//! Link graph: the corpus as a directed graph of pages.
//!
//! # Overview
//!
//! A [`LinkGraph`] maps every page of a corpus to the set of pages it links
//! to. It is built once, validated on construction, and read-only from then
//! on, so both estimators can share it by reference.
//!
//! ## Edge Direction
//!
//! An edge `A → B` means "page A contains a link to page B".
//!
//! ## Ordering
//!
//! Pages are inserted into the underlying [`petgraph`] graph in ascending
//! identifier order, so node index `i` is the `i`-th page by name. Every
//! traversal (and therefore every floating-point summation) happens in the
//! same order on every run.
//!
//! ## Dangling Pages
//!
//! A page with no outgoing links is *dangling*. The graph stores it as-is;
//! the estimators treat it as linking to every page, itself included.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeMap, BTreeSet, HashMap};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, instrument};

use crate::error::RankError;

// ---------------------------------------------------------------------------
// LinkGraph
// ---------------------------------------------------------------------------

/// A directed hyperlink graph over a closed corpus of pages.
#[derive(Debug, Clone)]
pub struct LinkGraph {
    /// Directed graph: nodes = page identifiers, edges = links.
    graph: DiGraph<String, ()>,
    /// Mapping from page identifier to petgraph `NodeIndex`.
    node_map: HashMap<String, NodeIndex>,
}

impl LinkGraph {
    /// Build a graph from `(page, outgoing links)` pairs.
    ///
    /// Pages listed more than once have their link sets merged; repeated
    /// links collapse into one edge.
    ///
    /// # Errors
    ///
    /// - [`RankError::EmptyCorpus`] if `links` yields no pages.
    /// - [`RankError::UnknownLinkTarget`] if any link points outside the
    ///   corpus.
    #[instrument(skip(links))]
    pub fn from_links<I, P, L, T>(links: I) -> Result<Self, RankError>
    where
        I: IntoIterator<Item = (P, L)>,
        P: Into<String>,
        L: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::build(collect_links(links), true)
    }

    /// Like [`LinkGraph::from_links`], but links to pages outside the corpus
    /// are dropped instead of rejected.
    ///
    /// # Errors
    ///
    /// Returns [`RankError::EmptyCorpus`] if `links` yields no pages.
    #[instrument(skip(links))]
    pub fn from_links_lenient<I, P, L, T>(links: I) -> Result<Self, RankError>
    where
        I: IntoIterator<Item = (P, L)>,
        P: Into<String>,
        L: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::build(collect_links(links), false)
    }

    fn build(pages: BTreeMap<String, BTreeSet<String>>, strict: bool) -> Result<Self, RankError> {
        if pages.is_empty() {
            return Err(RankError::EmptyCorpus);
        }

        let mut graph = DiGraph::<String, ()>::with_capacity(pages.len(), 0);
        let mut node_map: HashMap<String, NodeIndex> = HashMap::with_capacity(pages.len());

        // Step 1: every key is a node, in ascending order.
        for page in pages.keys() {
            let idx = graph.add_node(page.clone());
            node_map.insert(page.clone(), idx);
        }

        // Step 2: edges, validated against the node set.
        let mut dropped = 0_usize;
        for (page, targets) in &pages {
            let from = node_map[page];
            for target in targets {
                match node_map.get(target) {
                    Some(&to) => {
                        graph.add_edge(from, to, ());
                    }
                    None if strict => {
                        return Err(RankError::UnknownLinkTarget {
                            page: page.clone(),
                            target: target.clone(),
                        });
                    }
                    None => dropped += 1,
                }
            }
        }

        debug!(
            pages = graph.node_count(),
            links = graph.edge_count(),
            dropped,
            "link graph built"
        );

        Ok(Self { graph, node_map })
    }

    /// Number of pages in the corpus (`N`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Always `false` for a constructed graph; kept for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Number of links across the whole corpus.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Page identifiers in ascending order (the same order as node indices).
    pub fn pages(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph.node_weights().map(String::as_str)
    }

    /// Whether `page` is part of the corpus.
    #[must_use]
    pub fn contains(&self, page: &str) -> bool {
        self.node_map.contains_key(page)
    }

    /// Outgoing links of `page`, ascending. `None` if the page is unknown.
    #[must_use]
    pub fn links(&self, page: &str) -> Option<Vec<&str>> {
        let idx = self.node_index(page)?;
        Some(
            self.outgoing(idx)
                .into_iter()
                .filter_map(|n| self.page(n))
                .collect(),
        )
    }

    /// Number of outgoing links of `page`. `None` if the page is unknown.
    #[must_use]
    pub fn out_degree(&self, page: &str) -> Option<usize> {
        let idx = self.node_index(page)?;
        Some(self.out_degree_of(idx))
    }

    /// Whether `page` has no outgoing links. `None` if the page is unknown.
    #[must_use]
    pub fn is_dangling(&self, page: &str) -> Option<bool> {
        self.out_degree(page).map(|d| d == 0)
    }

    /// All dangling pages, ascending.
    #[must_use]
    pub fn dangling_pages(&self) -> Vec<&str> {
        self.graph
            .node_indices()
            .filter(|&idx| self.out_degree_of(idx) == 0)
            .filter_map(|idx| self.page(idx))
            .collect()
    }

    /// Look up the `NodeIndex` for a page.
    #[must_use]
    pub fn node_index(&self, page: &str) -> Option<NodeIndex> {
        self.node_map.get(page).copied()
    }

    /// Return the page identifier for a node.
    #[must_use]
    pub fn page(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(String::as_str)
    }

    /// Outgoing neighbours of `idx`, ascending by index.
    pub(crate) fn outgoing(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .collect();
        out.sort_unstable();
        out
    }

    pub(crate) fn out_degree_of(&self, idx: NodeIndex) -> usize {
        self.graph.neighbors_directed(idx, Direction::Outgoing).count()
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn collect_links<I, P, L, T>(links: I) -> BTreeMap<String, BTreeSet<String>>
where
    I: IntoIterator<Item = (P, L)>,
    P: Into<String>,
    L: IntoIterator<Item = T>,
    T: Into<String>,
{
    let mut pages: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for (page, targets) in links {
        pages
            .entry(page.into())
            .or_default()
            .extend(targets.into_iter().map(Into::into));
    }
    pages
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus0() -> LinkGraph {
        LinkGraph::from_links([
            ("1.html", vec!["2.html"]),
            ("2.html", vec!["1.html", "3.html"]),
            ("3.html", vec!["2.html", "4.html"]),
            ("4.html", vec!["2.html"]),
        ])
        .expect("corpus0 is valid")
    }

    #[test]
    fn empty_corpus_is_rejected() {
        let links: Vec<(&str, Vec<&str>)> = Vec::new();
        assert_eq!(
            LinkGraph::from_links(links.clone()).unwrap_err(),
            RankError::EmptyCorpus
        );
        assert_eq!(
            LinkGraph::from_links_lenient(links).unwrap_err(),
            RankError::EmptyCorpus
        );
    }

    #[test]
    fn unknown_target_is_rejected_in_strict_mode() {
        let err = LinkGraph::from_links([("a", vec!["b"]), ("b", vec!["zzz"])]).unwrap_err();
        assert_eq!(
            err,
            RankError::UnknownLinkTarget {
                page: "b".to_string(),
                target: "zzz".to_string(),
            }
        );
    }

    #[test]
    fn unknown_target_is_dropped_in_lenient_mode() {
        let g = LinkGraph::from_links_lenient([("a", vec!["b", "zzz"]), ("b", vec!["zzz"])])
            .expect("lenient build");
        assert_eq!(g.len(), 2);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.links("a"), Some(vec!["b"]));
        assert_eq!(g.is_dangling("b"), Some(true));
    }

    #[test]
    fn pages_are_sorted() {
        let g = LinkGraph::from_links([("c", vec![]), ("a", vec!["c"]), ("b", vec!["a"])])
            .expect("valid");
        let pages: Vec<&str> = g.pages().collect();
        assert_eq!(pages, vec!["a", "b", "c"]);
        for (i, page) in pages.iter().enumerate() {
            assert_eq!(g.node_index(page), Some(NodeIndex::new(i)));
        }
    }

    #[test]
    fn duplicate_links_collapse() {
        let g = LinkGraph::from_links([("a", vec!["b", "b"]), ("b", vec![]), ("a", vec!["b"])])
            .expect("valid");
        assert_eq!(g.len(), 2);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.out_degree("a"), Some(1));
    }

    #[test]
    fn links_are_ascending() {
        let g = corpus0();
        assert_eq!(g.links("3.html"), Some(vec!["2.html", "4.html"]));
        assert_eq!(g.links("2.html"), Some(vec!["1.html", "3.html"]));
        assert_eq!(g.links("nope.html"), None);
    }

    #[test]
    fn dangling_pages_are_reported() {
        let g = LinkGraph::from_links([("a", vec!["b"]), ("b", vec![]), ("c", vec![])])
            .expect("valid");
        assert_eq!(g.dangling_pages(), vec!["b", "c"]);
        assert_eq!(g.is_dangling("a"), Some(false));
        assert_eq!(g.is_dangling("missing"), None);
    }

    #[test]
    fn self_links_are_kept() {
        let g = LinkGraph::from_links([("a", vec!["a", "b"]), ("b", vec!["a"])]).expect("valid");
        assert_eq!(g.out_degree("a"), Some(2));
        assert_eq!(g.links("a"), Some(vec!["a", "b"]));
    }

    #[test]
    fn counts_match_corpus0() {
        let g = corpus0();
        assert_eq!(g.len(), 4);
        assert!(!g.is_empty());
        assert_eq!(g.edge_count(), 6);
        assert!(g.contains("4.html"));
        assert!(!g.contains("5.html"));
        assert!(g.dangling_pages().is_empty());
    }
}
