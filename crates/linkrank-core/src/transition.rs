//! Transition model: where the random surfer goes next.
//!
//! With probability `d` the surfer follows one of the current page's links,
//! chosen uniformly; with probability `1 - d` it jumps to any page of the
//! corpus, chosen uniformly:
//!
//! ```text
//! P(p) = (1 - d) / N + d / |L|   if p ∈ L
//! P(p) = (1 - d) / N             otherwise
//! ```
//!
//! A dangling page (`L = ∅`) is treated as linking to every page, which
//! makes its distribution uniform: `P(p) = 1 / N`.

#![allow(clippy::cast_precision_loss)]

use std::collections::BTreeMap;

use petgraph::graph::NodeIndex;

use crate::error::{RankError, check_damping};
use crate::graph::LinkGraph;

/// A probability distribution over every page of a corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    probabilities: BTreeMap<String, f64>,
}

impl Distribution {
    /// Probability of moving to `page` (`None` if the page is unknown).
    #[must_use]
    pub fn get(&self, page: &str) -> Option<f64> {
        self.probabilities.get(page).copied()
    }

    /// `(page, probability)` pairs in ascending page order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.probabilities.iter().map(|(p, &v)| (p.as_str(), v))
    }

    /// Number of pages covered (always the corpus size).
    #[must_use]
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// Always `false`: a distribution covers a non-empty corpus.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Sum of all probabilities (1.0 up to rounding).
    #[must_use]
    pub fn total(&self) -> f64 {
        self.probabilities.values().sum()
    }
}

/// Next-page distribution for a surfer currently on `page`.
///
/// # Errors
///
/// - [`RankError::InvalidDamping`] if `damping_factor` is outside `[0, 1]`.
/// - [`RankError::UnknownPage`] if `page` is not in `graph`.
pub fn transition_model(
    graph: &LinkGraph,
    page: &str,
    damping_factor: f64,
) -> Result<Distribution, RankError> {
    check_damping(damping_factor)?;
    let idx = graph
        .node_index(page)
        .ok_or_else(|| RankError::UnknownPage(page.to_string()))?;

    let weights = transition_weights(graph, idx, damping_factor);
    let probabilities = graph
        .pages()
        .map(str::to_string)
        .zip(weights)
        .collect();

    Ok(Distribution { probabilities })
}

/// Index-based form of [`transition_model`]: entry `i` is the probability
/// of moving to the page with node index `i`.
///
/// Callers must have validated `damping` and `idx`.
pub(crate) fn transition_weights(graph: &LinkGraph, idx: NodeIndex, damping: f64) -> Vec<f64> {
    let n = graph.len();
    let n_f64 = n as f64;
    let links = graph.outgoing(idx);

    if links.is_empty() {
        return vec![1.0 / n_f64; n];
    }

    let mut weights = vec![(1.0 - damping) / n_f64; n];
    let share = damping / links.len() as f64;
    for target in links {
        weights[target.index()] += share;
    }
    weights
}
