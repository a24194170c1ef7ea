//! PageRank by power iteration.
//!
//! # Algorithm
//!
//! Every page starts at `1/N`. Each sweep recomputes every page from the
//! previous sweep's ranks:
//!
//! ```text
//! PR(p) = (1 - d) / N + d * Σ PR(i) / NumLinks(i)   for each i → p
//! ```
//!
//! where a dangling page `i` counts as linking to all `N` pages, so it
//! contributes `PR(i) / N` to every page.
//!
//! New ranks are written into a separate buffer and swapped in only after
//! the sweep is complete; no page ever sees a partially updated neighbour.
//!
//! # Convergence
//!
//! Iteration stops once the largest per-page change in a sweep is at most
//! [`CONVERGENCE_THRESHOLD`]. A safety cap ([`IterationConfig::max_iter`])
//! turns a runaway loop into [`RankError::DidNotConverge`] rather than a
//! partially converged table.
//!
//! Ranks are not renormalised between sweeps.

#![allow(clippy::cast_precision_loss)]

use petgraph::graph::NodeIndex;
use tracing::{debug, instrument, trace, warn};

use super::{DEFAULT_DAMPING, DEFAULT_MAX_ITER};
use crate::error::{RankError, check_damping};
use crate::graph::LinkGraph;
use crate::rank::RankTable;

/// Largest per-page change (inclusive) at which the ranks count as settled.
pub const CONVERGENCE_THRESHOLD: f64 = 0.001;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for power iteration.
#[derive(Debug, Clone)]
pub struct IterationConfig {
    /// Damping factor (probability of following a link vs teleporting).
    /// Default: 0.85.
    pub damping: f64,
    /// Safety cap on the number of sweeps.
    /// Default: 10000.
    pub max_iter: usize,
}

impl Default for IterationConfig {
    fn default() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
            max_iter: DEFAULT_MAX_ITER,
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Result of a converged power iteration.
#[derive(Debug, Clone)]
pub struct IterationReport {
    /// Final ranks, keyed by page.
    pub ranks: RankTable,
    /// Number of sweeps performed.
    pub iterations: usize,
    /// Largest per-page change in the final sweep (≤ the threshold).
    pub delta: f64,
}

// ---------------------------------------------------------------------------
// Power iteration
// ---------------------------------------------------------------------------

/// Estimate PageRank by iterating the PageRank equation to convergence.
///
/// # Errors
///
/// - [`RankError::InvalidDamping`] if `damping_factor` is outside `[0, 1]`.
/// - [`RankError::DidNotConverge`] if the default safety cap is reached.
pub fn iterate_pagerank(graph: &LinkGraph, damping_factor: f64) -> Result<RankTable, RankError> {
    let config = IterationConfig {
        damping: damping_factor,
        ..IterationConfig::default()
    };
    iterate_pagerank_with(graph, &config).map(|report| report.ranks)
}

/// Power iteration with an explicit configuration, returning sweep metadata.
///
/// # Errors
///
/// - [`RankError::InvalidDamping`] if `config.damping` is outside `[0, 1]`.
/// - [`RankError::DidNotConverge`] if `config.max_iter` sweeps pass without
///   the ranks settling.
#[instrument(skip(graph, config), fields(pages = graph.len(), damping = config.damping))]
pub fn iterate_pagerank_with(
    graph: &LinkGraph,
    config: &IterationConfig,
) -> Result<IterationReport, RankError> {
    check_damping(config.damping)?;

    let n = graph.len();
    let n_f64 = n as f64;
    let damping = config.damping;
    let base = (1.0 - damping) / n_f64;

    // Link structure is fixed for the whole run.
    let outgoing: Vec<Vec<usize>> = (0..n)
        .map(|i| {
            graph
                .outgoing(NodeIndex::new(i))
                .into_iter()
                .map(NodeIndex::index)
                .collect()
        })
        .collect();

    let mut ranks = vec![1.0 / n_f64; n];
    let mut new_ranks = vec![0.0_f64; n];

    let mut iterations = 0;
    let mut delta = f64::INFINITY;

    while iterations < config.max_iter {
        iterations += 1;

        for r in &mut new_ranks {
            *r = base;
        }

        // Distribute each page's previous rank over its links.
        let mut dangling_mass = 0.0;
        for (idx, links) in outgoing.iter().enumerate() {
            if links.is_empty() {
                dangling_mass += ranks[idx];
            } else {
                let share = damping * ranks[idx] / links.len() as f64;
                for &target in links {
                    new_ranks[target] += share;
                }
            }
        }

        // Dangling pages link to everyone, themselves included.
        if dangling_mass > 0.0 {
            let share = damping * dangling_mass / n_f64;
            for r in &mut new_ranks {
                *r += share;
            }
        }

        delta = ranks
            .iter()
            .zip(new_ranks.iter())
            .map(|(old, new)| (old - new).abs())
            .fold(0.0_f64, f64::max);

        std::mem::swap(&mut ranks, &mut new_ranks);
        trace!(iteration = iterations, delta, "sweep complete");

        if has_converged(delta) {
            debug!(iterations, delta, "pagerank converged");
            return Ok(IterationReport {
                ranks: to_table(graph, &ranks),
                iterations,
                delta,
            });
        }
    }

    warn!(
        iterations,
        delta, "pagerank hit the sweep cap before converging"
    );
    Err(RankError::DidNotConverge { iterations, delta })
}

/// A sweep whose largest change is at most the threshold ends the run.
const fn has_converged(delta: f64) -> bool {
    delta <= CONVERGENCE_THRESHOLD
}

/// Map index-ordered ranks back to page identifiers.
fn to_table(graph: &LinkGraph, ranks: &[f64]) -> RankTable {
    RankTable::new(
        graph
            .pages()
            .zip(ranks.iter().copied())
            .map(|(page, rank)| (page.to_string(), rank)),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
