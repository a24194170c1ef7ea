//! Monte Carlo PageRank: count where a random surfer spends its time.
//!
//! The first page is drawn uniformly from the corpus. Every later page is
//! drawn from the transition model of the page before it, so the sequence
//! of samples is one realisation of the surfer's Markov chain. A page's
//! estimate is the fraction of samples that landed on it.

#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use petgraph::graph::NodeIndex;
use tracing::{debug, instrument};

use crate::error::{RankError, check_damping};
use crate::graph::LinkGraph;
use crate::random::RandomSource;
use crate::rank::RankTable;
use crate::transition::transition_weights;

/// Estimate PageRank by drawing `n` samples from the surfer's Markov chain.
///
/// Consumes exactly `n` draws from `rng`: one for the uniform start and one
/// per transition.
///
/// # Errors
///
/// - [`RankError::InvalidDamping`] if `damping_factor` is outside `[0, 1]`.
/// - [`RankError::InvalidSampleCount`] if `n` is zero.
#[instrument(skip(graph, rng), fields(pages = graph.len()))]
pub fn sample_pagerank<R: RandomSource + ?Sized>(
    graph: &LinkGraph,
    damping_factor: f64,
    n: usize,
    rng: &mut R,
) -> Result<RankTable, RankError> {
    check_damping(damping_factor)?;
    if n == 0 {
        return Err(RankError::InvalidSampleCount(n));
    }

    let num_pages = graph.len();
    let mut counts = vec![0_usize; num_pages];

    // Transition rows depend only on the page, so each is built at most once.
    let mut rows: Vec<Option<Vec<f64>>> = vec![None; num_pages];

    let mut current = uniform_index(rng.next_unit(), num_pages);
    counts[current] += 1;

    for _ in 1..n {
        let row = rows[current].get_or_insert_with(|| {
            transition_weights(graph, NodeIndex::new(current), damping_factor)
        });
        current = weighted_index(row, rng.next_unit());
        counts[current] += 1;
    }

    let n_f64 = n as f64;
    let ranks = RankTable::new(
        graph
            .pages()
            .zip(counts)
            .map(|(page, count)| (page.to_string(), count as f64 / n_f64)),
    );

    debug!(samples = n, distinct_rows = rows.iter().flatten().count(), "sampling complete");

    Ok(ranks)
}

/// Map a unit draw onto `0..len` uniformly.
fn uniform_index(u: f64, len: usize) -> usize {
    ((u * len as f64) as usize).min(len - 1)
}

/// Inverse-CDF selection: the first index whose cumulative weight exceeds `u`.
///
/// Rounding can leave the cumulative total a hair under 1.0; a draw landing
/// in that gap goes to the last index with non-zero weight.
fn weighted_index(weights: &[f64], u: f64) -> usize {
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if u < cumulative {
            return i;
        }
    }
    weights
        .iter()
        .rposition(|&w| w > 0.0)
        .unwrap_or(weights.len() - 1)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
