//! PageRank estimators.
//!
//! # Overview
//!
//! Two independent ways of estimating the same quantity, the long-run
//! probability that a random surfer is on each page:
//!
//! - **Sampling** (`sampling`): walk the Markov chain defined by
//!   [`crate::transition`] for `n` steps and count visits.
//! - **Iteration** (`iteration`): apply the PageRank equation to every page
//!   until no rank moves by more than [`CONVERGENCE_THRESHOLD`].
//!
//! Neither estimator depends on the other and neither mutates the graph, so
//! callers are free to run them side by side and compare the results.
//!
//! # Usage
//!
//! ```rust,ignore
//! use linkrank_core::estimate::{iterate_pagerank, sample_pagerank};
//! use linkrank_core::random::RngSource;
//!
//! let sampled = sample_pagerank(&graph, 0.85, 10_000, &mut RngSource::from_entropy())?;
//! let iterated = iterate_pagerank(&graph, 0.85)?;
//! assert!(sampled.max_abs_diff(&iterated) < 0.05);
//! ```

pub mod iteration;
pub mod sampling;

pub use iteration::{
    CONVERGENCE_THRESHOLD, IterationConfig, IterationReport, iterate_pagerank,
    iterate_pagerank_with,
};
pub use sampling::sample_pagerank;

/// Conventional damping factor.
pub const DEFAULT_DAMPING: f64 = 0.85;

/// Conventional number of samples for the sampling estimator.
pub const DEFAULT_SAMPLES: usize = 10_000;

/// Default safety cap on power-iteration sweeps.
pub const DEFAULT_MAX_ITER: usize = 10_000;
