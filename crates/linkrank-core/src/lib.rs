#![forbid(unsafe_code)]
//! linkrank-core library.
//!
//! Estimates PageRank over a hyperlink corpus two ways: by sampling the
//! random surfer's Markov chain and by iterating the PageRank equation to a
//! fixed point.
//!
//! # Conventions
//!
//! - **Errors**: [`RankError`] for graph and estimator failures;
//!   `anyhow::Result` for I/O-facing code (`corpus`, `config`).
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod corpus;
pub mod error;
pub mod estimate;
pub mod graph;
pub mod random;
pub mod rank;
pub mod transition;

pub use error::{ErrorCode, RankError};
pub use estimate::{iterate_pagerank, sample_pagerank};
pub use graph::LinkGraph;
pub use random::{FixedSequence, RandomSource, RngSource};
pub use rank::RankTable;
pub use transition::{Distribution, transition_model};
