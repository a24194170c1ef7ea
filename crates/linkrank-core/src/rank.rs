//! Rank tables: the per-page output of both estimators.

use std::collections::BTreeMap;

use serde::Serialize;

/// PageRank estimates keyed by page, in ascending page order.
///
/// Serialises as a flat JSON object (`{"1.html": 0.22, ...}`).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct RankTable {
    ranks: BTreeMap<String, f64>,
}

impl RankTable {
    /// Build a table from `(page, rank)` pairs.
    #[must_use]
    pub fn new(ranks: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self {
            ranks: ranks.into_iter().collect(),
        }
    }

    /// Rank of `page`, if present.
    #[must_use]
    pub fn get(&self, page: &str) -> Option<f64> {
        self.ranks.get(page).copied()
    }

    /// `(page, rank)` pairs in ascending page order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.ranks.iter().map(|(p, &r)| (p.as_str(), r))
    }

    /// Number of pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Whether the table has no pages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Sum of all ranks.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.ranks.values().sum()
    }

    /// The `k` highest-ranked pages, best first. Ties break by page name.
    #[must_use]
    pub fn top_n(&self, k: usize) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(k);
        ranked
    }

    /// Largest per-page absolute difference between two tables.
    ///
    /// A page present in only one table is compared against `0.0`.
    #[must_use]
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        self.ranks
            .keys()
            .chain(other.ranks.keys())
            .map(|page| {
                let a = self.get(page).unwrap_or(0.0);
                let b = other.get(page).unwrap_or(0.0);
                (a - b).abs()
            })
            .fold(0.0_f64, f64::max)
    }
}
