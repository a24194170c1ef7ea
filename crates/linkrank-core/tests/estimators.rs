//! Sampling vs iteration on fixed and seeded random corpora.
//!
//! # Test Strategy
//!
//! 1. Build small hand-written corpora with known structure (symmetric pair,
//!    star, corpus0-style four-page web, dangling pages).
//! 2. Generate seeded random link graphs (may contain cycles and dangling
//!    pages).
//! 3. Run both estimators and check their invariants individually.
//! 4. Check that the two estimators agree per page within `AGREEMENT`.
//!
//! # Epsilon
//!
//! Sampling error for `n = 10_000` draws is on the order of 0.01 per page on
//! these corpora; `AGREEMENT = 0.05` leaves a wide margin. All sampling runs
//! use seeded `StdRng`, so the tests are deterministic.

use rand::SeedableRng;
use rand::rngs::StdRng;

use linkrank_core::estimate::{
    CONVERGENCE_THRESHOLD, IterationConfig, iterate_pagerank, iterate_pagerank_with,
    sample_pagerank,
};
use linkrank_core::{LinkGraph, RankError, RankTable, RngSource, transition_model};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum per-page gap allowed between sampling and iteration.
const AGREEMENT: f64 = 0.05;
const DAMPING: f64 = 0.85;
const SAMPLES: usize = 10_000;

// ---------------------------------------------------------------------------
// Corpus helpers
// ---------------------------------------------------------------------------

fn corpus0() -> LinkGraph {
    LinkGraph::from_links([
        ("1.html", vec!["2.html"]),
        ("2.html", vec!["1.html", "3.html"]),
        ("3.html", vec!["2.html", "4.html"]),
        ("4.html", vec!["2.html"]),
    ])
    .expect("corpus0 is valid")
}

/// Hub links to every spoke; every spoke links back to the hub only.
fn star(spokes: usize) -> LinkGraph {
    let spoke_ids: Vec<String> = (1..=spokes).map(|i| format!("s{i}")).collect();
    let mut links = vec![("hub".to_string(), spoke_ids.clone())];
    for id in &spoke_ids {
        links.push((id.clone(), vec!["hub".to_string()]));
    }
    LinkGraph::from_links(links).expect("star is valid")
}

/// Parameters for a random link graph.
struct RandomGraphParams {
    /// Number of pages.
    pages: usize,
    /// Number of links to attempt (self-links are skipped).
    links: usize,
}

/// Build a random link graph seeded from `seed` for determinism.
fn random_graph(seed: u64, params: &RandomGraphParams) -> LinkGraph {
    use rand::Rng;

    let mut rng = StdRng::seed_from_u64(seed);
    let n = params.pages;
    let ids: Vec<String> = (0..n).map(|i| format!("p{i:02}")).collect();
    let mut out: Vec<Vec<String>> = vec![Vec::new(); n];

    for _ in 0..params.links {
        let a = rng.gen_range(0..n);
        let b = rng.gen_range(0..n);
        if a == b {
            continue;
        }
        out[a].push(ids[b].clone());
    }

    LinkGraph::from_links(ids.into_iter().zip(out)).expect("random graph is valid")
}

fn sample(graph: &LinkGraph, seed: u64) -> RankTable {
    let mut rng = RngSource::new(StdRng::seed_from_u64(seed));
    sample_pagerank(graph, DAMPING, SAMPLES, &mut rng).expect("valid sampling input")
}

// ---------------------------------------------------------------------------
// Fixed corpora
// ---------------------------------------------------------------------------

#[test]
fn symmetric_pair_converges_to_half() {
    let g = LinkGraph::from_links([("a", vec!["b"]), ("b", vec!["a"])]).expect("valid");
    let ranks = iterate_pagerank(&g, DAMPING).expect("converges");
    assert!((ranks.get("a").expect("a") - 0.5).abs() < 1e-9);
    assert!((ranks.get("b").expect("b") - 0.5).abs() < 1e-9);
}

#[test]
fn star_hub_outranks_every_spoke() {
    for spokes in [2, 3, 5, 9] {
        let g = star(spokes);
        let ranks = iterate_pagerank(&g, DAMPING).expect("converges");
        let hub = ranks.get("hub").expect("hub");
        for (page, rank) in ranks.iter().filter(|(p, _)| *p != "hub") {
            assert!(hub > rank, "{spokes} spokes: hub {hub} <= {page} {rank}");
        }
    }
}

#[test]
fn corpus0_iteration_matches_known_values() {
    let ranks = iterate_pagerank(&corpus0(), DAMPING).expect("converges");
    // Reference values for this corpus, reported to four decimals.
    let expected = [
        ("1.html", 0.2202),
        ("2.html", 0.4289),
        ("3.html", 0.2202),
        ("4.html", 0.1307),
    ];
    for (page, want) in expected {
        let got = ranks.get(page).expect("page present");
        assert!((got - want).abs() < 0.005, "{page}: got {got}, want ~{want}");
    }
}

#[test]
fn corpus0_methods_agree_across_runs() {
    let g = corpus0();
    let iterated = iterate_pagerank(&g, DAMPING).expect("converges");
    for seed in 0..5 {
        let sampled = sample(&g, seed);
        let gap = sampled.max_abs_diff(&iterated);
        assert!(gap < AGREEMENT, "seed {seed}: methods differ by {gap}");
    }
}

#[test]
fn dangling_corpus_methods_agree() {
    // "c" and "d" are dangling.
    let g = LinkGraph::from_links([
        ("a", vec!["b", "c"]),
        ("b", vec!["c"]),
        ("c", vec![]),
        ("d", vec![]),
    ])
    .expect("valid");
    let iterated = iterate_pagerank(&g, DAMPING).expect("converges");
    let sampled = sample(&g, 99);
    assert!(sampled.max_abs_diff(&iterated) < AGREEMENT);
    assert!((iterated.total() - 1.0).abs() < 1e-3);
}

// ---------------------------------------------------------------------------
// Random corpora
// ---------------------------------------------------------------------------

#[test]
fn random_graphs_methods_agree() {
    let params = RandomGraphParams {
        pages: 8,
        links: 14,
    };
    for seed in 0..10 {
        let g = random_graph(seed, &params);
        let iterated = iterate_pagerank(&g, DAMPING).expect("converges");
        let sampled = sample(&g, seed + 1_000);
        let gap = sampled.max_abs_diff(&iterated);
        assert!(gap < AGREEMENT, "seed {seed}: methods differ by {gap}");
    }
}

#[test]
fn random_graphs_iteration_invariants() {
    let params = RandomGraphParams {
        pages: 20,
        links: 50,
    };
    for seed in 0..30 {
        let g = random_graph(seed, &params);
        let report = iterate_pagerank_with(&g, &IterationConfig::default()).expect("converges");
        assert!(report.delta <= CONVERGENCE_THRESHOLD, "seed {seed}");
        assert_eq!(report.ranks.len(), g.len());
        assert!(
            (report.ranks.total() - 1.0).abs() < 1e-3,
            "seed {seed}: ranks sum to {}",
            report.ranks.total()
        );
        assert!(report.ranks.iter().all(|(_, r)| (0.0..=1.0).contains(&r)));
    }
}

#[test]
fn random_graphs_sampling_invariants() {
    let params = RandomGraphParams {
        pages: 12,
        links: 30,
    };
    for seed in 0..10 {
        let g = random_graph(seed, &params);
        let ranks = sample(&g, seed);
        assert_eq!(ranks.len(), g.len());
        assert!((ranks.total() - 1.0).abs() < 1e-9, "seed {seed}");
        assert!(ranks.iter().all(|(_, r)| r >= 0.0));
    }
}

#[test]
fn random_graphs_transition_rows_are_distributions() {
    let params = RandomGraphParams {
        pages: 10,
        links: 25,
    };
    for seed in 0..10 {
        let g = random_graph(seed, &params);
        for page in g.pages() {
            let dist = transition_model(&g, page, DAMPING).expect("known page");
            assert_eq!(dist.len(), g.len());
            assert!((dist.total() - 1.0).abs() < 1e-9, "seed {seed} page {page}");
        }
    }
}

// ---------------------------------------------------------------------------
// Determinism and errors
// ---------------------------------------------------------------------------

#[test]
fn iteration_is_idempotent() {
    let g = random_graph(
        7,
        &RandomGraphParams {
            pages: 15,
            links: 40,
        },
    );
    let a = iterate_pagerank(&g, DAMPING).expect("converges");
    let b = iterate_pagerank(&g, DAMPING).expect("converges");
    let bits = |t: &RankTable| {
        t.iter()
            .map(|(p, r)| (p.to_string(), r.to_bits()))
            .collect::<Vec<_>>()
    };
    assert_eq!(bits(&a), bits(&b));
}

#[test]
fn same_seed_same_samples() {
    let g = corpus0();
    assert_eq!(sample(&g, 5), sample(&g, 5));
}

#[test]
fn single_sample_is_a_point_mass() {
    let g = corpus0();
    for seed in 0..8 {
        let ranks = sample_pagerank(&g, DAMPING, 1, &mut RngSource::seeded(seed)).expect("valid");
        let ones = ranks.iter().filter(|(_, r)| *r == 1.0).count();
        let zeros = ranks.iter().filter(|(_, r)| *r == 0.0).count();
        assert_eq!((ones, zeros), (1, 3), "seed {seed}");
    }
}

#[test]
fn estimators_reject_bad_configuration() {
    let g = corpus0();
    let mut rng = RngSource::seeded(1);
    assert_eq!(
        sample_pagerank(&g, DAMPING, 0, &mut rng).unwrap_err(),
        RankError::InvalidSampleCount(0)
    );
    assert_eq!(
        sample_pagerank(&g, 2.0, 10, &mut rng).unwrap_err(),
        RankError::InvalidDamping(2.0)
    );
    assert_eq!(
        iterate_pagerank(&g, -1.0).unwrap_err(),
        RankError::InvalidDamping(-1.0)
    );
}

#[test]
fn unknown_link_target_fails_before_estimation() {
    let err = LinkGraph::from_links([("a", vec!["b"])]).unwrap_err();
    assert!(matches!(err, RankError::UnknownLinkTarget { .. }));
}
