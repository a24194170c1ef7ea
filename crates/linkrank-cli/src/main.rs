#![forbid(unsafe_code)]

mod output;

use anyhow::{Context, bail};
use clap::Parser;
use linkrank_core::config::{CONFIG_FILE_NAME, ProjectConfig, RankConfig, load_config};
use linkrank_core::estimate::iterate_pagerank_with;
use linkrank_core::{RngSource, corpus, sample_pagerank};
use output::{ErrorReport, OutputMode, RankReport};
use std::env;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "linkrank: PageRank over a directory of HTML pages",
    long_about = None
)]
struct Cli {
    /// Directory of `.html` pages to rank.
    corpus: PathBuf,

    /// Probability of following a link rather than jumping to a random page.
    #[arg(long)]
    damping: Option<f64>,

    /// Number of random-surfer samples.
    #[arg(long)]
    samples: Option<usize>,

    /// Seed for the sampling estimator (entropy when absent).
    #[arg(long)]
    seed: Option<u64>,

    /// Safety cap on power-iteration sweeps.
    #[arg(long)]
    max_iter: Option<usize>,

    /// Config file (defaults to `./linkrank.toml` when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, hide = true)]
    json: bool,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Flags override the config file, which overrides built-in defaults.
    fn settings(&self, config: ProjectConfig) -> RankConfig {
        let mut rank = config.rank;
        if let Some(damping) = self.damping {
            rank.damping = damping;
        }
        if let Some(samples) = self.samples {
            rank.samples = samples;
        }
        if let Some(seed) = self.seed {
            rank.seed = Some(seed);
        }
        if let Some(max_iter) = self.max_iter {
            rank.max_iter = max_iter;
        }
        rank
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mode = output::resolve_output_mode(cli.format, cli.json);
    if let Err(err) = run(&cli, mode) {
        output::render_error(mode, &ErrorReport::from(&err))?;
        std::process::exit(1);
    }
    Ok(())
}

fn run(cli: &Cli, mode: OutputMode) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => {
            if !path.exists() {
                bail!("Config file {} does not exist", path.display());
            }
            load_config(path)?
        }
        None => load_config(Path::new(CONFIG_FILE_NAME))?,
    };
    let settings = cli.settings(config);
    settings.validate()?;

    let graph = corpus::crawl(&cli.corpus)?;
    info!(
        corpus = %cli.corpus.display(),
        pages = graph.len(),
        links = graph.edge_count(),
        "corpus loaded"
    );

    let mut rng = settings
        .seed
        .map_or_else(RngSource::from_entropy, RngSource::seeded);
    let sampling = sample_pagerank(&graph, settings.damping, settings.samples, &mut rng)?;
    let iterated = iterate_pagerank_with(&graph, &settings.iteration())
        .context("Power iteration failed")?;

    let report = RankReport {
        corpus: cli.corpus.display().to_string(),
        pages: graph.len(),
        links: graph.edge_count(),
        damping: settings.damping,
        samples: settings.samples,
        max_divergence: sampling.max_abs_diff(&iterated.ranks),
        sampling,
        iteration: iterated.ranks,
        iterations: iterated.iterations,
    };
    output::render(mode, &report)
}

/// Initialize tracing subscriber with env-based filtering.
///
/// Uses `LINKRANK_LOG` env var for filter directives (e.g. `LINKRANK_LOG=debug`).
/// Falls back to `linkrank=info,warn`, or debug when `-v` or `DEBUG` is set.
/// `LINKRANK_LOG_FORMAT=json` switches to JSON lines. Logs go to stderr.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("LINKRANK_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "linkrank=debug,info"
        } else {
            "linkrank=info,warn"
        })
    });

    let format = env::var("LINKRANK_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}
