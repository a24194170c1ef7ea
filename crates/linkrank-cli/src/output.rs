//! Output layer: pretty / text / JSON rendering of rank reports.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format` / hidden `--json` flag
//! 2. `FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 3. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.
//!
//! Text mode reproduces the classic two-section listing
//! (`PageRank Results from Sampling (n = …)` / `PageRank Results from Iteration`).

use clap::ValueEnum;
use linkrank_core::{ErrorCode, RankError, RankTable};
use serde::Serialize;
use std::fmt::Display;
use std::io::{self, IsTerminal, Write};

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Ranks plus corpus and convergence summary, with section rules.
    Pretty,
    /// Plain listing, one `page: rank` line per page.
    Text,
    /// Machine-readable JSON.
    Json,
}

fn pick_output_mode(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    format_env: Option<&str>,
    is_tty: bool,
) -> OutputMode {
    format_flag
        .or_else(|| json_flag.then_some(OutputMode::Json))
        // Unknown FORMAT values are ignored.
        .or_else(|| format_env.and_then(|val| OutputMode::from_str(val, true).ok()))
        .unwrap_or(if is_tty {
            OutputMode::Pretty
        } else {
            OutputMode::Text
        })
}

/// Resolve the output mode from CLI flags, environment, and TTY defaults.
pub fn resolve_output_mode(format_flag: Option<OutputMode>, json_flag: bool) -> OutputMode {
    let env_val = std::env::var("FORMAT").ok();
    let is_tty = io::stdout().is_terminal();
    pick_output_mode(format_flag, json_flag, env_val.as_deref(), is_tty)
}

// ────────────────────────────────────────────────────────────────────────────
// Rank report
// ────────────────────────────────────────────────────────────────────────────

const RULE: &str = "------------------------------------------------";

/// Everything one `linkrank` run produces.
#[derive(Debug, Serialize)]
pub struct RankReport {
    pub corpus: String,
    pub pages: usize,
    pub links: usize,
    pub damping: f64,
    pub samples: usize,
    pub sampling: RankTable,
    pub iteration: RankTable,
    /// Power-iteration sweeps until convergence.
    pub iterations: usize,
    /// Largest per-page gap between the two estimates.
    pub max_divergence: f64,
}

/// Render a report to `w` in the requested mode.
pub fn render_report(
    mode: OutputMode,
    report: &RankReport,
    w: &mut dyn Write,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *w, report)?;
            writeln!(w)?;
        }
        OutputMode::Text => write_text(report, w)?,
        OutputMode::Pretty => write_pretty(report, w)?,
    }
    Ok(())
}

/// Render a report to stdout.
pub fn render(mode: OutputMode, report: &RankReport) -> anyhow::Result<()> {
    render_report(mode, report, &mut io::stdout().lock())
}

fn sampling_heading(report: &RankReport) -> String {
    format!("PageRank Results from Sampling (n = {})", report.samples)
}

fn write_table(w: &mut dyn Write, table: &RankTable) -> io::Result<()> {
    for (page, rank) in table.iter() {
        writeln!(w, "  {page}: {rank:.4}")?;
    }
    Ok(())
}

fn write_text(report: &RankReport, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{}", sampling_heading(report))?;
    write_table(w, &report.sampling)?;
    writeln!(w, "PageRank Results from Iteration")?;
    write_table(w, &report.iteration)
}

fn write_pretty(report: &RankReport, w: &mut dyn Write) -> io::Result<()> {
    fn field(w: &mut dyn Write, key: &str, value: impl Display) -> io::Result<()> {
        writeln!(w, "{:<16} {value}", format!("{key}:"))
    }

    writeln!(w, "Corpus\n{RULE}")?;
    field(w, "path", &report.corpus)?;
    field(w, "pages", report.pages)?;
    field(w, "links", report.links)?;
    field(w, "damping", report.damping)?;

    for (heading, table) in [
        (sampling_heading(report), &report.sampling),
        ("PageRank Results from Iteration".to_string(), &report.iteration),
    ] {
        writeln!(w, "\n{heading}\n{RULE}")?;
        write_table(w, table)?;
    }

    writeln!(w)?;
    field(w, "sweeps", report.iterations)?;
    field(w, "max divergence", format!("{:.4}", report.max_divergence))
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// A failed run, as shown to the user.
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    /// Full context chain, outermost first.
    pub message: String,
    /// `E####` code when the failure came from the rank core.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

impl From<&anyhow::Error> for ErrorReport {
    fn from(err: &anyhow::Error) -> Self {
        let code = err
            .chain()
            .find_map(|e| e.downcast_ref::<RankError>())
            .map(RankError::code);
        Self {
            message: format!("{err:#}"),
            code: code.map(ErrorCode::code),
            hint: code.and_then(ErrorCode::hint),
        }
    }
}

/// Write an error report to `w` in the requested mode.
pub fn write_error(
    mode: OutputMode,
    error: &ErrorReport,
    w: &mut dyn Write,
) -> anyhow::Result<()> {
    if mode == OutputMode::Json {
        serde_json::to_writer_pretty(&mut *w, &serde_json::json!({ "error": error }))?;
        writeln!(w)?;
        return Ok(());
    }

    match error.code {
        Some(code) => writeln!(w, "error[{code}]: {}", error.message)?,
        None => writeln!(w, "error: {}", error.message)?,
    }
    if let Some(hint) = error.hint {
        writeln!(w, "  hint: {hint}")?;
    }
    Ok(())
}

/// Write an error report to stderr.
pub fn render_error(mode: OutputMode, error: &ErrorReport) -> anyhow::Result<()> {
    write_error(mode, error, &mut io::stderr().lock())
}
