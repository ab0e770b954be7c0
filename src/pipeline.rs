// src/pipeline.rs
//! One batch run: load -> tag/score -> aggregate -> encode -> store.
//!
//! Every output is encoded in memory before the sink is touched, and the sink
//! replaces files only after all of them are staged. A failed run therefore
//! leaves the previous outputs untouched.

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::analyze::{score_articles, Scorer};
use crate::edges::aggregate_edges;
use crate::ingest::{load_snapshot, types::ArticleSource};
use crate::lexicon::LexiconConfig;
use crate::report::{build_report, ReportOptions, ReportSink};
use crate::sentiment::PolarityScorer;
use crate::tagging::Tagger;

/// Counters for the end-of-run log line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub rows_loaded: usize,
    pub team_mapped: usize,
    pub recent: usize,
    pub edges: usize,
    pub files: Vec<String>,
}

#[instrument(level = "info", skip_all, fields(provider = source.name(), %now))]
pub async fn run_once(
    source: &dyn ArticleSource,
    sink: &dyn ReportSink,
    lexicon: &LexiconConfig,
    polarity: &dyn PolarityScorer,
    opts: &ReportOptions,
    now: DateTime<Utc>,
) -> Result<RunSummary> {
    let tagger = Tagger::compile(lexicon)?;

    let articles = load_snapshot(source).await?;
    let rows_loaded = articles.len();

    let scorer = Scorer::new(lexicon, polarity, now);
    let scored = score_articles(&tagger, &scorer, articles);
    info!(rows_loaded, team_mapped = scored.len(), "articles tagged and scored");

    let report = aggregate_edges(&scored, opts.windows, now);
    info!(
        window = %opts.windows.label(),
        recent = report.recent.len(),
        teams = report.edges.len(),
        "edges aggregated"
    );

    let outputs = build_report(&report, opts)?;
    let files = sink.store(outputs).await?;

    let summary = RunSummary {
        rows_loaded,
        team_mapped: scored.len(),
        recent: report.recent.len(),
        edges: report.edges.len(),
        files,
    };
    info!(files = summary.files.len(), "run complete");
    Ok(summary)
}
