// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod analyze;
pub mod config;
pub mod edges;
pub mod error;
pub mod ingest;
pub mod lexicon;
pub mod pipeline;
pub mod report;
pub mod sentiment;
pub mod source_weights;
pub mod tagging;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{ScoreBreakdown, ScoredArticle, Scorer};
pub use crate::config::Settings;
pub use crate::edges::{aggregate_edges, EdgeRecord, EdgeReport, Windows};
pub use crate::error::SetupError;
pub use crate::ingest::sqlite::SqliteArticleStore;
pub use crate::ingest::types::{Article, ArticleSource};
pub use crate::lexicon::LexiconConfig;
pub use crate::pipeline::{run_once, RunSummary};
pub use crate::report::{DirSink, OutputFile, ReportOptions, ReportSink};
pub use crate::sentiment::{PolarityModel, PolarityScorer, SentimentAnalyzer, VaderScorer};
pub use crate::tagging::Tagger;
