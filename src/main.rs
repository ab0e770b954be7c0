//! Team Edge Analyzer: batch entrypoint.
//! Reads the scraper's article database once, ranks teams by recent-vs-baseline
//! edge signal and writes the CSV/JSON outputs.

use std::process::ExitCode;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use team_edge_analyzer::{
    run_once, DirSink, LexiconConfig, Settings, SqliteArticleStore,
};

/// Compact logs to stderr; `RUST_LOG` overrides the default `info` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

async fn run() -> anyhow::Result<()> {
    let settings = Settings::load().context("loading settings")?;
    let lexicon = LexiconConfig::load().context("loading lexicon")?;
    let now = settings.resolve_now();
    info!(
        db = %settings.db_path.display(),
        out = %settings.out_dir.display(),
        %now,
        model = ?settings.polarity_model,
        "starting edge run"
    );

    let store = SqliteArticleStore::new(&settings.db_path);
    let sink = DirSink::new(&settings.out_dir);
    let polarity = settings.polarity_model.build();

    let summary = run_once(
        &store,
        &sink,
        &lexicon,
        polarity.as_ref(),
        &settings.report_options(),
        now,
    )
    .await?;

    for path in &summary.files {
        println!("saved {path}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env in local/dev; harmless when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "edge run failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
