//! Quick look at the article database: row count of the newest ten rows and
//! the first five title/source pairs.

use anyhow::Context;
use team_edge_analyzer::{Settings, SqliteArticleStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_target(false).init();

    let settings = Settings::load().context("loading settings")?;
    let store = SqliteArticleStore::new(&settings.db_path);
    let rows = store
        .fetch(Some(10))
        .await
        .with_context(|| format!("reading {}", store.path().display()))?;

    println!("rows: {}", rows.len());
    for a in rows.iter().take(5) {
        println!("{} | {}", a.title, a.source);
    }
    Ok(())
}
