// src/ingest/mod.rs
pub mod sqlite;
pub mod timestamps;
pub mod types;

use crate::ingest::types::{Article, ArticleSource};

/// Load the full snapshot from `source`. Any failure here is fatal for the run.
pub async fn load_snapshot(source: &dyn ArticleSource) -> anyhow::Result<Vec<Article>> {
    let articles = source.load_articles().await?;
    tracing::info!(provider = source.name(), rows = articles.len(), "snapshot loaded");
    Ok(articles)
}
