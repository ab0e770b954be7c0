// src/ingest/sqlite.rs
//! Read-only view of the scraper's SQLite database.
//!
//! The connection is scoped to a single `load_articles` call: open, read the
//! whole `articles` table, close. Nothing is filtered at the query layer.

use std::path::{Path, PathBuf};

use anyhow::Result;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Row,
};
use tracing::{debug, info, instrument};

use crate::error::SetupError;
use crate::ingest::timestamps::parse_timestamp;
use crate::ingest::types::{Article, ArticleSource};

const SELECT_ARTICLES: &str = r#"
    SELECT id,
           CAST(title AS TEXT)        AS title,
           CAST(url AS TEXT)          AS url,
           CAST(published_at AS TEXT) AS published_at,
           CAST(author AS TEXT)       AS author,
           CAST(summary AS TEXT)      AS summary,
           CAST(tags AS TEXT)         AS tags,
           CAST(fetched_at AS TEXT)   AS fetched_at,
           CAST(source AS TEXT)       AS source
      FROM articles
  ORDER BY id DESC
"#;

#[derive(Debug, Clone)]
pub struct SqliteArticleStore {
    path: PathBuf,
}

impl SqliteArticleStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `SELECT ... ORDER BY id DESC` with an optional row limit and close the
    /// connection before returning.
    #[instrument(level = "info", skip(self), fields(db = %self.path.display()))]
    pub async fn fetch(&self, limit: Option<u32>) -> Result<Vec<Article>, SetupError> {
        if !self.path.exists() {
            return Err(SetupError::DatabaseMissing(self.path.clone()));
        }

        let options = SqliteConnectOptions::new()
            .filename(&self.path)
            .read_only(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let query = match limit {
            Some(n) => format!("{SELECT_ARTICLES} LIMIT {n}"),
            None => SELECT_ARTICLES.to_string(),
        };
        let rows = sqlx::query(&query).fetch_all(&pool).await;
        pool.close().await;
        let rows = rows?;

        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            out.push(row_to_article(row)?);
        }
        info!(rows = out.len(), "articles loaded");
        Ok(out)
    }
}

#[async_trait::async_trait]
impl ArticleSource for SqliteArticleStore {
    async fn load_articles(&self) -> Result<Vec<Article>> {
        Ok(self.fetch(None).await?)
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}

fn row_to_article(row: &SqliteRow) -> Result<Article, sqlx::Error> {
    let id: i64 = row.try_get("id")?;
    let raw_published: Option<String> = row.try_get("published_at")?;
    let raw_fetched: Option<String> = row.try_get("fetched_at")?;

    let published_at = parse_timestamp(raw_published.as_deref());
    let fetched_at = parse_timestamp(raw_fetched.as_deref());
    if published_at.is_none() && raw_published.as_deref().is_some_and(|s| !s.trim().is_empty()) {
        debug!(id, raw = ?raw_published, "unparsable published_at");
    }
    if fetched_at.is_none() {
        debug!(id, raw = ?raw_fetched, "missing or unparsable fetched_at");
    }

    Ok(Article {
        id,
        title: row.try_get::<Option<String>, _>("title")?.unwrap_or_default(),
        url: row.try_get::<Option<String>, _>("url")?.unwrap_or_default(),
        published_at,
        author: row.try_get("author")?,
        summary: row.try_get("summary")?,
        tags: row.try_get("tags")?,
        fetched_at,
        source: row.try_get::<Option<String>, _>("source")?.unwrap_or_default(),
    })
}
