// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};

/// One scraped article as stored by the scraper. Read-only.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub tags: Option<String>, // free-form, e.g. "local,team,injury"
    pub fetched_at: Option<DateTime<Utc>>,
    pub source: String, // e.g. "espn.com"
}

impl Article {
    /// `published_at` when known, otherwise `fetched_at`.
    pub fn effective_ts(&self) -> Option<DateTime<Utc>> {
        self.published_at.or(self.fetched_at)
    }

    pub fn summary_text(&self) -> &str {
        self.summary.as_deref().unwrap_or("")
    }

    pub fn tags_text(&self) -> &str {
        self.tags.as_deref().unwrap_or("")
    }
}

/// Anything that can hand over the full article snapshot in one go.
#[async_trait::async_trait]
pub trait ArticleSource: Send + Sync {
    async fn load_articles(&self) -> Result<Vec<Article>>;
    fn name(&self) -> &'static str;
}
