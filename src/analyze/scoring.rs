//! Per-article relevance/urgency score.
//!
//! score = base * source_weight * decay + sentiment_kicker
//!
//! - `base`             : sum of matched topic weights
//! - `source_weight`    : credibility multiplier from `source`/`tags`
//! - `decay`            : recency multiplier (see `recency`)
//! - `sentiment_kicker` : `max(0, -compound) * kicker_scale`, only for urgent topics
//!
//! The kicker is added after the product; it is never scaled by source or decay.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::recency::recency_decay;
use crate::ingest::types::Article;
use crate::lexicon::LexiconConfig;
use crate::sentiment::PolarityScorer;
use crate::source_weights::source_weight;

/// Every factor that went into a score, kept for auditability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub topics: Vec<String>,
    pub base: f64,
    pub source_weight: f64,
    pub decay: f64,
    pub sentiment_kicker: f64,
}

impl ScoreBreakdown {
    /// Fixed breakdown for topic-less articles. Source and decay are not evaluated.
    pub fn zero() -> Self {
        Self {
            topics: Vec::new(),
            base: 0.0,
            source_weight: 1.0,
            decay: 1.0,
            sentiment_kicker: 0.0,
        }
    }

    pub fn total(&self) -> f64 {
        self.base * self.source_weight * self.decay + self.sentiment_kicker
    }
}

/// Inputs shared by every article in one run.
pub struct Scorer<'a> {
    lexicon: &'a LexiconConfig,
    polarity: &'a dyn PolarityScorer,
    now: DateTime<Utc>,
}

impl<'a> Scorer<'a> {
    pub fn new(
        lexicon: &'a LexiconConfig,
        polarity: &'a dyn PolarityScorer,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            lexicon,
            polarity,
            now,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Score one article given the topics already matched for it.
    pub fn score(&self, article: &Article, topics: Vec<String>) -> (f64, ScoreBreakdown) {
        if topics.is_empty() {
            return (0.0, ScoreBreakdown::zero());
        }

        let base = self.base_weight(&topics);
        let src_w = source_weight(
            &self.lexicon.source_rules,
            &article.source,
            article.tags_text(),
        );
        let decay = recency_decay(
            article.published_at,
            article.fetched_at,
            self.now,
            &self.lexicon.scoring,
        );
        let sent = self.sentiment_kicker(article, &topics);

        let breakdown = ScoreBreakdown {
            topics,
            base,
            source_weight: src_w,
            decay,
            sentiment_kicker: sent,
        };
        (breakdown.total(), breakdown)
    }

    fn base_weight(&self, topics: &[String]) -> f64 {
        topics
            .iter()
            .filter_map(|t| self.lexicon.topic_weight(t))
            .sum()
    }

    fn sentiment_kicker(&self, article: &Article, topics: &[String]) -> f64 {
        let params = &self.lexicon.scoring;
        let urgent = topics.iter().any(|t| params.urgent_topics.contains(t));
        if !urgent {
            return 0.0;
        }
        let text = format!("{} {}", article.title, article.summary_text());
        let compound = self.polarity.compound(&text).clamp(-1.0, 1.0);
        (-compound).max(0.0) * params.kicker_scale
    }
}
