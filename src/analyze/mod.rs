// src/analyze/mod.rs
//! Per-article pass: tag team, match topics, score.
//!
//! Articles without a team are dropped here. Team-tagged articles without any
//! topic are kept with a zero score.

pub mod recency;
pub mod scoring;

use tracing::debug;

use crate::ingest::types::Article;
use crate::tagging::Tagger;

pub use crate::analyze::recency::recency_decay;
pub use crate::analyze::scoring::{ScoreBreakdown, Scorer};

/// An article with exactly one team and its score breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredArticle {
    pub article: Article,
    pub team: String,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

impl ScoredArticle {
    pub fn topics(&self) -> &[String] {
        &self.breakdown.topics
    }
}

/// Tag and score one article; `None` when no team matches its title.
pub fn score_one(tagger: &Tagger, scorer: &Scorer<'_>, article: Article) -> Option<ScoredArticle> {
    let team = tagger.tag_team(&article.title)?.to_string();
    let topics = tagger.match_topics(&article.title, article.summary_text());
    let (score, breakdown) = scorer.score(&article, topics);
    debug!(
        id = article.id,
        %team,
        score,
        topics = ?breakdown.topics,
        "article scored"
    );
    Some(ScoredArticle {
        article,
        team,
        score,
        breakdown,
    })
}

/// Score the whole snapshot, preserving input order.
pub fn score_articles(
    tagger: &Tagger,
    scorer: &Scorer<'_>,
    articles: Vec<Article>,
) -> Vec<ScoredArticle> {
    articles
        .into_iter()
        .filter_map(|a| score_one(tagger, scorer, a))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::LexiconConfig;
    use chrono::{TimeZone, Utc};

    fn mk(id: i64, title: &str, summary: Option<&str>) -> Article {
        Article {
            id,
            title: title.into(),
            summary: summary.map(str::to_string),
            fetched_at: Some(Utc.with_ymd_and_hms(2025, 9, 10, 11, 0, 0).unwrap()),
            ..Default::default()
        }
    }

    #[test]
    fn drops_untagged_keeps_topicless() {
        let lex = LexiconConfig::default_seed().unwrap();
        let tagger = Tagger::compile(&lex).unwrap();
        let neutral = |_: &str| 0.0;
        let now = Utc.with_ymd_and_hms(2025, 9, 10, 12, 0, 0).unwrap();
        let scorer = Scorer::new(&lex, &neutral, now);

        let out = score_articles(
            &tagger,
            &scorer,
            vec![
                mk(3, "Ravens place LB on IR", None),
                mk(2, "League memo on kickoff rules", Some("ACL injuries up")),
                mk(1, "Ravens community day photos", None),
            ],
        );

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].article.id, 3);
        assert_eq!(out[0].team, "Ravens");
        assert_eq!(out[0].topics(), &["Injury".to_string()]);
        assert!(out[0].score > 0.0);

        assert_eq!(out[1].article.id, 1);
        assert_eq!(out[1].score, 0.0);
        assert_eq!(out[1].breakdown.base, 0.0);
        assert!(out[1].topics().is_empty());
    }
}
