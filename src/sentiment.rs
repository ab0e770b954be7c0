//! Sentiment polarity used for the urgency kicker.
//!
//! The scorer only needs `text -> compound polarity in [-1, 1]`, expressed as
//! the [`PolarityScorer`] trait so tests can plug in a closure. The bundled
//! [`SentimentAnalyzer`] is a small lexicon model: word valences summed with a
//! three-token negation window, then squashed into `[-1, 1]`. [`VaderScorer`]
//! wraps VADER and is the default model for runs.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

static LEXICON: Lazy<HashMap<String, f64>> = Lazy::new(|| {
    let raw = include_str!("../sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, f64>>(raw).expect("valid sentiment lexicon")
});

/// Squashing constant: raw sum `s` maps to `s / sqrt(s^2 + ALPHA)`.
const ALPHA: f64 = 15.0;

/// Anything that turns text into a compound polarity in `[-1, 1]`.
pub trait PolarityScorer: Send + Sync {
    fn compound(&self, text: &str) -> f64;
}

impl<F> PolarityScorer for F
where
    F: Fn(&str) -> f64 + Send + Sync,
{
    fn compound(&self, text: &str) -> f64 {
        self(text)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Lexicon valence for a lowercased word (0.0 when unknown).
    #[inline]
    fn word_score(&self, w: &str) -> f64 {
        LEXICON.get(w).copied().unwrap_or(0.0)
    }

    /// Returns (raw valence sum, token count).
    /// A negator within the previous 1..=3 tokens flips a word's sign.
    pub fn score_text(&self, text: &str) -> (f64, usize) {
        // Collected because negation looks backwards.
        let tokens: Vec<String> = tokenize(text).collect();
        let mut score = 0.0;

        for i in 0..tokens.len() {
            let base = self.word_score(tokens[i].as_str());
            if base == 0.0 {
                continue;
            }
            let negated = (1..=3).any(|k| i >= k && is_negator(tokens[i - k].as_str()));
            score += if negated { -base } else { base };
        }

        (score, tokens.len())
    }
}

impl PolarityScorer for SentimentAnalyzer {
    fn compound(&self, text: &str) -> f64 {
        let (raw, _) = self.score_text(text);
        normalize(raw)
    }
}

/// VADER compound score (the `compound` entry of `polarity_scores`).
pub struct VaderScorer {
    inner: vader_sentiment::SentimentIntensityAnalyzer<'static>,
}

impl VaderScorer {
    pub fn new() -> Self {
        Self {
            inner: vader_sentiment::SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for VaderScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityScorer for VaderScorer {
    fn compound(&self, text: &str) -> f64 {
        self.inner
            .polarity_scores(text)
            .get("compound")
            .copied()
            .unwrap_or(0.0)
    }
}

/// Which bundled polarity model a run uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolarityModel {
    #[default]
    Vader,
    Lexicon,
}

impl PolarityModel {
    pub fn build(self) -> Box<dyn PolarityScorer> {
        match self {
            PolarityModel::Vader => Box::new(VaderScorer::new()),
            PolarityModel::Lexicon => Box::new(SentimentAnalyzer::new()),
        }
    }
}

fn normalize(raw: f64) -> f64 {
    if raw == 0.0 {
        return 0.0;
    }
    (raw / (raw * raw + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

/// Alphanumeric tokens (apostrophes kept so "isn't" survives), lowercased.
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not"
            | "no"
            | "never"
            | "isn't"
            | "wasn't"
            | "aren't"
            | "won't"
            | "can't"
            | "cannot"
            | "without"
            | "nothing"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_text_is_zero() {
        let a = SentimentAnalyzer::new();
        assert_eq!(a.compound("Saints hold practice on Wednesday"), 0.0);
        assert_eq!(a.compound(""), 0.0);
    }

    #[test]
    fn injury_news_reads_negative() {
        let a = SentimentAnalyzer::new();
        let c = a.compound("Star receiver suffers torn ACL, devastating blow");
        assert!(c < -0.5, "compound = {c}");
        assert!(c >= -1.0);
    }

    #[test]
    fn good_news_reads_positive() {
        let a = SentimentAnalyzer::new();
        let c = a.compound("Quarterback cleared and healthy, great news");
        assert!(c > 0.5, "compound = {c}");
        assert!(c <= 1.0);
    }

    #[test]
    fn negation_flips_sign() {
        let a = SentimentAnalyzer::new();
        let (plain, _) = a.score_text("injury is bad");
        let (negated, _) = a.score_text("injury isn't that bad");
        assert!(plain < 0.0);
        // "injury" stays negative, "bad" flips.
        assert!(negated > plain);
    }

    #[test]
    fn closures_are_scorers() {
        let stub = |_: &str| -0.25;
        assert_eq!(stub.compound("anything"), -0.25);
    }

    #[test]
    fn vader_reads_bad_news_negative() {
        let v = VaderScorer::new();
        let bad = v.compound("Terrible, horrible news: star QB hurt again");
        let good = v.compound("Great win, fans are happy");
        assert!(bad < -0.5, "compound = {bad}");
        assert!(good > 0.5, "compound = {good}");
        assert!((-1.0..=1.0).contains(&bad));
    }

    #[test]
    fn model_selection_builds_matching_scorer() {
        let text = "Star receiver suffers torn ACL, devastating blow";
        let lexicon = PolarityModel::Lexicon.build();
        assert_eq!(
            lexicon.compound(text),
            SentimentAnalyzer::new().compound(text)
        );
        let vader = PolarityModel::default().build();
        assert_eq!(vader.compound(text), VaderScorer::new().compound(text));
    }
}
