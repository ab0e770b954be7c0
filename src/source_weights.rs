//! # Source Weights
//!
//! Credibility multiplier for an article, derived from its free-text `source`
//! and `tags` fields.
//!
//! - Rules come from the lexicon (`[[source_rules]]`), evaluated top to bottom.
//! - Each rule is a plain substring check on the lowercased field, with no
//!   word boundaries, so `"localnews"` counts as `"local"`.
//! - A hit either raises the running weight to at least `value` (`floor`) or
//!   lowers it to at most `value` (`cap`).
//! - The running weight starts at `1.0`.
//!
//! Order is significant: a later cap can pull the weight under an earlier
//! floor, and a later floor can lift it back.

use serde::Deserialize;

/// Neutral multiplier every article starts from.
pub const NEUTRAL_WEIGHT: f64 = 1.0;

/// Which article field a rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleField {
    Tags,
    Source,
}

/// How a matching rule moves the running weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleOp {
    /// `w = max(w, value)`
    Floor,
    /// `w = min(w, value)`
    Cap,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceRule {
    pub name: Option<String>,
    pub field: RuleField,
    pub any_contains: Vec<String>,
    pub op: RuleOp,
    pub value: f64,
}

impl SourceRule {
    fn matches(&self, source_lc: &str, tags_lc: &str) -> bool {
        let hay = match self.field {
            RuleField::Tags => tags_lc,
            RuleField::Source => source_lc,
        };
        self.any_contains
            .iter()
            .any(|needle| hay.contains(needle.to_lowercase().as_str()))
    }

    fn apply(&self, w: f64) -> f64 {
        match self.op {
            RuleOp::Floor => w.max(self.value),
            RuleOp::Cap => w.min(self.value),
        }
    }
}

/// Compute the source-credibility multiplier for one article.
pub fn source_weight(rules: &[SourceRule], source: &str, tags: &str) -> f64 {
    let s = source.to_lowercase();
    let t = tags.to_lowercase();

    rules
        .iter()
        .filter(|r| r.matches(&s, &t))
        .fold(NEUTRAL_WEIGHT, |w, r| r.apply(w))
}
