// src/lexicon.rs
//! Lexicon store: team aliases, topic patterns and weights, scoring constants
//! and source-credibility rules, all loaded from TOML.
//!
//! Resolution order for the file:
//! 1) `$EDGE_LEXICON_PATH` (must exist)
//! 2) `config/lexicon.toml` (if present)
//! 3) the copy embedded in the binary at build time
//!
//! This module holds data only; matching lives in `tagging`, weighting in
//! `source_weights` and `analyze`.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::error::SetupError;
use crate::source_weights::SourceRule;

pub const DEFAULT_LEXICON_PATH: &str = "config/lexicon.toml";
pub const ENV_LEXICON_PATH: &str = "EDGE_LEXICON_PATH";

const EMBEDDED_LEXICON: &str = include_str!("../config/lexicon.toml");

/* ----------------------------
Config schema (from TOML)
---------------------------- */

#[derive(Debug, Clone, Deserialize)]
pub struct LexiconConfig {
    #[serde(default)]
    pub scoring: ScoringParams,
    #[serde(default)]
    pub teams: Vec<TeamAliasSet>,
    #[serde(default)]
    pub topics: Vec<TopicDefinition>,
    #[serde(default)]
    pub source_rules: Vec<SourceRule>,
}

/// One team and every spelling that identifies it in a headline.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamAliasSet {
    pub name: String,
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopicDefinition {
    pub name: String,
    pub weight: f64,
    pub patterns: Vec<PatternSpec>,
}

/// Either a bare regex or a regex with a trailing-context guard.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PatternSpec {
    Plain(String),
    Guarded {
        pattern: String,
        #[serde(default)]
        unless_followed_by: Option<String>,
    },
}

impl PatternSpec {
    pub fn pattern(&self) -> &str {
        match self {
            PatternSpec::Plain(p) => p,
            PatternSpec::Guarded { pattern, .. } => pattern,
        }
    }

    pub fn guard(&self) -> Option<&str> {
        match self {
            PatternSpec::Plain(_) => None,
            PatternSpec::Guarded {
                unless_followed_by, ..
            } => unless_followed_by.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringParams {
    #[serde(default = "default_half_life_hours")]
    pub half_life_hours: f64,
    #[serde(default = "default_decay_floor")]
    pub decay_floor: f64,
    #[serde(default = "default_missing_timestamp_decay")]
    pub missing_timestamp_decay: f64,
    /// Topics whose negative tone earns the sentiment kicker.
    #[serde(default = "default_urgent_topics")]
    pub urgent_topics: Vec<String>,
    #[serde(default = "default_kicker_scale")]
    pub kicker_scale: f64,
}

fn default_half_life_hours() -> f64 {
    36.0
}
fn default_decay_floor() -> f64 {
    0.3
}
fn default_missing_timestamp_decay() -> f64 {
    0.8
}
fn default_urgent_topics() -> Vec<String> {
    vec!["Injury".to_string(), "Transaction".to_string()]
}
fn default_kicker_scale() -> f64 {
    1.2
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            half_life_hours: default_half_life_hours(),
            decay_floor: default_decay_floor(),
            missing_timestamp_decay: default_missing_timestamp_decay(),
            urgent_topics: default_urgent_topics(),
            kicker_scale: default_kicker_scale(),
        }
    }
}

impl LexiconConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, SetupError> {
        let cfg: LexiconConfig =
            toml::from_str(toml_str).map_err(|e| SetupError::Lexicon(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// The lexicon compiled into the binary.
    pub fn default_seed() -> Result<Self, SetupError> {
        Self::from_toml_str(EMBEDDED_LEXICON)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SetupError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SetupError::Lexicon(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Env override, then `config/lexicon.toml`, then the embedded seed.
    pub fn load() -> Result<Self, SetupError> {
        if let Ok(p) = std::env::var(ENV_LEXICON_PATH) {
            let path = PathBuf::from(p);
            if !path.exists() {
                return Err(SetupError::Lexicon(format!(
                    "{ENV_LEXICON_PATH} points to non-existent path {}",
                    path.display()
                )));
            }
            info!(path = %path.display(), "lexicon loaded from env path");
            return Self::load_from_file(&path);
        }
        let default_path = PathBuf::from(DEFAULT_LEXICON_PATH);
        if default_path.exists() {
            info!(path = %default_path.display(), "lexicon loaded");
            return Self::load_from_file(&default_path);
        }
        info!("lexicon file not found, using embedded seed");
        Self::default_seed()
    }

    pub fn topic_weight(&self, topic: &str) -> Option<f64> {
        self.topics.iter().find(|t| t.name == topic).map(|t| t.weight)
    }

    fn validate(&self) -> Result<(), SetupError> {
        let mut seen = HashSet::new();
        for team in &self.teams {
            if !seen.insert(team.name.as_str()) {
                return Err(SetupError::Lexicon(format!("duplicate team `{}`", team.name)));
            }
            if team.aliases.iter().any(|a| a.trim().is_empty()) {
                return Err(SetupError::Lexicon(format!(
                    "team `{}` has an empty alias",
                    team.name
                )));
            }
        }

        let mut seen = HashSet::new();
        for topic in &self.topics {
            if !seen.insert(topic.name.as_str()) {
                return Err(SetupError::Lexicon(format!(
                    "duplicate topic `{}`",
                    topic.name
                )));
            }
            if !(topic.weight.is_finite() && topic.weight > 0.0) {
                return Err(SetupError::Lexicon(format!(
                    "topic `{}` weight must be > 0, got {}",
                    topic.name, topic.weight
                )));
            }
        }

        let s = &self.scoring;
        if !(s.half_life_hours.is_finite() && s.half_life_hours > 0.0) {
            return Err(SetupError::Lexicon("half_life_hours must be > 0".into()));
        }
        if !(0.0..=1.0).contains(&s.decay_floor) {
            return Err(SetupError::Lexicon("decay_floor must be within [0, 1]".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_seed_matches_expected_shape() {
        let lex = LexiconConfig::default_seed().unwrap();
        assert_eq!(lex.teams.len(), 16);
        assert_eq!(lex.teams[0].name, "Saints");
        assert_eq!(lex.teams[1].name, "Falcons");
        assert_eq!(
            lex.topics.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
            vec!["Injury", "Transaction", "DepthChart", "Rumor"]
        );
        assert_eq!(lex.topic_weight("Injury"), Some(4.0));
        assert_eq!(lex.topic_weight("Transaction"), Some(2.5));
        assert_eq!(lex.topic_weight("DepthChart"), Some(1.5));
        assert_eq!(lex.topic_weight("Rumor"), Some(0.8));
        assert_eq!(lex.source_rules.len(), 4);
        assert!((lex.scoring.half_life_hours - 36.0).abs() < 1e-12);
    }

    #[test]
    fn guarded_pattern_parses() {
        let lex = LexiconConfig::default_seed().unwrap();
        let injury = &lex.topics[0];
        let guarded = injury
            .patterns
            .iter()
            .find(|p| p.guard().is_some())
            .expect("`out` carries a guard");
        assert_eq!(guarded.pattern(), r"\bout\b");
        assert_eq!(guarded.guard(), Some(r"\s*of\b"));
    }

    #[test]
    fn scoring_section_defaults_when_omitted() {
        let lex = LexiconConfig::from_toml_str(
            r#"
[[teams]]
name = "X"
aliases = ["X"]
"#,
        )
        .unwrap();
        assert!((lex.scoring.decay_floor - 0.3).abs() < 1e-12);
        assert!((lex.scoring.missing_timestamp_decay - 0.8).abs() < 1e-12);
        assert_eq!(lex.scoring.urgent_topics, vec!["Injury", "Transaction"]);
        assert!(lex.topics.is_empty());
    }

    #[test]
    fn rejects_non_positive_weight() {
        let err = LexiconConfig::from_toml_str(
            r#"
[[topics]]
name = "Bad"
weight = 0.0
patterns = ['\bx\b']
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Bad"));
    }

    #[test]
    fn rejects_duplicate_team_and_empty_alias() {
        let dup = r#"
[[teams]]
name = "A"
aliases = ["A"]
[[teams]]
name = "A"
aliases = ["B"]
"#;
        assert!(LexiconConfig::from_toml_str(dup).is_err());

        let empty = r#"
[[teams]]
name = "A"
aliases = ["  "]
"#;
        assert!(LexiconConfig::from_toml_str(empty).is_err());
    }

    #[serial_test::serial]
    #[test]
    fn env_path_must_exist_and_wins_over_default() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("lexicon.toml");
        fs::write(
            &file,
            r#"
[[teams]]
name = "Only"
aliases = ["Only"]
"#,
        )
        .unwrap();

        std::env::set_var(ENV_LEXICON_PATH, &file);
        let lex = LexiconConfig::load().unwrap();
        assert_eq!(lex.teams.len(), 1);
        assert!(lex.topics.is_empty());

        std::env::set_var(ENV_LEXICON_PATH, tmp.path().join("missing.toml"));
        assert!(matches!(LexiconConfig::load(), Err(SetupError::Lexicon(_))));

        std::env::remove_var(ENV_LEXICON_PATH);
    }
}
