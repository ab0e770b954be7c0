// src/tagging.rs
//! Team tagging and topic matching over free text.
//!
//! Both are compiled once from the lexicon and are pure afterwards:
//! - team: title only, whole-word alias hit, first declared team wins
//! - topics: title + summary, any pattern hit marks the topic present

use regex::{Regex, RegexBuilder};

use crate::error::SetupError;
use crate::lexicon::{LexiconConfig, PatternSpec};

/* ----------------------------
Compiled engine structures
---------------------------- */

#[derive(Debug)]
struct CompiledTeam {
    name: String,
    aliases: Vec<Regex>,
}

#[derive(Debug)]
struct CompiledPattern {
    re: Regex,
    /// Anchored at the end of a hit; when it matches the hit is discarded.
    unless_followed_by: Option<Regex>,
}

impl CompiledPattern {
    fn is_match(&self, text: &str) -> bool {
        match &self.unless_followed_by {
            None => self.re.is_match(text),
            Some(guard) => self
                .re
                .find_iter(text)
                .any(|m| !guard.is_match(&text[m.end()..])),
        }
    }
}

#[derive(Debug)]
struct CompiledTopic {
    name: String,
    patterns: Vec<CompiledPattern>,
}

/// Holds the compiled team and topic regexes.
#[derive(Debug)]
pub struct Tagger {
    teams: Vec<CompiledTeam>,
    topics: Vec<CompiledTopic>,
}

fn ci_regex(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

impl Tagger {
    pub fn compile(lex: &LexiconConfig) -> Result<Self, SetupError> {
        let teams = lex
            .teams
            .iter()
            .map(|t| {
                let aliases = t
                    .aliases
                    .iter()
                    .map(|a| {
                        ci_regex(&format!(r"\b{}\b", regex::escape(a.trim()))).map_err(|e| {
                            SetupError::Lexicon(format!("team `{}` alias `{a}`: {e}", t.name))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(CompiledTeam {
                    name: t.name.clone(),
                    aliases,
                })
            })
            .collect::<Result<Vec<_>, SetupError>>()?;

        let topics = lex
            .topics
            .iter()
            .map(|t| {
                let patterns = t
                    .patterns
                    .iter()
                    .map(|p| compile_pattern(&t.name, p))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(CompiledTopic {
                    name: t.name.clone(),
                    patterns,
                })
            })
            .collect::<Result<Vec<_>, SetupError>>()?;

        Ok(Self { teams, topics })
    }

    /// Canonical team for a headline, or `None`. Declaration order breaks ties.
    pub fn tag_team(&self, title: &str) -> Option<&str> {
        self.teams
            .iter()
            .find(|t| t.aliases.iter().any(|re| re.is_match(title)))
            .map(|t| t.name.as_str())
    }

    /// Topics present in `title + " " + summary`, in lexicon order.
    pub fn match_topics(&self, title: &str, summary: &str) -> Vec<String> {
        let text = format!("{title} {summary}");
        self.topics
            .iter()
            .filter(|t| t.patterns.iter().any(|p| p.is_match(&text)))
            .map(|t| t.name.clone())
            .collect()
    }
}

fn compile_pattern(topic: &str, spec: &PatternSpec) -> Result<CompiledPattern, SetupError> {
    let re = ci_regex(spec.pattern()).map_err(|e| {
        SetupError::Lexicon(format!("topic `{topic}` pattern `{}`: {e}", spec.pattern()))
    })?;
    let unless_followed_by = match spec.guard() {
        Some(g) => Some(ci_regex(&format!("^(?:{g})")).map_err(|e| {
            SetupError::Lexicon(format!("topic `{topic}` guard `{g}`: {e}"))
        })?),
        None => None,
    };
    Ok(CompiledPattern {
        re,
        unless_followed_by,
    })
}
