//! # Edge Signal
//! Recent-vs-baseline aggregation per team.
//!
//! Two adjacent, disjoint windows relative to the run's `now`:
//! - recent:   `[now - hours_recent, ∞)`
//! - baseline: `[now - days_baseline, now - hours_recent)`
//!
//! Per team, `score_recent` is the SUM of recent scores and
//! `score_baseline_mean` the MEAN of baseline scores (0.0 without baseline
//! articles). Only teams present in the recent window get a record.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::analyze::ScoredArticle;

/// Baseline mean enters the differential with this weight.
const BASELINE_WEIGHT: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Windows {
    pub hours_recent: u32,
    pub days_baseline: u32,
}

impl Default for Windows {
    fn default() -> Self {
        Self {
            hours_recent: 48,
            days_baseline: 7,
        }
    }
}

impl Windows {
    /// Start of the recent window (inclusive). Saturates at the earliest
    /// representable instant.
    pub fn recent_cut(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(Duration::hours(i64::from(self.hours_recent)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Start of the baseline window (inclusive). Saturates like `recent_cut`.
    pub fn baseline_cut(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(Duration::days(i64::from(self.days_baseline)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// True when the baseline window has no room before the recent one.
    pub fn baseline_is_empty(&self) -> bool {
        u64::from(self.days_baseline) * 24 <= u64::from(self.hours_recent)
    }

    /// File-name fragment, e.g. `48h_vs_7d`.
    pub fn label(&self) -> String {
        format!("{}h_vs_{}d", self.hours_recent, self.days_baseline)
    }
}

/// One ranked row of the primary output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub team: String,
    pub score_recent: f64,
    pub score_baseline_mean: f64,
    pub edge_signal: f64,
}

/// Aggregation result: ranked edges plus the recent subset they came from.
#[derive(Debug)]
pub struct EdgeReport<'a> {
    pub edges: Vec<EdgeRecord>,
    pub recent: Vec<&'a ScoredArticle>,
}

#[derive(Default)]
struct Acc {
    sum: f64,
    n: usize,
}

/// Partition `scored` into windows, reduce per team and rank by edge signal.
///
/// Articles without any usable timestamp fall in neither window. Ranking is a
/// stable descending sort over teams in name order.
pub fn aggregate_edges(
    scored: &[ScoredArticle],
    windows: Windows,
    now: DateTime<Utc>,
) -> EdgeReport<'_> {
    let recent_cut = windows.recent_cut(now);
    let base_cut = windows.baseline_cut(now);

    let mut recent = Vec::new();
    let mut recent_acc: BTreeMap<&str, Acc> = BTreeMap::new();
    let mut base_acc: BTreeMap<&str, Acc> = BTreeMap::new();

    for s in scored {
        let Some(ts) = s.article.effective_ts() else {
            continue;
        };
        if ts >= recent_cut {
            recent.push(s);
            let a = recent_acc.entry(s.team.as_str()).or_default();
            a.sum += s.score;
            a.n += 1;
        } else if ts >= base_cut {
            let a = base_acc.entry(s.team.as_str()).or_default();
            a.sum += s.score;
            a.n += 1;
        }
    }

    let mut edges: Vec<EdgeRecord> = recent_acc
        .into_iter()
        .map(|(team, r)| {
            let baseline_mean = match base_acc.get(team) {
                Some(b) if b.n > 0 => b.sum / b.n as f64,
                _ => 0.0,
            };
            EdgeRecord {
                team: team.to_string(),
                score_recent: r.sum,
                score_baseline_mean: baseline_mean,
                edge_signal: r.sum - BASELINE_WEIGHT * baseline_mean,
            }
        })
        .collect();

    edges.sort_by(|a, b| b.edge_signal.total_cmp(&a.edge_signal));

    EdgeReport { edges, recent }
}
