// src/report/mod.rs
//! Output tables and their encodings.
//!
//! Files produced per run (all encoded in memory before anything is written):
//! - `edges_teams_<H>h_vs_<D>d.csv` and `.json`
//! - `recent_scored_articles.csv`
//! - `top_articles_<team>.csv` for the top-ranked teams

pub mod sink;

use anyhow::{anyhow, Result};
use serde::Serialize;

use crate::analyze::ScoredArticle;
use crate::edges::{EdgeRecord, EdgeReport, Windows};
use crate::ingest::timestamps::format_timestamp;

pub use sink::{DirSink, MemorySink, OutputFile, ReportSink};

pub const RECENT_ARTICLES_NAME: &str = "recent_scored_articles";

/// A serializable row with a fixed column projection.
pub trait TableRow: Serialize {
    const COLUMNS: &'static [&'static str];
}

impl TableRow for EdgeRecord {
    const COLUMNS: &'static [&'static str] =
        &["team", "score_recent", "score_baseline_mean", "edge_signal"];
}

/// Full audit row for the recent window.
#[derive(Debug, Serialize)]
pub struct RecentArticleRow<'a> {
    pub title: &'a str,
    pub url: &'a str,
    pub team: &'a str,
    pub topics: String,
    pub score: f64,
    pub source: &'a str,
    pub tags: Option<&'a str>,
    pub published_at: Option<String>,
    pub fetched_at: Option<String>,
    pub score_base: f64,
    pub score_source_w: f64,
    pub score_decay: f64,
    pub score_sentiment_kicker: f64,
}

impl TableRow for RecentArticleRow<'_> {
    const COLUMNS: &'static [&'static str] = &[
        "title",
        "url",
        "team",
        "topics",
        "score",
        "source",
        "tags",
        "published_at",
        "fetched_at",
        "score_base",
        "score_source_w",
        "score_decay",
        "score_sentiment_kicker",
    ];
}

impl<'a> From<&'a ScoredArticle> for RecentArticleRow<'a> {
    fn from(s: &'a ScoredArticle) -> Self {
        Self {
            title: &s.article.title,
            url: &s.article.url,
            team: &s.team,
            topics: topics_cell(s.topics()),
            score: s.score,
            source: &s.article.source,
            tags: s.article.tags.as_deref(),
            published_at: format_timestamp(s.article.published_at),
            fetched_at: format_timestamp(s.article.fetched_at),
            score_base: s.breakdown.base,
            score_source_w: s.breakdown.source_weight,
            score_decay: s.breakdown.decay,
            score_sentiment_kicker: s.breakdown.sentiment_kicker,
        }
    }
}

/// Per-team extract; same as the recent row minus `score_base`.
#[derive(Debug, Serialize)]
pub struct TopArticleRow<'a> {
    pub title: &'a str,
    pub url: &'a str,
    pub team: &'a str,
    pub topics: String,
    pub score: f64,
    pub source: &'a str,
    pub tags: Option<&'a str>,
    pub published_at: Option<String>,
    pub fetched_at: Option<String>,
    pub score_source_w: f64,
    pub score_decay: f64,
    pub score_sentiment_kicker: f64,
}

impl TableRow for TopArticleRow<'_> {
    const COLUMNS: &'static [&'static str] = &[
        "title",
        "url",
        "team",
        "topics",
        "score",
        "source",
        "tags",
        "published_at",
        "fetched_at",
        "score_source_w",
        "score_decay",
        "score_sentiment_kicker",
    ];
}

impl<'a> From<&'a ScoredArticle> for TopArticleRow<'a> {
    fn from(s: &'a ScoredArticle) -> Self {
        let full = RecentArticleRow::from(s);
        Self {
            title: full.title,
            url: full.url,
            team: full.team,
            topics: full.topics,
            score: full.score,
            source: full.source,
            tags: full.tags,
            published_at: full.published_at,
            fetched_at: full.fetched_at,
            score_source_w: full.score_source_w,
            score_decay: full.score_decay,
            score_sentiment_kicker: full.score_sentiment_kicker,
        }
    }
}

/// `["Injury","Rumor"]`
fn topics_cell(topics: &[String]) -> String {
    serde_json::to_string(topics).unwrap_or_else(|_| "[]".to_string())
}

/// Header row plus one line per record.
pub fn encode_csv<T: TableRow>(rows: &[T]) -> Result<Vec<u8>> {
    let mut w = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    w.write_record(T::COLUMNS)?;
    for r in rows {
        w.serialize(r)?;
    }
    w.into_inner().map_err(|e| anyhow!("csv flush failed: {e}"))
}

/// Array of objects.
pub fn encode_json<T: Serialize>(rows: &[T]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(rows)?)
}

/// Stable descending sort by score.
pub fn sorted_by_score<'a>(rows: &[&'a ScoredArticle]) -> Vec<&'a ScoredArticle> {
    let mut out = rows.to_vec();
    out.sort_by(|a, b| b.score.total_cmp(&a.score));
    out
}

/// Up to `n` highest-scored recent articles of `team`.
pub fn top_articles_for_team<'a>(
    recent: &[&'a ScoredArticle],
    team: &str,
    n: usize,
) -> Vec<&'a ScoredArticle> {
    let mine: Vec<&ScoredArticle> = recent.iter().copied().filter(|s| s.team == team).collect();
    let mut out = sorted_by_score(&mine);
    out.truncate(n);
    out
}

/// `South Carolina` -> `South_Carolina`
pub fn team_file_stem(team: &str) -> String {
    team.replace(' ', "_")
}

#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub windows: Windows,
    pub top_teams: usize,
    pub top_articles: usize,
}

/// Encode every output of a run.
pub fn build_report(report: &EdgeReport<'_>, opts: &ReportOptions) -> Result<Vec<OutputFile>> {
    let mut files = Vec::new();

    let edges_stem = format!("edges_teams_{}", opts.windows.label());
    files.push(OutputFile {
        name: format!("{edges_stem}.csv"),
        bytes: encode_csv(&report.edges)?,
    });
    files.push(OutputFile {
        name: format!("{edges_stem}.json"),
        bytes: encode_json(&report.edges)?,
    });

    let recent_rows: Vec<RecentArticleRow> = sorted_by_score(&report.recent)
        .into_iter()
        .map(RecentArticleRow::from)
        .collect();
    files.push(OutputFile {
        name: format!("{RECENT_ARTICLES_NAME}.csv"),
        bytes: encode_csv(&recent_rows)?,
    });

    for edge in report.edges.iter().take(opts.top_teams) {
        let rows: Vec<TopArticleRow> =
            top_articles_for_team(&report.recent, &edge.team, opts.top_articles)
                .into_iter()
                .map(TopArticleRow::from)
                .collect();
        files.push(OutputFile {
            name: format!("top_articles_{}.csv", team_file_stem(&edge.team)),
            bytes: encode_csv(&rows)?,
        });
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::ScoreBreakdown;
    use crate::ingest::types::Article;
    use chrono::{TimeZone, Utc};

    fn sa(team: &str, title: &str, score: f64) -> ScoredArticle {
        ScoredArticle {
            article: Article {
                title: title.into(),
                url: format!("https://example.test/{title}"),
                source: "espn.com".into(),
                tags: Some("local, team".into()),
                published_at: Some(Utc.with_ymd_and_hms(2025, 9, 10, 9, 30, 0).unwrap()),
                ..Default::default()
            },
            team: team.into(),
            score,
            breakdown: ScoreBreakdown {
                topics: vec!["Injury".into(), "Rumor".into()],
                base: 4.8,
                source_weight: 1.4,
                decay: 1.0,
                sentiment_kicker: 0.0,
            },
        }
    }

    fn first_line(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).lines().next().unwrap_or("").to_string()
    }

    #[test]
    fn csv_headers_follow_projection_even_when_empty() {
        let empty: Vec<EdgeRecord> = vec![];
        let bytes = encode_csv(&empty).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "team,score_recent,score_baseline_mean,edge_signal\n"
        );
    }

    #[test]
    fn recent_row_columns_line_up() {
        let a = sa("Saints", "QB hurt", 6.72);
        let rows = vec![RecentArticleRow::from(&a)];
        let text = String::from_utf8(encode_csv(&rows).unwrap()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), RecentArticleRow::COLUMNS.join(","));
        let mut rdr = csv::Reader::from_reader(text.as_bytes());
        let rec = rdr.records().next().unwrap().unwrap();
        assert_eq!(rec.len(), 13);
        assert_eq!(&rec[0], "QB hurt");
        assert_eq!(&rec[2], "Saints");
        assert_eq!(&rec[3], r#"["Injury","Rumor"]"#);
        assert_eq!(&rec[6], "local, team");
        assert_eq!(&rec[7], "2025-09-10T09:30:00+00:00");
        assert_eq!(&rec[8], "");
        assert_eq!(&rec[9], "4.8");
    }

    #[test]
    fn top_rows_omit_score_base() {
        assert!(!TopArticleRow::COLUMNS.contains(&"score_base"));
        assert_eq!(TopArticleRow::COLUMNS.len(), 12);
        let a = sa("Saints", "x", 1.0);
        let bytes = encode_csv(&[TopArticleRow::from(&a)]).unwrap();
        assert_eq!(first_line(&bytes), TopArticleRow::COLUMNS.join(","));
    }

    #[test]
    fn edges_json_is_array_of_objects() {
        let edges = vec![EdgeRecord {
            team: "Bills".into(),
            score_recent: 10.0,
            score_baseline_mean: 6.0,
            edge_signal: 4.0,
        }];
        let v: serde_json::Value = serde_json::from_slice(&encode_json(&edges).unwrap()).unwrap();
        assert_eq!(v[0]["team"], "Bills");
        assert_eq!(v[0]["edge_signal"], 4.0);
    }

    #[test]
    fn top_articles_sorted_filtered_and_truncated() {
        let arts = vec![
            sa("A", "a1", 1.0),
            sa("B", "b1", 9.0),
            sa("A", "a2", 3.0),
            sa("A", "a3", 3.0),
            sa("A", "a4", 2.0),
        ];
        let refs: Vec<&ScoredArticle> = arts.iter().collect();
        let top = top_articles_for_team(&refs, "A", 3);
        let titles: Vec<&str> = top.iter().map(|s| s.article.title.as_str()).collect();
        assert_eq!(titles, vec!["a2", "a3", "a4"]);
    }

    #[test]
    fn build_report_names_and_counts() {
        let arts = vec![
            sa("South Carolina", "sc1", 5.0),
            sa("Bills", "b1", 2.0),
            sa("Bills", "b2", 7.0),
        ];
        let report = EdgeReport {
            edges: vec![
                EdgeRecord {
                    team: "Bills".into(),
                    score_recent: 9.0,
                    score_baseline_mean: 0.0,
                    edge_signal: 9.0,
                },
                EdgeRecord {
                    team: "South Carolina".into(),
                    score_recent: 5.0,
                    score_baseline_mean: 0.0,
                    edge_signal: 5.0,
                },
            ],
            recent: arts.iter().collect(),
        };
        let opts = ReportOptions {
            windows: Windows::default(),
            top_teams: 5,
            top_articles: 20,
        };
        let files = build_report(&report, &opts).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "edges_teams_48h_vs_7d.csv",
                "edges_teams_48h_vs_7d.json",
                "recent_scored_articles.csv",
                "top_articles_Bills.csv",
                "top_articles_South_Carolina.csv",
            ]
        );

        let recent = String::from_utf8(files[2].bytes.clone()).unwrap();
        let titles: Vec<&str> = recent
            .lines()
            .skip(1)
            .map(|l| l.split(',').next().unwrap())
            .collect();
        assert_eq!(titles, vec!["b2", "sc1", "b1"]);
    }
}
