// src/config/settings.rs
use std::path::{Path, PathBuf};
use std::{env, fs};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::edges::Windows;
use crate::error::SetupError;
use crate::report::ReportOptions;
use crate::sentiment::PolarityModel;

pub const DEFAULT_CONFIG_PATH: &str = "config/analyzer.toml";
pub const ENV_CONFIG_PATH: &str = "EDGE_CONFIG_PATH";
pub const ENV_DB_PATH: &str = "EDGE_DB_PATH";
pub const ENV_OUT_DIR: &str = "EDGE_OUT_DIR";
/// RFC 3339 instant used as "now" for the whole run.
pub const ENV_NOW: &str = "EDGE_NOW";

/// Upper bound for either window, about a century.
pub const MAX_WINDOW_DAYS: u32 = 36_500;

fn default_db_path() -> PathBuf {
    PathBuf::from("data/delphi_edge.db")
}
fn default_out_dir() -> PathBuf {
    PathBuf::from("data/analytics")
}
fn default_hours_recent() -> u32 {
    48
}
fn default_days_baseline() -> u32 {
    7
}
fn default_top_teams() -> usize {
    5
}
fn default_top_articles() -> usize {
    20
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    #[serde(default = "default_hours_recent")]
    pub hours_recent: u32,
    #[serde(default = "default_days_baseline")]
    pub days_baseline: u32,
    /// How many of the best-ranked teams get a top-articles file.
    #[serde(default = "default_top_teams")]
    pub top_teams: usize,
    #[serde(default = "default_top_articles")]
    pub top_articles: usize,
    /// Model behind the sentiment kicker.
    #[serde(default)]
    pub polarity_model: PolarityModel,
    /// Frozen evaluation time; `None` means the wall clock at run start.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            out_dir: default_out_dir(),
            hours_recent: default_hours_recent(),
            days_baseline: default_days_baseline(),
            top_teams: default_top_teams(),
            top_articles: default_top_articles(),
            polarity_model: PolarityModel::default(),
            now: None,
        }
    }
}

impl Settings {
    pub fn from_toml_str(s: &str) -> Result<Self, SetupError> {
        let cfg = Self::parse(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SetupError> {
        let cfg = Self::read_unvalidated(path.as_ref())?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn parse(s: &str) -> Result<Self, SetupError> {
        toml::from_str(s).map_err(|e| SetupError::Config(e.to_string()))
    }

    fn read_unvalidated(path: &Path) -> Result<Self, SetupError> {
        let data = fs::read_to_string(path).map_err(|e| {
            SetupError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::parse(&data)
    }

    /// Resolve settings:
    /// 1) $EDGE_CONFIG_PATH (must exist)
    /// 2) config/analyzer.toml
    /// 3) built-in defaults
    ///
    /// then apply $EDGE_DB_PATH, $EDGE_OUT_DIR and $EDGE_NOW on top and
    /// validate the result once.
    pub fn load() -> Result<Self, SetupError> {
        let mut cfg = if let Ok(p) = env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(SetupError::Config(format!(
                    "{ENV_CONFIG_PATH} points to non-existent path {}",
                    pb.display()
                )));
            }
            Self::read_unvalidated(&pb)?
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::read_unvalidated(Path::new(DEFAULT_CONFIG_PATH))?
        } else {
            Self::default()
        };

        if let Ok(p) = env::var(ENV_DB_PATH) {
            if !p.trim().is_empty() {
                cfg.db_path = PathBuf::from(p);
            }
        }
        if let Ok(p) = env::var(ENV_OUT_DIR) {
            if !p.trim().is_empty() {
                cfg.out_dir = PathBuf::from(p);
            }
        }
        if let Ok(raw) = env::var(ENV_NOW) {
            let t = DateTime::parse_from_rfc3339(raw.trim())
                .map_err(|e| SetupError::Config(format!("{ENV_NOW}={raw:?}: {e}")))?;
            cfg.now = Some(t.with_timezone(&Utc));
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn windows(&self) -> Windows {
        Windows {
            hours_recent: self.hours_recent,
            days_baseline: self.days_baseline,
        }
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            windows: self.windows(),
            top_teams: self.top_teams,
            top_articles: self.top_articles,
        }
    }

    /// The run's single "now".
    pub fn resolve_now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }

    fn validate(&self) -> Result<(), SetupError> {
        if self.hours_recent == 0 {
            return Err(SetupError::Config("hours_recent must be > 0".into()));
        }
        if self.days_baseline == 0 {
            return Err(SetupError::Config("days_baseline must be > 0".into()));
        }
        if self.days_baseline > MAX_WINDOW_DAYS {
            return Err(SetupError::Config(format!(
                "days_baseline must be <= {MAX_WINDOW_DAYS}, got {}",
                self.days_baseline
            )));
        }
        if u64::from(self.hours_recent) > u64::from(MAX_WINDOW_DAYS) * 24 {
            return Err(SetupError::Config(format!(
                "hours_recent must be <= {}, got {}",
                u64::from(MAX_WINDOW_DAYS) * 24,
                self.hours_recent
            )));
        }
        if self.windows().baseline_is_empty() {
            tracing::warn!(
                hours_recent = self.hours_recent,
                days_baseline = self.days_baseline,
                "baseline window does not reach past the recent window; baseline will be empty"
            );
        }
        Ok(())
    }
}
