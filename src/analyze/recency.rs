//! Recency multiplier: exponential half-life decay with a floor.
//!
//! `decay = max(floor, exp(-ln 2 * hours / half_life))`, evaluated against the
//! run's single captured `now`. Articles with neither timestamp get a fixed
//! multiplier instead.

use chrono::{DateTime, Utc};

use crate::lexicon::ScoringParams;

/// Hours between `ts` and `now`. Future timestamps count as zero hours old.
pub fn hours_elapsed(ts: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let delta = now - ts;
    let hours = match delta.num_microseconds() {
        Some(us) => us as f64 / 3_600_000_000.0,
        None => delta.num_milliseconds() as f64 / 3_600_000.0,
    };
    hours.max(0.0)
}

pub fn recency_decay(
    published_at: Option<DateTime<Utc>>,
    fetched_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    params: &ScoringParams,
) -> f64 {
    let Some(ts) = published_at.or(fetched_at) else {
        return params.missing_timestamp_decay;
    };
    let hrs = hours_elapsed(ts, now);
    (-std::f64::consts::LN_2 * hrs / params.half_life_hours)
        .exp()
        .max(params.decay_floor)
}
