// Series aggregation - densifying raw observations onto a period axis
use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::period::{self, PeriodAxis};

/// A raw (timestamp, count) event as returned by a data source. Unordered;
/// several observations may land in the same bucket and their counts sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawObservation {
    pub timestamp: NaiveDateTime,
    pub count: i64,
}

impl RawObservation {
    pub fn new(timestamp: NaiveDateTime, count: i64) -> Self {
        Self { timestamp, count }
    }
}

/// Project raw observations onto the axis: one value per axis position, in
/// axis order, zero where a bucket has no observations. Observations that
/// fall outside the axis are dropped. The output length always equals the
/// axis length, which keeps independently fetched forms aligned.
pub fn densify(observations: &[RawObservation], axis: &PeriodAxis) -> Vec<i64> {
    let mut by_key: HashMap<String, i64> = HashMap::new();
    for obs in observations {
        let key = period::period_key(obs.timestamp, axis.granularity());
        *by_key.entry(key).or_insert(0) += obs.count;
    }
    axis.periods()
        .iter()
        .map(|p| by_key.get(&p.key).copied().unwrap_or(0))
        .collect()
}

/// Per-series statistics shown in the stat boxes above the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesStats {
    pub total: i64,
    pub average: f64,
    pub peak_count: i64,
    pub peak_period: String,
}

/// Total, average (one decimal), and peak of a dense series. The peak label
/// is the label of the first position attaining the peak value, so ties
/// resolve to the earliest period. An all-zero series peaks at the first
/// label; an empty series reports an empty label.
pub fn compute_stats(series: &[i64], axis: &PeriodAxis) -> SeriesStats {
    let total: i64 = series.iter().sum();
    let average = if series.is_empty() {
        0.0
    } else {
        round1(total as f64 / series.len() as f64)
    };

    let mut peak_count = 0;
    let mut peak_period = axis
        .periods()
        .first()
        .map(|p| p.label.clone())
        .unwrap_or_default();
    for (value, period) in series.iter().zip(axis.periods()) {
        if *value > peak_count {
            peak_count = *value;
            peak_period = period.label.clone();
        }
    }

    SeriesStats {
        total,
        average,
        peak_count,
        peak_period,
    }
}

/// Round to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
