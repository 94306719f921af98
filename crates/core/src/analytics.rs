//! Helpers for the statistics endpoint.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use serde::Serialize;

use crate::timezone::local_day;
use crate::types::Timestamp;

/// Pie-chart label for goals without a category.
pub const UNCATEGORIZED_LABEL: &str = "General";

/// Number of days covered by the activity bar chart, today included.
pub const ACTIVITY_WINDOW_DAYS: i64 = 7;

/// Parallel label/value arrays, the shape chart widgets consume.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub data: Vec<i64>,
}

impl ChartSeries {
    pub fn push(&mut self, label: impl Into<String>, value: i64) {
        self.labels.push(label.into());
        self.data.push(value);
    }
}

/// Percentage of goals completed, rounded to one decimal place.
pub fn win_rate(completed: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    (completed as f64 / total as f64 * 1000.0).round() / 10.0
}

/// First day of the activity window ending on `today`.
pub fn activity_window_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(ACTIVITY_WINDOW_DAYS - 1)
}

/// Count completion instants per calendar day in the user's zone.
pub fn completions_per_day(end_times: &[Timestamp], tz: Tz) -> HashMap<NaiveDate, i64> {
    let mut counts = HashMap::new();
    for &ts in end_times {
        *counts.entry(local_day(ts, tz)).or_insert(0) += 1;
    }
    counts
}

/// One bar per day from six days ago through `today`, labelled by weekday
/// ("Mon", "Tue", ...) and zero-filled where `counts` has no entry.
pub fn activity_series(today: NaiveDate, counts: &HashMap<NaiveDate, i64>) -> ChartSeries {
    let start = activity_window_start(today);
    let mut series = ChartSeries::default();
    for offset in 0..ACTIVITY_WINDOW_DAYS {
        let day = start + Duration::days(offset);
        series.push(day.format("%a").to_string(), counts.get(&day).copied().unwrap_or(0));
    }
    series
}
