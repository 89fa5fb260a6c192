// Report assembly - per-form series and the cross-form summary
use serde::Serialize;

use crate::domain::conversion::ConversionStats;
use crate::domain::series::{round1, SeriesStats};

/// One form's submission series on the shared axis.
#[derive(Debug, Clone, Serialize)]
pub struct FormSeries {
    pub form_id: u64,
    pub title: String,
    pub data: Vec<i64>,
    pub stats: SeriesStats,
}

/// One form's conversion series on the shared axis.
#[derive(Debug, Clone, Serialize)]
pub struct FormConversion {
    pub form_id: u64,
    pub title: String,
    pub rates: Vec<f64>,
    pub stats: ConversionStats,
}

/// Cross-form rollup shown above the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub grand_total: i64,
    pub overall_average: f64,
    pub peak_count: i64,
    pub peak_period: String,
}

/// The complete chart-ready report: one shared label axis, parallel series
/// per form for submissions and conversion, and the cross-form summary.
/// Built fresh per request and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct FormsReport {
    pub labels: Vec<String>,
    pub forms: Vec<FormSeries>,
    pub conversion: Vec<FormConversion>,
    pub summary: ReportSummary,
}

/// Fold per-form stats into the report summary.
///
/// The average divides the grand total by the longest series length present.
/// The global peak keeps the first form whose peak is strictly greater than
/// anything seen so far, so ties resolve to the earliest form, and its label
/// carries the form title for disambiguation. A form with no periods (empty
/// axis) contributes an empty label, keeping the summary label empty rather
/// than ` (Title)`.
pub fn reduce_summary(forms: &[FormSeries]) -> ReportSummary {
    let grand_total: i64 = forms.iter().map(|f| f.stats.total).sum();
    let max_len = forms.iter().map(|f| f.data.len()).max().unwrap_or(0);
    let overall_average = if max_len == 0 {
        0.0
    } else {
        round1(grand_total as f64 / max_len as f64)
    };

    let mut peak_count = 0;
    let mut peak_period = String::new();
    if let Some(first) = forms.first() {
        peak_count = first.stats.peak_count;
        peak_period = summary_label(first);
        for form in &forms[1..] {
            if form.stats.peak_count > peak_count {
                peak_count = form.stats.peak_count;
                peak_period = summary_label(form);
            }
        }
    }

    ReportSummary {
        grand_total,
        overall_average,
        peak_count,
        peak_period,
    }
}

fn summary_label(form: &FormSeries) -> String {
    if form.stats.peak_period.is_empty() {
        String::new()
    } else {
        format!("{} ({})", form.stats.peak_period, form.title)
    }
}
