// Conversion rates - views-to-submissions percentages per period
use serde::Serialize;

/// Aggregate conversion figures for one form over the whole range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionStats {
    pub total_views: i64,
    pub total_submissions: i64,
    pub conversion_rate: f64,
}

/// Per-period conversion percentages plus the aggregate stats.
///
/// Both inputs are dense series on the same axis; if the lengths ever
/// differ, the shorter one reads as zero-padded. A period with zero views
/// converts at 0 rather than dividing by zero. The aggregate rate is
/// computed from the totals, not by averaging the per-period rates, so
/// low-volume periods do not skew it.
pub fn compute_conversion(submissions: &[i64], views: &[i64]) -> (Vec<f64>, ConversionStats) {
    let len = submissions.len().max(views.len());
    let mut rates = Vec::with_capacity(len);
    for i in 0..len {
        let subs = submissions.get(i).copied().unwrap_or(0);
        let view = views.get(i).copied().unwrap_or(0);
        if view == 0 {
            rates.push(0.0);
        } else {
            rates.push(round2(100.0 * subs as f64 / view as f64));
        }
    }

    let total_submissions: i64 = submissions.iter().sum();
    let total_views: i64 = views.iter().sum();
    let conversion_rate = if total_views == 0 {
        0.0
    } else {
        round2(100.0 * total_submissions as f64 / total_views as f64)
    };

    (
        rates,
        ConversionStats {
            total_views,
            total_submissions,
            conversion_rate,
        },
    )
}

/// Round to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_view_periods_convert_at_zero() {
        let (rates, stats) = compute_conversion(&[10, 20], &[0, 50]);
        assert_eq!(rates, vec![0.0, 40.0]);
        assert_eq!(stats.total_views, 50);
        assert_eq!(stats.total_submissions, 30);
        assert_eq!(stats.conversion_rate, 60.0);
    }

    #[test]
    fn test_rates_round_to_two_decimals() {
        // 1/3 views is 33.333...%, rounded to 33.33.
        let (rates, stats) = compute_conversion(&[1], &[3]);
        assert_eq!(rates, vec![33.33]);
        assert_eq!(stats.conversion_rate, 33.33);
    }

    #[test]
    fn test_rate_can_exceed_one_hundred_percent() {
        // More submissions than tracked views happens when view tracking
        // starts after the form went live.
        let (rates, stats) = compute_conversion(&[5], &[2]);
        assert_eq!(rates, vec![250.0]);
        assert_eq!(stats.conversion_rate, 250.0);
    }

    #[test]
    fn test_length_mismatch_reads_shorter_series_as_zero_padded() {
        let (rates, stats) = compute_conversion(&[4, 4, 4], &[8]);
        assert_eq!(rates, vec![50.0, 0.0, 0.0]);
        assert_eq!(stats.total_submissions, 12);
        assert_eq!(stats.total_views, 8);
        assert_eq!(stats.conversion_rate, 150.0);
    }

    #[test]
    fn test_all_zero_views_yield_zero_aggregate_rate() {
        let (rates, stats) = compute_conversion(&[3, 1], &[0, 0]);
        assert_eq!(rates, vec![0.0, 0.0]);
        assert_eq!(stats.conversion_rate, 0.0);
    }

    #[test]
    fn test_empty_series() {
        let (rates, stats) = compute_conversion(&[], &[]);
        assert!(rates.is_empty());
        assert_eq!(stats.total_views, 0);
        assert_eq!(stats.total_submissions, 0);
        assert_eq!(stats.conversion_rate, 0.0);
    }
}
