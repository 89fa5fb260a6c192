// Reporting periods - granularity, date ranges, and the period axis
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Bucket width for a report. Chosen per request and fixed for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    Hourly,
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Granularity {
    /// Parse a request parameter. Unknown values return None so the caller
    /// can apply the daily fallback.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "hourly" => Some(Granularity::Hourly),
            "daily" => Some(Granularity::Daily),
            "weekly" => Some(Granularity::Weekly),
            "monthly" => Some(Granularity::Monthly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Hourly => "hourly",
            Granularity::Daily => "daily",
            Granularity::Weekly => "weekly",
            Granularity::Monthly => "monthly",
        }
    }
}

/// Inclusive calendar date range. A reversed range is treated as empty
/// rather than as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

/// One bucket on the axis: the internal join key and the display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    pub key: String,
    pub label: String,
}

/// The ordered, gap-free sequence of periods covering a range at one
/// granularity. Built once per report and shared by every form in it,
/// which is what makes multi-form series comparable position by position.
#[derive(Debug, Clone)]
pub struct PeriodAxis {
    granularity: Granularity,
    periods: Vec<Period>,
}

impl PeriodAxis {
    pub fn new(granularity: Granularity, periods: Vec<Period>) -> Self {
        Self {
            granularity,
            periods,
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        self.periods.iter().map(|p| p.label.clone()).collect()
    }
}

/// Build the period axis covering `range` at `granularity`.
///
/// The cursor starts at the beginning of the bucket containing `range.start`
/// and advances one bucket at a time until it passes `range.end` at midnight,
/// so `start == end` always yields exactly one bucket. Weekly buckets start
/// on Monday and monthly buckets on the first of the month; advancing from a
/// bucket start can neither skip nor repeat a bucket across month or year
/// boundaries.
pub fn build_axis(granularity: Granularity, range: &DateRange) -> PeriodAxis {
    let mut periods = Vec::new();
    if range.start <= range.end {
        let end = range.end.and_time(NaiveTime::MIN);
        let mut cursor = bucket_start(range.start.and_time(NaiveTime::MIN), granularity);
        while cursor <= end {
            periods.push(Period {
                key: key_for(cursor, granularity),
                label: label_for(cursor, granularity),
            });
            match advance(cursor, granularity) {
                Some(next) => cursor = next,
                None => break,
            }
        }
    }
    PeriodAxis::new(granularity, periods)
}

/// Normalize a timestamp into its bucket key. Agrees with the keys
/// `build_axis` emits for any timestamp inside the range.
pub fn period_key(timestamp: NaiveDateTime, granularity: Granularity) -> String {
    key_for(bucket_start(timestamp, granularity), granularity)
}

fn bucket_start(timestamp: NaiveDateTime, granularity: Granularity) -> NaiveDateTime {
    let date = timestamp.date();
    match granularity {
        Granularity::Hourly => date
            .and_hms_opt(timestamp.hour(), 0, 0)
            .unwrap_or_else(|| date.and_time(NaiveTime::MIN)),
        Granularity::Daily => date.and_time(NaiveTime::MIN),
        Granularity::Weekly => {
            let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
            monday.and_time(NaiveTime::MIN)
        }
        Granularity::Monthly => date.with_day(1).unwrap_or(date).and_time(NaiveTime::MIN),
    }
}

fn advance(cursor: NaiveDateTime, granularity: Granularity) -> Option<NaiveDateTime> {
    match granularity {
        Granularity::Hourly => cursor.checked_add_signed(Duration::hours(1)),
        Granularity::Daily => cursor.checked_add_signed(Duration::days(1)),
        Granularity::Weekly => cursor.checked_add_signed(Duration::days(7)),
        Granularity::Monthly => cursor
            .date()
            .checked_add_months(Months::new(1))
            .map(|d| d.and_time(NaiveTime::MIN)),
    }
}

fn key_for(bucket: NaiveDateTime, granularity: Granularity) -> String {
    match granularity {
        Granularity::Hourly => bucket.format("%Y-%m-%d %H").to_string(),
        Granularity::Daily => bucket.format("%Y-%m-%d").to_string(),
        Granularity::Weekly => {
            let week = bucket.date().iso_week();
            format!("{:04}-W{:02}", week.year(), week.week())
        }
        Granularity::Monthly => bucket.format("%Y-%m").to_string(),
    }
}

fn label_for(bucket: NaiveDateTime, granularity: Granularity) -> String {
    match granularity {
        Granularity::Hourly => bucket.format("%b %-d, %Y %H:00").to_string(),
        Granularity::Daily => bucket.format("%b %-d, %Y").to_string(),
        Granularity::Weekly => format!("Week of {}", bucket.format("%b %-d, %Y")),
        Granularity::Monthly => bucket.format("%b %Y").to_string(),
    }
}
