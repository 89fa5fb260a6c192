//! Integration tests for the report pipeline
//!
//! These tests drive the SQLite event store and the report service together
//! to verify the end-to-end flow from stored rows to a chart-ready report.

use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;
use tempfile::TempDir;

use formgraph::application::forms_service::FormsService;
use formgraph::application::report_service::{ReportRequest, ReportService};
use formgraph::application::sources::SubmissionSource;
use formgraph::domain::form::Form;
use formgraph::domain::period::{DateRange, Granularity};
use formgraph::error::ReportError;
use formgraph::infrastructure::sqlite_store::SqliteEventStore;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn empty_store() -> Arc<SqliteEventStore> {
    let store = SqliteEventStore::open_in_memory().expect("open in-memory db");
    store.migrate().expect("migrate");
    Arc::new(store)
}

fn report_service(store: &Arc<SqliteEventStore>) -> ReportService {
    ReportService::new(store.clone(), store.clone(), store.clone())
}

fn request(form_ids: Vec<u64>, granularity: Granularity, start: NaiveDate, end: NaiveDate) -> ReportRequest {
    ReportRequest {
        form_ids,
        granularity,
        range: DateRange::new(start, end),
    }
}

// ============================================
// Daily report flow
// ============================================

#[tokio::test]
async fn test_daily_report_from_stored_rows() {
    let store = empty_store();
    store.upsert_form(1, "Contact", true).unwrap();
    store.upsert_form(2, "Signup", true).unwrap();

    // Two submissions on Jan 1 at different seconds, five on Jan 3.
    store.record_submission(1, at(2024, 1, 1, 9, 0, 0)).unwrap();
    store.record_submission(1, at(2024, 1, 1, 17, 30, 12)).unwrap();
    for s in 0..5 {
        store.record_submission(1, at(2024, 1, 3, 11, 0, s)).unwrap();
    }
    store.record_views(1, at(2024, 1, 1, 0, 0, 0), 4).unwrap();
    store.record_views(1, at(2024, 1, 3, 0, 0, 0), 10).unwrap();

    store.record_submission(2, at(2024, 1, 2, 8, 15, 0)).unwrap();

    let service = report_service(&store);
    let report = service
        .build_report(&request(
            vec![1, 2],
            Granularity::Daily,
            day(2024, 1, 1),
            day(2024, 1, 3),
        ))
        .await
        .expect("report should build");

    assert_eq!(
        report.labels,
        vec!["Jan 1, 2024", "Jan 2, 2024", "Jan 3, 2024"]
    );

    let contact = &report.forms[0];
    assert_eq!(contact.title, "Contact");
    assert_eq!(contact.data, vec![2, 0, 5]);
    assert_eq!(contact.stats.total, 7);
    assert_eq!(contact.stats.average, 2.3);
    assert_eq!(contact.stats.peak_count, 5);
    assert_eq!(contact.stats.peak_period, "Jan 3, 2024");

    let signup = &report.forms[1];
    assert_eq!(signup.data, vec![0, 1, 0]);

    let contact_conv = &report.conversion[0];
    assert_eq!(contact_conv.rates, vec![50.0, 0.0, 50.0]);
    assert_eq!(contact_conv.stats.total_views, 14);
    assert_eq!(contact_conv.stats.total_submissions, 7);
    assert_eq!(contact_conv.stats.conversion_rate, 50.0);

    assert_eq!(report.summary.grand_total, 8);
    assert_eq!(report.summary.overall_average, 2.7);
    assert_eq!(report.summary.peak_count, 5);
    assert_eq!(report.summary.peak_period, "Jan 3, 2024 (Contact)");
}

// ============================================
// Other granularities through the full stack
// ============================================

#[tokio::test]
async fn test_weekly_report_across_year_boundary() {
    let store = empty_store();
    store.upsert_form(1, "Newsletter", true).unwrap();

    store.record_submission(1, at(2024, 12, 24, 10, 0, 0)).unwrap();
    store.record_submission(1, at(2025, 1, 2, 9, 0, 0)).unwrap();
    store.record_submission(1, at(2025, 1, 3, 9, 0, 0)).unwrap();
    store.record_views(1, at(2024, 12, 23, 0, 0, 0), 10).unwrap();
    store.record_views(1, at(2024, 12, 30, 0, 0, 0), 4).unwrap();

    let service = report_service(&store);
    let report = service
        .build_report(&request(
            vec![1],
            Granularity::Weekly,
            day(2024, 12, 23),
            day(2025, 1, 5),
        ))
        .await
        .expect("report should build");

    assert_eq!(
        report.labels,
        vec!["Week of Dec 23, 2024", "Week of Dec 30, 2024"]
    );
    assert_eq!(report.forms[0].data, vec![1, 2]);
    assert_eq!(report.forms[0].stats.average, 1.5);
    assert_eq!(report.forms[0].stats.peak_period, "Week of Dec 30, 2024");

    assert_eq!(report.conversion[0].rates, vec![10.0, 50.0]);
    assert_eq!(report.conversion[0].stats.conversion_rate, 21.43);

    assert_eq!(
        report.summary.peak_period,
        "Week of Dec 30, 2024 (Newsletter)"
    );
}

#[tokio::test]
async fn test_hourly_report_buckets_sub_hour_timestamps() {
    let store = empty_store();
    store.upsert_form(1, "Contact", true).unwrap();

    store.record_submission(1, at(2024, 6, 1, 14, 30, 0)).unwrap();
    store.record_submission(1, at(2024, 6, 1, 14, 30, 0)).unwrap();
    store.record_submission(1, at(2024, 6, 1, 9, 15, 0)).unwrap();

    let service = report_service(&store);
    let report = service
        .build_report(&request(
            vec![1],
            Granularity::Hourly,
            day(2024, 6, 1),
            day(2024, 6, 2),
        ))
        .await
        .expect("report should build");

    // 24 buckets on June 1 plus the midnight bucket of June 2.
    assert_eq!(report.labels.len(), 25);
    assert_eq!(report.labels[14], "Jun 1, 2024 14:00");

    let data = &report.forms[0].data;
    assert_eq!(data.len(), 25);
    assert_eq!(data[9], 1);
    assert_eq!(data[14], 2);
    assert_eq!(data.iter().sum::<i64>(), 3);
    assert_eq!(report.forms[0].stats.peak_period, "Jun 1, 2024 14:00");
}

#[tokio::test]
async fn test_monthly_report_with_unknown_form_title() {
    let store = empty_store();
    // Entries exist but the form was never registered in the catalog.
    store.record_submission(9, at(2024, 1, 20, 12, 0, 0)).unwrap();
    store.record_submission(9, at(2024, 3, 2, 12, 0, 0)).unwrap();

    let service = report_service(&store);
    let report = service
        .build_report(&request(
            vec![9],
            Granularity::Monthly,
            day(2024, 1, 15),
            day(2024, 3, 15),
        ))
        .await
        .expect("report should build");

    assert_eq!(report.labels, vec!["Jan 2024", "Feb 2024", "Mar 2024"]);
    assert_eq!(report.forms[0].title, "Form 9");
    assert_eq!(report.forms[0].data, vec![1, 0, 1]);
}

// ============================================
// Failure paths
// ============================================

#[tokio::test]
async fn test_report_is_no_data_when_every_fetch_fails() {
    let store = empty_store();
    store.upsert_form(1, "Contact", true).unwrap();
    store
        .connection()
        .execute_batch("DROP TABLE entries")
        .unwrap();

    let service = report_service(&store);
    let err = service
        .build_report(&request(
            vec![1],
            Granularity::Daily,
            day(2024, 1, 1),
            day(2024, 1, 3),
        ))
        .await
        .expect_err("no form could be fetched");
    assert!(matches!(err, ReportError::NoData));
}

#[tokio::test]
async fn test_form_with_no_rows_still_reports_zeroes() {
    let store = empty_store();
    store.upsert_form(1, "Quiet", true).unwrap();

    let service = report_service(&store);
    let report = service
        .build_report(&request(
            vec![1],
            Granularity::Daily,
            day(2024, 1, 1),
            day(2024, 1, 3),
        ))
        .await
        .expect("an empty table is not a failure");

    assert_eq!(report.forms[0].data, vec![0, 0, 0]);
    assert_eq!(report.summary.grand_total, 0);
}

// ============================================
// Catalog and persistence
// ============================================

#[tokio::test]
async fn test_forms_listing_through_the_service() {
    let store = empty_store();
    store.upsert_form(2, "Signup", true).unwrap();
    store.upsert_form(1, "Contact", true).unwrap();
    store.upsert_form(3, "Retired", false).unwrap();

    let service = FormsService::new(store.clone());
    let forms = service.list_forms().await.expect("list forms");
    assert_eq!(
        forms,
        vec![
            Form::new(1, "Contact".to_string()),
            Form::new(2, "Signup".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_rows_survive_reopening_the_database() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("reports.db");

    {
        let store = SqliteEventStore::open(&db_path).expect("open db");
        store.migrate().expect("migrate");
        store.upsert_form(1, "Contact", true).unwrap();
        store.record_submission(1, at(2024, 1, 1, 9, 0, 0)).unwrap();
    }

    let store = SqliteEventStore::open(&db_path).expect("reopen db");
    store.migrate().expect("migrate is idempotent");
    let rows = store
        .fetch_submissions(1, &DateRange::new(day(2024, 1, 1), day(2024, 1, 1)))
        .await
        .expect("fetch");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].count, 1);
}
