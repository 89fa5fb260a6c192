// HTTP request handlers
use crate::application::report_service::ReportRequest;
use crate::domain::form::Form;
use crate::domain::period::{DateRange, Granularity};
use crate::error::{ReportError, Result};
use crate::presentation::app_state::AppState;
use crate::presentation::responses::error_response;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub form_ids: Option<String>,
    pub grouping: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List active forms for the report selector
pub async fn list_forms(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.forms_service.list_forms().await {
        Ok(forms) => Json(forms).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "form listing failed");
            // The selector degrades to an empty list rather than erroring.
            Json(Vec::<Form>::new()).into_response()
        }
    }
}

/// Build a multi-form submission report
pub async fn get_report(
    Query(query): Query<ReportQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let request = match parse_report_query(&query) {
        Ok(request) => request,
        Err(e) => return error_response(&e),
    };

    match state.report_service.build_report(&request).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Validate the raw query into a [`ReportRequest`].
///
/// Form id tokens that are not positive integers are dropped and duplicates
/// keep their first position; an unknown grouping falls back to daily; both
/// dates are required and must parse as `YYYY-MM-DD`.
fn parse_report_query(query: &ReportQuery) -> Result<ReportRequest> {
    let form_ids = parse_form_ids(query.form_ids.as_deref().unwrap_or(""));
    if form_ids.is_empty() {
        return Err(ReportError::InvalidRequest(
            "Please select a form".to_string(),
        ));
    }

    let granularity = query
        .grouping
        .as_deref()
        .and_then(Granularity::parse)
        .unwrap_or_default();

    let start = parse_date(query.start_date.as_deref());
    let end = parse_date(query.end_date.as_deref());
    let (start, end) = match (start, end) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            return Err(ReportError::InvalidRequest(
                "Invalid date range".to_string(),
            ));
        }
    };

    Ok(ReportRequest {
        form_ids,
        granularity,
        range: DateRange::new(start, end),
    })
}

fn parse_form_ids(raw: &str) -> Vec<u64> {
    let mut ids = Vec::new();
    for token in raw.split(',') {
        if let Ok(id) = token.trim().parse::<u64>() {
            if id > 0 && !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}

fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw?.trim(), "%Y-%m-%d").ok()
}
