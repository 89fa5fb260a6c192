// Report service - Use case for building multi-form submission reports
use crate::application::sources::{FormCatalog, SubmissionSource, ViewSource};
use crate::domain::conversion;
use crate::domain::form::Form;
use crate::domain::period::{self, DateRange, Granularity, PeriodAxis};
use crate::domain::report::{self, FormConversion, FormSeries, FormsReport};
use crate::domain::series;
use crate::error::{DataSourceError, ReportError};
use futures::future::join_all;
use std::sync::Arc;

/// A validated report request. Constructed once at the transport boundary
/// and passed by reference into the engine.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub form_ids: Vec<u64>,
    pub granularity: Granularity,
    pub range: DateRange,
}

#[derive(Clone)]
pub struct ReportService {
    submissions: Arc<dyn SubmissionSource>,
    views: Arc<dyn ViewSource>,
    catalog: Arc<dyn FormCatalog>,
}

impl ReportService {
    pub fn new(
        submissions: Arc<dyn SubmissionSource>,
        views: Arc<dyn ViewSource>,
        catalog: Arc<dyn FormCatalog>,
    ) -> Self {
        Self {
            submissions,
            views,
            catalog,
        }
    }

    /// Build the full multi-form report for a request.
    ///
    /// Forms are fetched concurrently but reassembled in request order. A
    /// form whose submission fetch fails is dropped from the report; a
    /// failing view fetch degrades that form to an all-zero view series; a
    /// failing title lookup falls back to a synthetic title. Only when every
    /// form was dropped does the whole request fail.
    pub async fn build_report(&self, request: &ReportRequest) -> Result<FormsReport, ReportError> {
        if request.form_ids.is_empty() {
            return Err(ReportError::InvalidRequest(
                "Please select a form".to_string(),
            ));
        }

        let axis = period::build_axis(request.granularity, &request.range);
        tracing::debug!(
            forms = request.form_ids.len(),
            granularity = request.granularity.as_str(),
            periods = axis.len(),
            "building report"
        );

        let results = join_all(
            request
                .form_ids
                .iter()
                .map(|&form_id| self.form_entry(form_id, &axis, &request.range)),
        )
        .await;

        let mut forms = Vec::new();
        let mut conversion = Vec::new();
        for result in results {
            match result {
                Ok((form, rates)) => {
                    forms.push(form);
                    conversion.push(rates);
                }
                Err(e) => {
                    tracing::warn!(form_id = e.form_id, error = %e, "dropping form from report");
                }
            }
        }

        if forms.is_empty() {
            return Err(ReportError::NoData);
        }

        for form in &forms {
            if form.data.len() != axis.len() {
                return Err(ReportError::Computation(format!(
                    "series for form {} has {} values for {} periods",
                    form.form_id,
                    form.data.len(),
                    axis.len()
                )));
            }
        }

        let summary = report::reduce_summary(&forms);
        Ok(FormsReport {
            labels: axis.labels(),
            forms,
            conversion,
            summary,
        })
    }

    /// Fetch, densify, and convert one form. A submission failure aborts
    /// this form only; view and title failures degrade.
    async fn form_entry(
        &self,
        form_id: u64,
        axis: &PeriodAxis,
        range: &DateRange,
    ) -> Result<(FormSeries, FormConversion), DataSourceError> {
        let submissions = self
            .submissions
            .fetch_submissions(form_id, range)
            .await
            .map_err(|source| DataSourceError { form_id, source })?;

        let views = match self.views.fetch_views(form_id, range).await {
            Ok(views) => views,
            Err(e) => {
                tracing::warn!(form_id, error = %e, "view fetch failed, using zero view series");
                Vec::new()
            }
        };

        let title = match self.catalog.resolve_title(form_id).await {
            Ok(title) => title,
            Err(e) => {
                tracing::warn!(form_id, error = %e, "title lookup failed, using fallback");
                Form::fallback_title(form_id)
            }
        };

        let data = series::densify(&submissions, axis);
        let stats = series::compute_stats(&data, axis);
        let view_series = series::densify(&views, axis);
        let (rates, conversion_stats) = conversion::compute_conversion(&data, &view_series);

        Ok((
            FormSeries {
                form_id,
                title: title.clone(),
                data,
                stats,
            },
            FormConversion {
                form_id,
                title,
                rates,
                stats: conversion_stats,
            },
        ))
    }
}
