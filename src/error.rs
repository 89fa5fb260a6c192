// Error types for report generation
use thiserror::Error;

/// Failures surfaced to callers of the report engine.
///
/// Per-form data-source failures never appear here; the report builder
/// absorbs them by dropping or degrading the affected form. See
/// [`DataSourceError`].
#[derive(Debug, Error)]
pub enum ReportError {
    /// The request was rejected before any aggregation ran.
    #[error("{0}")]
    InvalidRequest(String),

    /// Every selected form was dropped, so there is nothing to chart.
    #[error("No data available for the selected forms and date range")]
    NoData,

    /// A built series no longer lines up with its axis. This is a bug in
    /// the builder, not a retryable condition.
    #[error("computation failed: {0}")]
    Computation(String),
}

impl ReportError {
    /// Stable machine-readable kind used in the error envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            ReportError::InvalidRequest(_) => "invalid_request",
            ReportError::NoData => "no_data",
            ReportError::Computation(_) => "computation",
        }
    }
}

/// A data-source failure scoped to a single form. The batch keeps going;
/// only the affected form is dropped from the report.
#[derive(Debug, Error)]
#[error("form {form_id}: {source}")]
pub struct DataSourceError {
    pub form_id: u64,
    #[source]
    pub source: anyhow::Error,
}

pub type Result<T> = std::result::Result<T, ReportError>;
