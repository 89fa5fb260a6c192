// Source traits for report data access
use crate::domain::form::Form;
use crate::domain::period::DateRange;
use crate::domain::series::RawObservation;
use async_trait::async_trait;

#[async_trait]
pub trait SubmissionSource: Send + Sync {
    /// Submission events for one form within a date range. Rows may arrive
    /// at any sub-bucket resolution; the report builder densifies them.
    async fn fetch_submissions(
        &self,
        form_id: u64,
        range: &DateRange,
    ) -> anyhow::Result<Vec<RawObservation>>;
}

#[async_trait]
pub trait ViewSource: Send + Sync {
    /// View events for one form within a date range. No rows means no
    /// tracked views and is an empty Ok, not an error.
    async fn fetch_views(
        &self,
        form_id: u64,
        range: &DateRange,
    ) -> anyhow::Result<Vec<RawObservation>>;
}

#[async_trait]
pub trait FormCatalog: Send + Sync {
    /// Display title for a form. Err when the form is unknown.
    async fn resolve_title(&self, form_id: u64) -> anyhow::Result<String>;

    /// All active forms, for the report selector.
    async fn list_forms(&self) -> anyhow::Result<Vec<Form>>;
}
