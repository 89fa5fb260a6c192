// Application state for HTTP handlers
use crate::application::forms_service::FormsService;
use crate::application::report_service::ReportService;

#[derive(Clone)]
pub struct AppState {
    pub forms_service: FormsService,
    pub report_service: ReportService,
}
