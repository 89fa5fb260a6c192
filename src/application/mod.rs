// Application layer - report use cases over injected sources
pub mod forms_service;
pub mod report_service;
pub mod sources;
