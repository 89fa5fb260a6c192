// Presentation layer - HTTP surface of the report engine
pub mod app_state;
pub mod handlers;
pub mod responses;
