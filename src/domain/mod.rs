// Domain layer - pure report aggregation logic
pub mod conversion;
pub mod form;
pub mod period;
pub mod report;
pub mod series;
