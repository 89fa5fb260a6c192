// JSON error envelope for the report API
use crate::error::ReportError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Map a report failure to its HTTP status and the `{error, message}`
/// envelope the chart frontend understands.
pub fn error_response(err: &ReportError) -> Response {
    let status = match err {
        ReportError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        ReportError::NoData => StatusCode::NOT_FOUND,
        ReportError::Computation(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let body = Json(json!({
        "error": err.kind(),
        "message": err.to_string(),
    }));
    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let invalid = error_response(&ReportError::InvalidRequest("bad".to_string()));
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let no_data = error_response(&ReportError::NoData);
        assert_eq!(no_data.status(), StatusCode::NOT_FOUND);

        let computation = error_response(&ReportError::Computation("bug".to_string()));
        assert_eq!(computation.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
