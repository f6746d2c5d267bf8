//! Error rendering
//!
//! RFC 7807 problem details for [`AppError`], and the axum response
//! conversion built on it (feature-gated).

use super::app_error::AppError;

impl AppError {
    /// Problem Details body (RFC 7807)
    pub fn to_problem(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "about:blank",
            "title": self.kind().as_str(),
            "status": self.status_code(),
            "detail": self.message(),
            "action": self.action(),
            "operation": self.operation(),
            "retryable": self.kind().is_transient(),
        })
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::{StatusCode, header};

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (
            status,
            [(header::CONTENT_TYPE, "application/problem+json")],
            Json(self.to_problem()),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::kind::ErrorKind;

    #[test]
    fn test_problem_body() {
        let problem = AppError::new(ErrorKind::BadGateway, "Request failed")
            .with_operation("get_tickets")
            .to_problem();

        assert_eq!(problem["status"], 502);
        assert_eq!(problem["title"], "Bad Gateway");
        assert_eq!(problem["operation"], "get_tickets");
        assert_eq!(problem["retryable"], true);
        assert!(problem["action"].is_null());
    }

    #[cfg(feature = "axum")]
    #[test]
    fn test_into_response_status() {
        use axum::response::IntoResponse;

        let response = AppError::new(ErrorKind::Forbidden, "Login was cancelled").into_response();
        assert_eq!(response.status().as_u16(), 403);
        assert_eq!(
            response.headers()["content-type"],
            "application/problem+json"
        );
    }
}
