//! API Error Taxonomy
//! Mission: Map every failure onto a uniform JSON body and status code

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

/// Typed failures raised by handlers and translated at the HTTP boundary.
///
/// Every variant renders as `{"success": false, "message": "..."}` with the
/// matching status code. Unexpected store failures collapse into `Internal`
/// and never leak details to the client.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed input (400)
    Validation(String),
    /// Duplicate unique field (400, matching the original wire behavior)
    Conflict(String),
    /// Missing, invalid, or expired credential (401)
    Unauthenticated,
    /// Unknown username or wrong password at login (401); one message for
    /// both so the endpoint does not reveal which usernames exist
    InvalidCredentials,
    /// Authenticated but role not acceptable (403)
    Forbidden(String),
    /// Referenced entity does not exist (404)
    NotFound(String),
    /// Catch-all for unexpected failures (500)
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "Not authorized to access this route".to_string(),
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid username or password".to_string(),
            ),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(err) => {
                error!("Internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Uniform success envelope: `{success, message?, count?, data?}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: &str, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            count: None,
            data: Some(data),
        }
    }

    /// Success envelope with `success: false`, used for soft outcomes like
    /// "already enrolled" that are not hard failures.
    pub fn soft_failure(message: &str) -> Self {
        Self {
            success: false,
            message: Some(message.to_string()),
            count: None,
            data: None,
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    pub fn list(message: &str, data: Vec<T>) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            count: Some(data.len()),
            data: Some(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ApiError::Validation("bad".into()).into_response(),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Conflict("dup".into()).into_response(),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Unauthenticated.into_response(),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ApiError::InvalidCredentials.into_response(),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ApiError::Forbidden("no".into()).into_response(),
                StatusCode::FORBIDDEN,
            ),
            (
                ApiError::NotFound("gone".into()).into_response(),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::Internal(anyhow::anyhow!("boom")).into_response(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (response, expected) in cases {
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_envelope_skips_empty_fields() {
        let body = ApiResponse::ok("done", json!({"x": 1}));
        let serialized = serde_json::to_value(&body).unwrap();
        assert_eq!(serialized["success"], true);
        assert!(serialized.get("count").is_none());

        let soft = ApiResponse::<serde_json::Value>::soft_failure("already there");
        let serialized = serde_json::to_value(&soft).unwrap();
        assert_eq!(serialized["success"], false);
        assert!(serialized.get("data").is_none());
    }

    #[test]
    fn test_list_envelope_carries_count() {
        let body = ApiResponse::list("found", vec![1, 2, 3]);
        let serialized = serde_json::to_value(&body).unwrap();
        assert_eq!(serialized["count"], 3);
    }
}
