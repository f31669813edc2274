//! Enrollment API Endpoint
//! Mission: Expose the enrollment coordinator over HTTP

use crate::auth::models::UserResponse;
use crate::catalog::models::Category;
use crate::enroll::coordinator::{EnrollError, EnrollmentCoordinator, EnrollmentOutcome};
use crate::error::{ApiError, ApiResponse};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Shared enrollment state
#[derive(Clone)]
pub struct EnrollState {
    pub coordinator: Arc<EnrollmentCoordinator>,
}

/// Enrollment request body
#[derive(Debug, Deserialize)]
pub struct EnrollRequest {
    #[serde(alias = "userId")]
    pub user_id: String,
    #[serde(alias = "categoryId")]
    pub category_id: String,
}

/// Enrollment response data: the refreshed pair of linked records.
#[derive(Debug, Serialize)]
pub struct EnrollmentData {
    pub user: UserResponse,
    pub category: Category,
}

/// POST /api/v1/enroll/create
///
/// 200 with `success: true` on a fresh (or repaired) enrollment, 200 with
/// `success: false` when the pair is already linked, 404 when either id is
/// unknown.
pub async fn enroll_to_category(
    State(state): State<EnrollState>,
    Json(payload): Json<EnrollRequest>,
) -> Result<Json<ApiResponse<EnrollmentData>>, ApiError> {
    let user_id = Uuid::parse_str(&payload.user_id)
        .map_err(|_| ApiError::Validation("Invalid user id format".into()))?;
    let category_id = Uuid::parse_str(&payload.category_id)
        .map_err(|_| ApiError::Validation("Invalid category id format".into()))?;

    match state.coordinator.enroll(&user_id, &category_id) {
        Ok(EnrollmentOutcome::Enrolled { user, category }) => Ok(Json(ApiResponse::ok(
            "User enrolled to category successfully",
            EnrollmentData {
                user: UserResponse::from_user(&user),
                category,
            },
        ))),
        Ok(EnrollmentOutcome::AlreadyEnrolled) => Ok(Json(ApiResponse::soft_failure(
            "User already enrolled in this category",
        ))),
        Err(EnrollError::NotFound) => {
            Err(ApiError::NotFound("User or Category not found".into()))
        }
        Err(EnrollError::Inconsistent(detail)) => {
            Err(ApiError::Internal(anyhow::anyhow!(
                "partial enrollment failure: {}",
                detail
            )))
        }
        Err(EnrollError::Store(err)) => Err(ApiError::Internal(err)),
    }
}
