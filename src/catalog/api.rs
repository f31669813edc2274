//! Catalog API Endpoints
//! Mission: CRUD handlers for categories and courses

use crate::catalog::{
    category_store::CategoryStore,
    course_store::CourseStore,
    models::{Category, CategoryRequest, Course, CreateCourseRequest, UpdateCourseRequest},
};
use crate::error::{ApiError, ApiResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

/// Shared catalog state
#[derive(Clone)]
pub struct CatalogState {
    pub categories: Arc<CategoryStore>,
    pub courses: Arc<CourseStore>,
}

fn parse_id(raw: &str, entity: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::Validation(format!("Invalid {} id format", entity)))
}

// ===== Categories =====

/// GET /api/v1/category/all
pub async fn get_all_categories(
    State(state): State<CatalogState>,
) -> Result<Json<ApiResponse<Vec<Category>>>, ApiError> {
    let categories = state.categories.list()?;
    Ok(Json(ApiResponse::list(
        "Categories found successfully",
        categories,
    )))
}

/// GET /api/v1/category/:id
pub async fn get_category(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Category>>, ApiError> {
    let id = parse_id(&id, "category")?;
    let category = state
        .categories
        .get_by_id(&id)?
        .ok_or_else(|| ApiError::NotFound(format!("Category not found with id of {}", id)))?;

    Ok(Json(ApiResponse::ok("Category found successfully", category)))
}

/// POST /api/v1/category/create
pub async fn create_category(
    State(state): State<CatalogState>,
    Json(payload): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Category>>), ApiError> {
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(ApiError::Validation("Please provide a title".into()));
    }

    if state.categories.get_by_title(title)?.is_some() {
        return Err(ApiError::Conflict(
            "Category with this title already exists".into(),
        ));
    }

    let category = state.categories.create(title)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Category created successfully", category)),
    ))
}

/// PUT /api/v1/category/update/:id
pub async fn update_category(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryRequest>,
) -> Result<Json<ApiResponse<Category>>, ApiError> {
    let id = parse_id(&id, "category")?;
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(ApiError::Validation("Please provide a title".into()));
    }

    // Duplicate-title check excluding the category being updated.
    if let Some(existing) = state.categories.get_by_title(title)? {
        if existing.id != id {
            return Err(ApiError::Conflict(
                "Category with this title already exists".into(),
            ));
        }
    }

    let category = state
        .categories
        .update_title(&id, title)?
        .ok_or_else(|| ApiError::NotFound(format!("Category not found with id of {}", id)))?;

    Ok(Json(ApiResponse::ok("Category updated successfully", category)))
}

/// DELETE /api/v1/category/delete/:id
pub async fn delete_category(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let id = parse_id(&id, "category")?;
    if !state.categories.delete(&id)? {
        return Err(ApiError::NotFound(format!(
            "Category not found with id of {}",
            id
        )));
    }

    Ok(Json(ApiResponse::ok(
        "Category deleted successfully",
        serde_json::json!({}),
    )))
}

// ===== Courses =====

/// GET /api/v1/course/all
pub async fn get_all_courses(
    State(state): State<CatalogState>,
) -> Result<Json<ApiResponse<Vec<Course>>>, ApiError> {
    let courses = state.courses.list()?;
    Ok(Json(ApiResponse::list("Courses found successfully", courses)))
}

/// GET /api/v1/course/:id
pub async fn get_course(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Course>>, ApiError> {
    let id = parse_id(&id, "course")?;
    let course = state
        .courses
        .get_by_id(&id)?
        .ok_or_else(|| ApiError::NotFound(format!("Course not found with id of {}", id)))?;

    Ok(Json(ApiResponse::ok("Course found successfully", course)))
}

/// POST /api/v1/course/create
pub async fn create_course(
    State(state): State<CatalogState>,
    Json(payload): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Course>>), ApiError> {
    if payload.category.trim().is_empty()
        || payload.title.trim().is_empty()
        || payload.description.trim().is_empty()
        || payload.image.trim().is_empty()
        || payload.video_url.trim().is_empty()
        || payload.part.trim().is_empty()
    {
        return Err(ApiError::Validation(
            "Please provide all required fields".into(),
        ));
    }

    ensure_category_exists(&state, &payload.category)?;

    if state.courses.get_by_title(&payload.title)?.is_some() {
        return Err(ApiError::Conflict(
            "Course with this title already exists".into(),
        ));
    }

    let course = state.courses.create(&payload)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Course created successfully", course)),
    ))
}

/// PUT /api/v1/course/update/:id
pub async fn update_course(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCourseRequest>,
) -> Result<Json<ApiResponse<Course>>, ApiError> {
    let id = parse_id(&id, "course")?;

    if let Some(category) = &payload.category {
        ensure_category_exists(&state, category)?;
    }

    let course = state
        .courses
        .update(&id, &payload)?
        .ok_or_else(|| ApiError::NotFound(format!("Course not found with id of {}", id)))?;

    Ok(Json(ApiResponse::ok("Course updated successfully", course)))
}

/// DELETE /api/v1/course/delete/:id
pub async fn delete_course(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let id = parse_id(&id, "course")?;
    if !state.courses.delete(&id)? {
        return Err(ApiError::NotFound(format!(
            "Course not found with id of {}",
            id
        )));
    }

    Ok(Json(ApiResponse::ok(
        "Course deleted successfully",
        serde_json::json!({}),
    )))
}

fn ensure_category_exists(state: &CatalogState, category: &str) -> Result<(), ApiError> {
    if state.categories.get_by_title(category)?.is_none() {
        return Err(ApiError::Validation(format!(
            "Category '{}' does not exist. Please create the category first.",
            category
        )));
    }
    Ok(())
}
