//! API Router
//! Mission: Wire handlers, gates, and shared state into one router

use crate::auth::{api as auth_api, auth_gate, require_role, AuthState, STAFF_ROLES};
use crate::catalog::{api as catalog_api, CatalogState};
use crate::enroll::{api as enroll_api, EnrollState};
use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;

/// Create the API router.
///
/// Gates compose outside-in: the auth gate resolves the live user first,
/// then the role gate checks membership in the acceptable-role set. Staff
/// routes accept admin OR teacher through the single parameterized gate.
pub fn create_router(
    auth_state: AuthState,
    catalog_state: CatalogState,
    enroll_state: EnrollState,
) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/auth/register", post(auth_api::register))
        .route("/api/v1/auth/login", post(auth_api::login))
        .with_state(auth_state.clone());

    // Courses are publicly readable.
    let public_catalog = Router::new()
        .route("/api/v1/course/all", get(catalog_api::get_all_courses))
        .route("/api/v1/course/:id", get(catalog_api::get_course))
        .with_state(catalog_state.clone());

    let protected_catalog = Router::new()
        .route("/api/v1/category/all", get(catalog_api::get_all_categories))
        .route("/api/v1/category/:id", get(catalog_api::get_category))
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_gate,
        ))
        .with_state(catalog_state.clone());

    let staff_catalog = Router::new()
        .route(
            "/api/v1/category/create",
            post(catalog_api::create_category),
        )
        .route(
            "/api/v1/category/update/:id",
            put(catalog_api::update_category),
        )
        .route(
            "/api/v1/category/delete/:id",
            delete(catalog_api::delete_category),
        )
        .route("/api/v1/course/create", post(catalog_api::create_course))
        .route("/api/v1/course/update/:id", put(catalog_api::update_course))
        .route(
            "/api/v1/course/delete/:id",
            delete(catalog_api::delete_course),
        )
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            require_role(STAFF_ROLES, req, next)
        }))
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_gate,
        ))
        .with_state(catalog_state);

    let protected_enroll = Router::new()
        .route("/api/v1/enroll/create", post(enroll_api::enroll_to_category))
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_gate,
        ))
        .with_state(enroll_state);

    let protected_auth = Router::new()
        .route("/api/v1/auth/logout", post(auth_api::logout))
        .route_layer(middleware::from_fn_with_state(auth_state, auth_gate));

    Router::new()
        .merge(public_routes)
        .merge(public_catalog)
        .merge(protected_catalog)
        .merge(staff_catalog)
        .merge(protected_enroll)
        .merge(protected_auth)
        .layer(CorsLayer::permissive())
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}
