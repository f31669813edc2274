//! CourseHub - Online Courses Catalog Backend
//! Mission: Registration, login, catalog CRUD, and category enrollment

use anyhow::{Context, Result};
use coursehub_backend::{
    api::create_router,
    auth::{AuthState, JwtHandler, UserStore},
    catalog::{CatalogState, CategoryStore, CourseStore},
    config::AppConfig,
    enroll::{EnrollState, EnrollmentCoordinator},
};
use dotenv::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    info!("🚀 CourseHub backend starting");

    let user_store = Arc::new(UserStore::new(&config.database_path)?);
    let category_store = Arc::new(CategoryStore::new(&config.database_path)?);
    let course_store = Arc::new(CourseStore::new(&config.database_path)?);

    info!("💾 Stores initialized at: {}", config.database_path);

    let jwt_handler = Arc::new(JwtHandler::new(
        config.jwt_secret.clone(),
        config.token_ttl_hours,
    ));

    let auth_state = AuthState::new(
        user_store.clone(),
        jwt_handler,
        config.bootstrap_admin.clone(),
    );
    let catalog_state = CatalogState {
        categories: category_store.clone(),
        courses: course_store,
    };
    let enroll_state = EnrollState {
        coordinator: Arc::new(EnrollmentCoordinator::new(user_store, category_store)),
    };

    let app = create_router(auth_state, catalog_state, enroll_state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("🎯 API server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coursehub_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
