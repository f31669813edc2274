//! Catalog Module
//! Mission: Categories and courses with their persistence and handlers

pub mod api;
pub mod category_store;
pub mod course_store;
pub mod models;

pub use api::CatalogState;
pub use category_store::CategoryStore;
pub use course_store::CourseStore;
