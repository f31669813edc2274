//! HTTP API Module

pub mod routes;

pub use routes::create_router;
