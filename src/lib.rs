//! CourseHub Backend Library
//!
//! Exposes core modules for use by the server binary and tests.

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod enroll;
pub mod error;
