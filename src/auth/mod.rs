//! Authentication Module
//! Mission: Credential issuance, verification, and role-gated access

pub mod api;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod user_store;

pub use api::AuthState;
pub use jwt::JwtHandler;
pub use middleware::{auth_gate, require_role, STAFF_ROLES};
pub use user_store::UserStore;
