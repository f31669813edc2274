//! Authentication Models
//! Mission: Define user, role, and token claim data structures

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub role: UserRole,
    /// Ids of the categories this user is enrolled in, insertion-ordered,
    /// no duplicates. The mirror side lives on `Category::users`; both are
    /// maintained only by the enrollment coordinator.
    pub categories: Vec<Uuid>,
    pub balance: f64,
    pub is_active: bool,
    pub api_key: String,
    pub created_at: String,
}

/// User roles for RBAC
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UserRole {
    #[serde(rename = "user")]
    User, // Default role, can browse and enroll
    #[serde(rename = "teacher")]
    Teacher, // Manages categories and courses
    #[serde(rename = "admin")]
    Admin, // Full access
}

impl UserRole {
    pub fn as_str(&self) -> &str {
        match self {
            UserRole::User => "user",
            UserRole::Teacher => "teacher",
            UserRole::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user" => Some(UserRole::User),
            "teacher" => Some(UserRole::Teacher),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

/// JWT Claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // subject (user id)
    pub role: UserRole,
    pub iat: usize, // issued-at timestamp
    pub exp: usize, // expiration timestamp
}

/// Registration request body
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(alias = "confirmPassword")]
    pub confirm_password: String,
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// User payload returned on register/login (sanitized, no hash)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub categories: Vec<Uuid>,
    pub balance: f64,
    pub is_active: bool,
    pub api_key: String,
    pub created_at: String,
}

impl UserResponse {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            categories: user.categories.clone(),
            balance: user.balance,
            is_active: user.is_active,
            api_key: user.api_key.clone(),
            created_at: user.created_at.clone(),
        }
    }
}

/// Login response data
#[derive(Debug, Serialize)]
pub struct LoginData {
    pub user: UserResponse,
    pub token: String,
    pub expires_in: usize, // seconds until expiration
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_serialization() {
        let admin = UserRole::Admin;
        let json = serde_json::to_string(&admin).unwrap();
        assert_eq!(json, r#""admin""#);

        let teacher: UserRole = serde_json::from_str(r#""teacher""#).unwrap();
        assert_eq!(teacher, UserRole::Teacher);
    }

    #[test]
    fn test_user_role_string_conversion() {
        assert_eq!(UserRole::Admin.as_str(), "admin");
        assert_eq!(UserRole::Teacher.as_str(), "teacher");
        assert_eq!(UserRole::User.as_str(), "user");

        assert_eq!(UserRole::from_str("admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::from_str("TEACHER"), Some(UserRole::Teacher));
        assert_eq!(UserRole::from_str("invalid"), None);
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            username: "tester1".to_string(),
            email: "tester1@example.com".to_string(),
            password_hash: "secret-hash".to_string(),
            role: UserRole::User,
            categories: vec![],
            balance: 0.0,
            is_active: true,
            api_key: Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("password_hash"));
    }

    #[test]
    fn test_register_request_accepts_camel_case_confirm() {
        let body = r#"{
            "username": "alice1",
            "email": "alice1@x.com",
            "password": "pass1",
            "confirmPassword": "pass1"
        }"#;
        let req: RegisterRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.confirm_password, "pass1");
    }
}
