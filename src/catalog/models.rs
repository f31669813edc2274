//! Catalog Models
//! Mission: Define category and course records

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Course category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub title: String,
    /// Ids of the users enrolled in this category, insertion-ordered, no
    /// duplicates. Mirror of `User::categories`; both sides are maintained
    /// only by the enrollment coordinator.
    pub users: Vec<Uuid>,
}

/// Course record. `category` is a label referencing a category title,
/// which must exist at create/update time. `image` and `video_url` are
/// plain references supplied by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub category: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub video_url: String,
    pub part: String,
    pub price: f64,
    pub rating: f64,
    pub created_at: String,
}

/// Category create/update request body
#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub title: String,
}

/// Course creation request body
#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub category: String,
    pub title: String,
    pub description: String,
    pub image: String,
    #[serde(alias = "videoUrl")]
    pub video_url: String,
    pub part: String,
    pub price: Option<f64>,
    pub rating: Option<f64>,
}

/// Course update request body; absent fields keep their stored values.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCourseRequest {
    pub category: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    #[serde(alias = "videoUrl")]
    pub video_url: Option<String>,
    pub part: Option<String>,
    pub price: Option<f64>,
    pub rating: Option<f64>,
}
