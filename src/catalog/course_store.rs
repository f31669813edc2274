//! Course Storage
//! Mission: Persist courses with SQLite

use crate::auth::user_store::parse_uuid;
use crate::catalog::models::{Course, CreateCourseRequest, UpdateCourseRequest};
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, Row};
use tracing::info;
use uuid::Uuid;

const COURSE_COLUMNS: &str =
    "id, category, title, description, image, video_url, part, price, rating, created_at";

/// Course storage with SQLite backend
pub struct CourseStore {
    db_path: String,
}

impl CourseStore {
    pub fn new(db_path: &str) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS courses (
                id TEXT PRIMARY KEY,
                category TEXT NOT NULL,
                title TEXT UNIQUE NOT NULL,
                description TEXT NOT NULL,
                image TEXT NOT NULL,
                video_url TEXT NOT NULL,
                part TEXT NOT NULL,
                price REAL NOT NULL DEFAULT 0,
                rating REAL NOT NULL DEFAULT 5,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    pub fn create(&self, req: &CreateCourseRequest) -> Result<Course> {
        let course = Course {
            id: Uuid::new_v4(),
            category: req.category.clone(),
            title: req.title.clone(),
            description: req.description.clone(),
            image: req.image.clone(),
            video_url: req.video_url.clone(),
            part: req.part.clone(),
            price: req.price.unwrap_or(0.0),
            rating: req.rating.unwrap_or(5.0),
            created_at: Utc::now().to_rfc3339(),
        };

        let conn = Connection::open(&self.db_path)?;
        conn.execute(
            "INSERT INTO courses (id, category, title, description, image, video_url, part, price, rating, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                course.id.to_string(),
                course.category,
                course.title,
                course.description,
                course.image,
                course.video_url,
                course.part,
                course.price,
                course.rating,
                course.created_at,
            ],
        )
        .context("Failed to insert course")?;

        info!("Created course: {} ({})", course.title, course.category);

        Ok(course)
    }

    pub fn get_by_id(&self, id: &Uuid) -> Result<Option<Course>> {
        let conn = Connection::open(&self.db_path)?;
        let mut stmt =
            conn.prepare(&format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = ?1"))?;

        let result = stmt.query_row(params![id.to_string()], row_to_course);
        match result {
            Ok(course) => Ok(Some(course)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_by_title(&self, title: &str) -> Result<Option<Course>> {
        let conn = Connection::open(&self.db_path)?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE title = ?1"
        ))?;

        let result = stmt.query_row(params![title], row_to_course);
        match result {
            Ok(course) => Ok(Some(course)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list(&self) -> Result<Vec<Course>> {
        let conn = Connection::open(&self.db_path)?;
        let mut stmt = conn.prepare(&format!("SELECT {COURSE_COLUMNS} FROM courses"))?;

        let courses = stmt
            .query_map([], row_to_course)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(courses)
    }

    /// Partial update: absent fields keep their stored values. Returns the
    /// refreshed record, or `None` if the id does not exist.
    pub fn update(&self, id: &Uuid, req: &UpdateCourseRequest) -> Result<Option<Course>> {
        let Some(current) = self.get_by_id(id)? else {
            return Ok(None);
        };

        let merged = Course {
            id: current.id,
            category: req.category.clone().unwrap_or(current.category),
            title: req.title.clone().unwrap_or(current.title),
            description: req.description.clone().unwrap_or(current.description),
            image: req.image.clone().unwrap_or(current.image),
            video_url: req.video_url.clone().unwrap_or(current.video_url),
            part: req.part.clone().unwrap_or(current.part),
            price: req.price.unwrap_or(current.price),
            rating: req.rating.unwrap_or(current.rating),
            created_at: current.created_at,
        };

        let conn = Connection::open(&self.db_path)?;
        conn.execute(
            "UPDATE courses SET category = ?1, title = ?2, description = ?3, image = ?4,
             video_url = ?5, part = ?6, price = ?7, rating = ?8 WHERE id = ?9",
            params![
                merged.category,
                merged.title,
                merged.description,
                merged.image,
                merged.video_url,
                merged.part,
                merged.price,
                merged.rating,
                merged.id.to_string(),
            ],
        )
        .context("Failed to update course")?;

        Ok(Some(merged))
    }

    /// Delete a course. Returns `false` if the id does not exist.
    pub fn delete(&self, id: &Uuid) -> Result<bool> {
        let conn = Connection::open(&self.db_path)?;
        let rows = conn.execute("DELETE FROM courses WHERE id = ?1", params![id.to_string()])?;

        if rows > 0 {
            info!("Deleted course: {}", id);
        }
        Ok(rows > 0)
    }
}

fn row_to_course(row: &Row<'_>) -> rusqlite::Result<Course> {
    let id: String = row.get(0)?;

    Ok(Course {
        id: parse_uuid(0, &id)?,
        category: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        image: row.get(4)?,
        video_url: row.get(5)?,
        part: row.get(6)?,
        price: row.get(7)?,
        rating: row.get(8)?,
        created_at: row.get(9)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_test_store() -> (CourseStore, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let store = CourseStore::new(temp_file.path().to_str().unwrap()).unwrap();
        (store, temp_file)
    }

    fn sample_course() -> CreateCourseRequest {
        CreateCourseRequest {
            category: "Programming".to_string(),
            title: "Rust for Backend".to_string(),
            description: "Build services".to_string(),
            image: "uploads/rust.png".to_string(),
            video_url: "https://videos.example.com/rust-01".to_string(),
            part: "1".to_string(),
            price: None,
            rating: None,
        }
    }

    #[test]
    fn test_create_applies_defaults() {
        let (store, _temp) = create_test_store();

        let course = store.create(&sample_course()).unwrap();
        assert_eq!(course.price, 0.0);
        assert_eq!(course.rating, 5.0);

        let fetched = store.get_by_id(&course.id).unwrap().unwrap();
        assert_eq!(fetched.title, "Rust for Backend");
    }

    #[test]
    fn test_duplicate_title_rejected() {
        let (store, _temp) = create_test_store();

        store.create(&sample_course()).unwrap();
        assert!(store.create(&sample_course()).is_err());
    }

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let (store, _temp) = create_test_store();

        let course = store.create(&sample_course()).unwrap();
        let updated = store
            .update(
                &course.id,
                &UpdateCourseRequest {
                    price: Some(49.0),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.price, 49.0);
        assert_eq!(updated.title, course.title);
        assert_eq!(updated.created_at, course.created_at);

        assert!(store
            .update(&Uuid::new_v4(), &UpdateCourseRequest::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_delete() {
        let (store, _temp) = create_test_store();

        let course = store.create(&sample_course()).unwrap();
        assert!(store.delete(&course.id).unwrap());
        assert!(!store.delete(&course.id).unwrap());
    }

    #[test]
    fn test_list() {
        let (store, _temp) = create_test_store();
        store.create(&sample_course()).unwrap();
        assert_eq!(store.list().unwrap().len(), 1);
    }
}
