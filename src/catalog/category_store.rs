//! Category Storage
//! Mission: Persist categories with SQLite

use crate::auth::user_store::{parse_uuid, parse_uuid_list};
use crate::catalog::models::Category;
use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};
use tracing::info;
use uuid::Uuid;

/// Category storage with SQLite backend
pub struct CategoryStore {
    db_path: String,
}

impl CategoryStore {
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
            "CREATE TABLE IF NOT EXISTS categories (
                id TEXT PRIMARY KEY,
                title TEXT UNIQUE NOT NULL,
                users TEXT NOT NULL DEFAULT '[]'
            )",
            [],
        )?;

        Ok(())
    }

    pub fn create(&self, title: &str) -> Result<Category> {
        let category = Category {
            id: Uuid::new_v4(),
            title: title.trim().to_string(),
            users: Vec::new(),
        };

        let conn = Connection::open(&self.db_path)?;
        conn.execute(
            "INSERT INTO categories (id, title, users) VALUES (?1, ?2, ?3)",
            params![
                category.id.to_string(),
                category.title,
                serde_json::to_string(&category.users)?,
            ],
        )
        .context("Failed to insert category")?;

        info!("Created category: {}", category.title);

        Ok(category)
    }

    pub fn get_by_id(&self, id: &Uuid) -> Result<Option<Category>> {
        let conn = Connection::open(&self.db_path)?;
        let mut stmt =
            conn.prepare("SELECT id, title, users FROM categories WHERE id = ?1")?;

        let result = stmt.query_row(params![id.to_string()], row_to_category);
        match result {
            Ok(category) => Ok(Some(category)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_by_title(&self, title: &str) -> Result<Option<Category>> {
        let conn = Connection::open(&self.db_path)?;
        let mut stmt =
            conn.prepare("SELECT id, title, users FROM categories WHERE title = ?1")?;

        let result = stmt.query_row(params![title.trim()], row_to_category);
        match result {
            Ok(category) => Ok(Some(category)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list(&self) -> Result<Vec<Category>> {
        let conn = Connection::open(&self.db_path)?;
        let mut stmt = conn.prepare("SELECT id, title, users FROM categories")?;

        let categories = stmt
            .query_map([], row_to_category)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    /// Update a category's title. Returns the refreshed record, or `None`
    /// if the id does not exist.
    pub fn update_title(&self, id: &Uuid, title: &str) -> Result<Option<Category>> {
        let conn = Connection::open(&self.db_path)?;
        let rows = conn.execute(
            "UPDATE categories SET title = ?1 WHERE id = ?2",
            params![title.trim(), id.to_string()],
        )?;

        if rows == 0 {
            return Ok(None);
        }
        self.get_by_id(id)
    }

    /// Replace the enrolled-user reference list of a category.
    pub fn set_users(&self, id: &Uuid, users: &[Uuid]) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;
        let rows = conn.execute(
            "UPDATE categories SET users = ?1 WHERE id = ?2",
            params![serde_json::to_string(users)?, id.to_string()],
        )?;

        if rows == 0 {
            anyhow::bail!("Category {} not found", id);
        }
        Ok(())
    }

    /// Delete a category. Returns `false` if the id does not exist.
    pub fn delete(&self, id: &Uuid) -> Result<bool> {
        let conn = Connection::open(&self.db_path)?;
        let rows = conn.execute(
            "DELETE FROM categories WHERE id = ?1",
            params![id.to_string()],
        )?;

        if rows > 0 {
            info!("Deleted category: {}", id);
        }
        Ok(rows > 0)
    }
}

fn row_to_category(row: &Row<'_>) -> rusqlite::Result<Category> {
    let id: String = row.get(0)?;
    let users_json: String = row.get(2)?;

    Ok(Category {
        id: parse_uuid(0, &id)?,
        title: row.get(1)?,
        users: parse_uuid_list(2, &users_json)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_test_store() -> (CategoryStore, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let store = CategoryStore::new(temp_file.path().to_str().unwrap()).unwrap();
        (store, temp_file)
    }

    #[test]
    fn test_create_trims_title() {
        let (store, _temp) = create_test_store();

        let category = store.create("  Programming  ").unwrap();
        assert_eq!(category.title, "Programming");
        assert!(category.users.is_empty());

        let fetched = store.get_by_title("Programming").unwrap().unwrap();
        assert_eq!(fetched.id, category.id);
    }

    #[test]
    fn test_duplicate_title_rejected() {
        let (store, _temp) = create_test_store();

        store.create("Programming").unwrap();
        assert!(store.create("Programming").is_err());
    }

    #[test]
    fn test_update_and_delete() {
        let (store, _temp) = create_test_store();

        let category = store.create("Programming").unwrap();
        let updated = store.update_title(&category.id, "Design").unwrap().unwrap();
        assert_eq!(updated.title, "Design");

        assert!(store.update_title(&Uuid::new_v4(), "x").unwrap().is_none());

        assert!(store.delete(&category.id).unwrap());
        assert!(!store.delete(&category.id).unwrap());
        assert!(store.get_by_id(&category.id).unwrap().is_none());
    }

    #[test]
    fn test_set_users_roundtrip() {
        let (store, _temp) = create_test_store();

        let category = store.create("Programming").unwrap();
        let users = vec![Uuid::new_v4()];
        store.set_users(&category.id, &users).unwrap();

        let fetched = store.get_by_id(&category.id).unwrap().unwrap();
        assert_eq!(fetched.users, users);

        assert!(store.set_users(&Uuid::new_v4(), &[]).is_err());
    }

    #[test]
    fn test_list() {
        let (store, _temp) = create_test_store();
        store.create("A").unwrap();
        store.create("B").unwrap();
        assert_eq!(store.list().unwrap().len(), 2);
    }
}
