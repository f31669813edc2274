//! User Storage
//! Mission: Persist user accounts with SQLite

use crate::auth::models::{User, UserRole};
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, Row};
use tracing::info;
use uuid::Uuid;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, role, categories, balance, is_active, api_key, created_at";

/// User storage with SQLite backend
pub struct UserStore {
    db_path: String,
}

impl UserStore {
    /// Create a new user store and initialize the schema.
    pub fn new(db_path: &str) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        // Enrolled category ids live in a JSON array column so the record
        // keeps the ordered, duplicate-free reference list of the document
        // model it mirrors.
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL,
                categories TEXT NOT NULL DEFAULT '[]',
                balance REAL NOT NULL DEFAULT 0,
                is_active INTEGER NOT NULL DEFAULT 1,
                api_key TEXT UNIQUE NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Insert a new user. The password must already be hashed; this store
    /// never sees plaintext.
    pub fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        role: UserRole,
    ) -> Result<User> {
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role,
            categories: Vec::new(),
            balance: 0.0,
            is_active: true,
            api_key: Uuid::new_v4().to_string(),
            created_at: Utc::now().to_rfc3339(),
        };

        let conn = Connection::open(&self.db_path)?;
        conn.execute(
            "INSERT INTO users (id, username, email, password_hash, role, categories, balance, is_active, api_key, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                user.id.to_string(),
                user.username,
                user.email,
                user.password_hash,
                user.role.as_str(),
                serde_json::to_string(&user.categories)?,
                user.balance,
                user.is_active as i64,
                user.api_key,
                user.created_at,
            ],
        )
        .context("Failed to insert user")?;

        info!("Created user: {} ({})", user.username, user.role.as_str());

        Ok(user)
    }

    /// Get user by exact (lowercased) username.
    pub fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = Connection::open(&self.db_path)?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?1"
        ))?;

        let result = stmt.query_row(params![username], row_to_user);
        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get user by id.
    pub fn get_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        let conn = Connection::open(&self.db_path)?;
        let mut stmt =
            conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))?;

        let result = stmt.query_row(params![id.to_string()], row_to_user);
        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Case-insensitive lookup by username or email, used for the duplicate
    /// check at registration.
    pub fn find_by_username_or_email(&self, username: &str, email: &str) -> Result<Option<User>> {
        let conn = Connection::open(&self.db_path)?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE lower(username) = lower(?1) OR lower(email) = lower(?2)"
        ))?;

        let result = stmt.query_row(params![username, email], row_to_user);
        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the enrolled-category reference list of a user.
    pub fn set_categories(&self, user_id: &Uuid, categories: &[Uuid]) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;
        let rows = conn.execute(
            "UPDATE users SET categories = ?1 WHERE id = ?2",
            params![serde_json::to_string(categories)?, user_id.to_string()],
        )?;

        if rows == 0 {
            anyhow::bail!("User {} not found", user_id);
        }
        Ok(())
    }
}

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    let id: String = row.get(0)?;
    let role_str: String = row.get(4)?;
    let categories_json: String = row.get(5)?;
    let is_active: i64 = row.get(7)?;

    Ok(User {
        id: parse_uuid(0, &id)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role: UserRole::from_str(&role_str).unwrap_or(UserRole::User),
        categories: parse_uuid_list(5, &categories_json)?,
        balance: row.get(6)?,
        is_active: is_active != 0,
        api_key: row.get(8)?,
        created_at: row.get(9)?,
    })
}

pub(crate) fn parse_uuid(column: usize, value: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
    })
}

pub(crate) fn parse_uuid_list(column: usize, json: &str) -> rusqlite::Result<Vec<Uuid>> {
    serde_json::from_str(json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
    })
}
