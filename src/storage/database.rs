//! SQLite user storage for briefly-rs
//!
//! Users are created at registration and never updated or deleted.

use crate::error::{BrieflyError, Result};
use crate::storage::schema::*;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;
use std::path::Path;

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Fields of a user about to be registered
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Database connection and operations
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            crate::utils::ensure_directory(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| BrieflyError::Storage(format!("Failed to open database: {}", e)))?;

        let mut db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create an in-memory database (for testing)
    pub fn memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            BrieflyError::Storage(format!("Failed to create in-memory database: {}", e))
        })?;

        let mut db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize database schema
    fn initialize(&mut self) -> Result<()> {
        // Enable WAL mode for better concurrency
        let _: String = self
            .conn
            .query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))
            .map_err(|e| BrieflyError::Storage(format!("Failed to enable WAL mode: {}", e)))?;

        self.conn
            .execute_batch(CREATE_USERS_TABLE)
            .map_err(|e| BrieflyError::Storage(format!("Failed to create users table: {}", e)))?;

        self.conn
            .execute_batch(CREATE_METADATA_TABLE)
            .map_err(|e| BrieflyError::Storage(format!("Failed to create metadata table: {}", e)))?;

        if let Some(stored) = self.schema_version()? {
            if stored > SCHEMA_VERSION {
                return Err(BrieflyError::Storage(format!(
                    "Database schema version {} is newer than supported version {}",
                    stored, SCHEMA_VERSION
                )));
            }
        }

        self.conn
            .execute(
                "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)",
                params![SCHEMA_VERSION.to_string()],
            )
            .map_err(|e| BrieflyError::Storage(format!("Failed to set schema version: {}", e)))?;

        log::info!("Database initialized with schema version {}", SCHEMA_VERSION);
        Ok(())
    }

    /// Stored schema version
    fn schema_version(&self) -> Result<Option<u32>> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM metadata WHERE key = 'schema_version'",
                [],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| BrieflyError::Storage(format!("Failed to read schema version: {}", e)))?;

        Ok(value.and_then(|v| v.parse().ok()))
    }

    /// Insert a user in one transaction.
    ///
    /// Fails with `BrieflyError::Conflict` when the username or email is taken; the
    /// table is left unchanged in that case.
    pub fn insert_user(&mut self, user: &NewUser<'_>) -> Result<User> {
        let created_at = Utc::now();

        let tx = self
            .conn
            .transaction()
            .map_err(|e| BrieflyError::Storage(format!("Failed to start transaction: {}", e)))?;

        let existing: i64 = tx
            .query_row(
                "SELECT COUNT(*) FROM users WHERE username = ?1 OR email = ?2",
                params![user.username, user.email],
                |row| row.get(0),
            )
            .map_err(|e| BrieflyError::Storage(format!("Failed to check existing users: {}", e)))?;
        if existing > 0 {
            return Err(BrieflyError::Conflict(
                "Username or email already exists".to_string(),
            ));
        }

        tx.execute(
            "INSERT INTO users (username, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                user.username,
                user.email,
                user.password_hash,
                created_at.to_rfc3339()
            ],
        )
        .map_err(|e| match e.sqlite_error_code() {
            Some(rusqlite::ErrorCode::ConstraintViolation) => {
                BrieflyError::Conflict("Username or email already exists".to_string())
            }
            _ => BrieflyError::Storage(format!("Failed to insert user: {}", e)),
        })?;
        let id = tx.last_insert_rowid();

        tx.commit()
            .map_err(|e| BrieflyError::Storage(format!("Failed to commit transaction: {}", e)))?;

        log::info!("Registered user {} ({})", id, user.username);
        Ok(User {
            id,
            username: user.username.to_string(),
            email: user.email.to_string(),
            password_hash: user.password_hash.to_string(),
            created_at,
        })
    }

    /// Look a user up by email
    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.query_user("SELECT id, username, email, password_hash, created_at FROM users WHERE email = ?", email)
    }

    /// Get user by ID
    pub fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.query_user("SELECT id, username, email, password_hash, created_at FROM users WHERE id = ?", id)
    }

    /// Get total user count
    pub fn user_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .map_err(|e| BrieflyError::Storage(format!("Failed to count users: {}", e)))?;

        Ok(count as usize)
    }

    fn query_user<P: rusqlite::ToSql>(&self, sql: &str, param: P) -> Result<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| BrieflyError::Storage(format!("Failed to prepare query: {}", e)))?;

        stmt.query_row(params![param], row_to_user)
            .optional()
            .map_err(|e| BrieflyError::Storage(format!("Failed to query user: {}", e)))
    }
}

/// Helper function to convert database row to User
fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    let created_at: String = row.get(4)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        created_at,
    })
}
