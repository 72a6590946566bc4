//! User registration, login and sessions
//!
//! Passwords are hashed on the blocking thread pool; the users table sits behind a
//! mutex-guarded SQLite connection.

pub mod password;
pub mod session;

pub use password::{hash_password, verify_password};
pub use session::{SESSION_COOKIE, SessionClaims, SessionManager, token_from_cookie_header};

use crate::error::{BrieflyError, Result};
use crate::storage::{Database, NewUser, User};
use std::sync::{Arc, Mutex};

/// Message for any failed login
pub const LOGIN_FAILED: &str = "Login unsuccessful. Please check your email and password";

/// Registration and login over the users table
#[derive(Clone)]
pub struct AuthService {
    db: Arc<Mutex<Database>>,
    iterations: u32,
}

impl AuthService {
    pub fn new(db: Arc<Mutex<Database>>, iterations: u32) -> Self {
        Self { db, iterations }
    }

    /// Register a user. Duplicate usernames or emails fail with `BrieflyError::Conflict`.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<User> {
        let username = username.trim().to_string();
        let email = email.trim().to_string();
        validate_registration(&username, &email, password)?;

        let password = password.to_string();
        let iterations = self.iterations;
        let db = Arc::clone(&self.db);

        run_blocking(move || {
            let password_hash = hash_password(&password, iterations)?;
            let mut db = lock(&db)?;
            db.insert_user(&NewUser {
                username: &username,
                email: &email,
                password_hash: &password_hash,
            })
        })
        .await
    }

    /// Authenticate by email and password
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let email = email.trim().to_string();
        let password = password.to_string();
        let db = Arc::clone(&self.db);

        run_blocking(move || {
            let user = lock(&db)?.find_user_by_email(&email)?;
            match user {
                Some(user) if verify_password(&password, &user.password_hash) => {
                    log::info!("User {} logged in", user.id);
                    Ok(user)
                }
                _ => {
                    log::info!("Failed login attempt");
                    Err(BrieflyError::Auth(LOGIN_FAILED.to_string()))
                }
            }
        })
        .await
    }

    /// Look up the user a session belongs to
    pub async fn user_for_session(&self, claims: &SessionClaims) -> Result<Option<User>> {
        let Some(id) = claims.user_id() else {
            return Ok(None);
        };
        let db = Arc::clone(&self.db);
        run_blocking(move || {
            let db = lock(&db)?;
            db.get_user_by_id(id)
        })
        .await
    }
}

fn validate_registration(username: &str, email: &str, password: &str) -> Result<()> {
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(BrieflyError::InvalidInput(
            "Username, email and password are required".to_string(),
        ));
    }
    if !email.contains('@') {
        return Err(BrieflyError::InvalidInput("Invalid email address".to_string()));
    }
    Ok(())
}

fn lock(db: &Mutex<Database>) -> Result<std::sync::MutexGuard<'_, Database>> {
    db.lock()
        .map_err(|_| BrieflyError::Storage("Database lock poisoned".to_string()))
}

async fn run_blocking<T, F>(task: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| BrieflyError::Generic(format!("Blocking task failed: {}", e)))?
}
