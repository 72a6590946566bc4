//! Storage functionality for briefly-rs
//!
//! This module provides the users table on embedded SQLite.

pub mod database;
pub mod schema;

// Re-export main types
pub use database::{Database, NewUser, User};
