// Postgres storage layer with sqlx
//
// This crate provides the Database repository used by the API server:
// row models, queries, embedded migrations, and password hashing.

pub mod models;
pub mod password;
pub mod repositories;

pub use models::*;
pub use password::{hash_password, verify_password};
pub use repositories::Database;
