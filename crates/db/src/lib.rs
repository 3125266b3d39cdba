//! `db` crate — pure persistence layer.
//!
//! Provides a connection pool, typed row structs, the generic partial-update
//! SQL builder and repository functions for the `jobs` table.

pub mod error;
pub mod models;
pub mod pool;
pub mod repository;
pub mod sql;

pub use error::DbError;
pub use pool::DbPool;
