//! Repository functions — one function per database operation.
//!
//! Every function takes a `PgExecutor` and returns a `Result<T, DbError>`.
//! No HTTP concerns — pure SQL.

pub mod jobs;
