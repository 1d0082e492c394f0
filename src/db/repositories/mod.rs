pub mod follow;
pub mod post;
pub mod user;

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// A write collided with a unique index. `column` is the constrained column
/// as reported by the database, e.g. `users.email`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unique constraint violated on {column}")]
pub struct UniqueViolation {
    pub column: String,
}

impl UniqueViolation {
    /// Extracts the violation from a database error, if that is what it is.
    pub fn from_db_err(err: &DbErr) -> Option<Self> {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => Some(Self {
                column: msg
                    .rsplit(": ")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string(),
            }),
            _ => None,
        }
    }

    /// Finds a violation anywhere in an `anyhow` error chain.
    pub fn find(err: &anyhow::Error) -> Option<&Self> {
        err.chain().find_map(|cause| cause.downcast_ref::<Self>())
    }

    #[must_use]
    pub fn is_on(&self, column: &str) -> bool {
        self.column.ends_with(column)
    }
}
