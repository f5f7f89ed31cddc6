//! Shared domain value types aligned with persisted columns.

use std::fmt;

use crate::domain::error::DomainError;

/// Store-assigned identity of a blog post (`blog_posts.id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::Type)]
#[sqlx(transparent)]
pub struct PostId(i64);

impl PostId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    /// Parse an id from a URL path segment.
    ///
    /// Only a non-empty run of ASCII digits is accepted, so signs, whitespace
    /// and leading `+` are rejected even though `i64::from_str` would take some
    /// of them.
    pub fn parse(segment: &str) -> Result<Self, DomainError> {
        if segment.is_empty() || !segment.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(DomainError::validation(format!(
                "`{segment}` is not a post id"
            )));
        }

        segment
            .parse::<i64>()
            .map(Self)
            .map_err(|_| DomainError::validation(format!("post id `{segment}` is out of range")))
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
