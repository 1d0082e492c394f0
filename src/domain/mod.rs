//! Domain primitives shared by the follow graph and the feed assembler.

pub mod pagination;
pub mod token;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use pagination::{Page, PageInfo, PageRequest, PaginationError, page_info};
pub use token::{TokenError, TokenSigner};

/// Unique identifier for a user.
///
/// Wrapping the raw row id keeps user ids from being mixed up with post ids.
///
/// # Examples
///
/// ```rust
/// use microblog::domain::UserId;
///
/// let id = UserId::new(42);
/// assert_eq!(id.value(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct UserId(i32);

impl UserId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for i32 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl From<i32> for UserId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl Serialize for UserId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i32::deserialize(deserializer)?;
        Ok(Self::new(id))
    }
}

/// Which authors a feed query draws posts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedScope {
    /// The user's own posts plus everyone they follow.
    Timeline(UserId),
    /// Every user's posts.
    Explore,
    /// A single author's posts.
    Author(UserId),
}
