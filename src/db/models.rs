use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents a saved bookmark.
/// Corresponds to the `bookmark` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bookmark {
    pub id: i64,
    pub url: String, // unique across all bookmarks
    pub title: String,
    pub description: String,
    pub date_created: DateTime<Utc>,
}

/// Represents a tag owned by exactly one bookmark.
/// Corresponds to the `tag` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub bookmark_id: i64, // Foreign key to Bookmark
}
