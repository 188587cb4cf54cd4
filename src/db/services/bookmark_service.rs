use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::info;

use crate::db::models::{Bookmark, Tag};
use crate::web::error::AppError;
use crate::web::models::{CreateBookmarkRequest, DeleteBookmarkRequest, UpdateBookmarkRequest};

/// How a multi-tag filter combines its tag names.
///
/// Anything that is not `OR` (case-insensitive) means `AND`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagLogic {
    And,
    Or,
}

impl TagLogic {
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("OR") {
            TagLogic::Or
        } else {
            TagLogic::And
        }
    }
}

/// A bookmark together with the names of its tags, sorted by name.
#[derive(Debug, Serialize)]
pub struct BookmarkWithTags {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub description: String,
    pub date_created: DateTime<Utc>,
    pub tags: Vec<String>,
}

impl BookmarkWithTags {
    fn new(bookmark: Bookmark, tags: Vec<String>) -> Self {
        BookmarkWithTags {
            id: bookmark.id,
            url: bookmark.url,
            title: bookmark.title,
            description: bookmark.description,
            date_created: bookmark.date_created,
            tags,
        }
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

// --- Tag Query Resolver ---

/// Lists bookmarks matching the tag filter, newest first.
///
/// With `TagLogic::Or` a bookmark matches if it owns at least one tag with a
/// requested name; the `IN` subselect de-duplicates bookmarks that own
/// several. With `TagLogic::And` a bookmark must cover every distinct
/// requested name; coverage is counted over distinct names per bookmark, so
/// duplicate same-named tag rows cannot inflate it. An empty filter returns
/// every bookmark.
pub async fn list_bookmarks(
    pool: &SqlitePool,
    tag_names: &[String],
    logic: TagLogic,
) -> Result<Vec<BookmarkWithTags>, AppError> {
    // Coverage is a set check, so requested duplicates collapse.
    let mut distinct_names: Vec<&str> = Vec::new();
    for name in tag_names {
        if !distinct_names.contains(&name.as_str()) {
            distinct_names.push(name);
        }
    }

    let mut tx = pool.begin().await?;

    let bookmarks: Vec<Bookmark> = if distinct_names.is_empty() {
        sqlx::query_as::<_, Bookmark>(
            "SELECT id, url, title, description, date_created
             FROM bookmark
             ORDER BY date_created DESC",
        )
        .fetch_all(&mut *tx)
        .await?
    } else {
        let marks = placeholders(distinct_names.len());
        let sql = match logic {
            TagLogic::Or => format!(
                "SELECT b.id, b.url, b.title, b.description, b.date_created
                 FROM bookmark b
                 WHERE b.id IN (SELECT bookmark_id FROM tag WHERE name IN ({marks}))
                 ORDER BY b.date_created DESC"
            ),
            TagLogic::And => format!(
                "SELECT b.id, b.url, b.title, b.description, b.date_created
                 FROM bookmark b
                 WHERE b.id IN (
                     SELECT bookmark_id FROM tag
                     WHERE name IN ({marks})
                     GROUP BY bookmark_id
                     HAVING COUNT(DISTINCT name) = ?
                 )
                 ORDER BY b.date_created DESC"
            ),
        };

        let mut query = sqlx::query_as::<_, Bookmark>(&sql);
        for name in &distinct_names {
            query = query.bind(*name);
        }
        if logic == TagLogic::And {
            query = query.bind(distinct_names.len() as i64);
        }
        query.fetch_all(&mut *tx).await?
    };

    let mut tags_by_bookmark = load_tag_names(&mut tx, &bookmarks).await?;
    tx.commit().await?;

    Ok(bookmarks
        .into_iter()
        .map(|bookmark| {
            let tags = tags_by_bookmark.remove(&bookmark.id).unwrap_or_default();
            BookmarkWithTags::new(bookmark, tags)
        })
        .collect())
}

/// Loads the tag names for a batch of bookmarks, grouped by owner.
/// The `ORDER BY name` keeps each per-bookmark list sorted after grouping.
async fn load_tag_names(
    tx: &mut Transaction<'_, Sqlite>,
    bookmarks: &[Bookmark],
) -> Result<HashMap<i64, Vec<String>>, sqlx::Error> {
    if bookmarks.is_empty() {
        return Ok(HashMap::new());
    }

    let marks = placeholders(bookmarks.len());
    let sql = format!(
        "SELECT id, name, bookmark_id FROM tag WHERE bookmark_id IN ({marks}) ORDER BY name"
    );
    let mut query = sqlx::query_as::<_, Tag>(&sql);
    for bookmark in bookmarks {
        query = query.bind(bookmark.id);
    }
    let tags = query.fetch_all(&mut **tx).await?;

    let mut grouped: HashMap<i64, Vec<String>> = HashMap::new();
    for tag in tags {
        grouped.entry(tag.bookmark_id).or_default().push(tag.name);
    }
    Ok(grouped)
}

// --- Bookmark Mutation Engine ---

fn authorize(provided: Option<&str>, secret: &str) -> Result<(), AppError> {
    if provided != Some(secret) {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

fn required_url(url: Option<&str>) -> Result<&str, AppError> {
    match url {
        Some(url) if !url.is_empty() => Ok(url),
        _ => Err(AppError::ValidationError(
            "Missing required fields".to_string(),
        )),
    }
}

fn required_id(id: Option<i64>) -> Result<i64, AppError> {
    id.ok_or_else(|| AppError::ValidationError("Missing required fields".to_string()))
}

/// Creates a bookmark and one tag row per submitted tag name (duplicates in
/// the input are kept) in a single transaction.
///
/// The pre-insert lookup produces the friendly `Conflict` in the common case;
/// the `UNIQUE` constraint on `bookmark.url` settles concurrent creates, and
/// its violation maps to the same `Conflict`.
pub async fn create_bookmark(
    pool: &SqlitePool,
    req: CreateBookmarkRequest,
    secret: &str,
) -> Result<BookmarkWithTags, AppError> {
    authorize(req.secret.as_deref(), secret)?;
    let url = required_url(req.url.as_deref())?;

    let mut tx = pool.begin().await?;

    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM bookmark WHERE url = ?")
        .bind(url)
        .fetch_optional(&mut *tx)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("URL already exists".to_string()));
    }

    let date_created = Utc::now();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO bookmark (url, title, description, date_created)
         VALUES (?, ?, ?, ?)
         RETURNING id",
    )
    .bind(url)
    .bind(&req.title)
    .bind(&req.description)
    .bind(date_created)
    .fetch_one(&mut *tx)
    .await?;

    for name in &req.tags {
        sqlx::query("INSERT INTO tag (name, bookmark_id) VALUES (?, ?)")
            .bind(name)
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    info!(id, url, "created bookmark");

    Ok(BookmarkWithTags {
        id,
        url: url.to_string(),
        title: req.title,
        description: req.description,
        date_created,
        tags: req.tags,
    })
}

/// Updates a bookmark's fields and reconciles its tag set against the
/// submitted list.
///
/// Reconciliation is a diff: tags whose name is absent from the new list are
/// deleted, names not already present get a fresh row, and unchanged tags
/// keep their row identity. The whole operation is one transaction.
pub async fn update_bookmark(
    pool: &SqlitePool,
    req: UpdateBookmarkRequest,
    secret: &str,
) -> Result<BookmarkWithTags, AppError> {
    authorize(req.secret.as_deref(), secret)?;
    let id = required_id(req.id)?;
    let url = required_url(req.url.as_deref())?;

    let mut tx = pool.begin().await?;

    let url_owner: Option<i64> = sqlx::query_scalar("SELECT id FROM bookmark WHERE url = ?")
        .bind(url)
        .fetch_optional(&mut *tx)
        .await?;
    if let Some(owner_id) = url_owner {
        if owner_id != id {
            return Err(AppError::Conflict("URL already exists".to_string()));
        }
    }

    let rows_affected =
        sqlx::query("UPDATE bookmark SET url = ?, title = ?, description = ? WHERE id = ?")
            .bind(url)
            .bind(&req.title)
            .bind(&req.description)
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
    if rows_affected == 0 {
        return Err(AppError::NotFound("Bookmark not found".to_string()));
    }

    if req.tags.is_empty() {
        sqlx::query("DELETE FROM tag WHERE bookmark_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
    } else {
        let marks = placeholders(req.tags.len());
        let sql = format!("DELETE FROM tag WHERE bookmark_id = ? AND name NOT IN ({marks})");
        let mut query = sqlx::query(&sql).bind(id);
        for name in &req.tags {
            query = query.bind(name);
        }
        query.execute(&mut *tx).await?;
    }

    let surviving_names: Vec<String> =
        sqlx::query_scalar("SELECT name FROM tag WHERE bookmark_id = ?")
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;
    for name in &req.tags {
        if surviving_names.contains(name) {
            continue;
        }
        sqlx::query("INSERT INTO tag (name, bookmark_id) VALUES (?, ?)")
            .bind(name)
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }

    let bookmark: Bookmark =
        sqlx::query_as("SELECT id, url, title, description, date_created FROM bookmark WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

    tx.commit().await?;
    info!(id, url, "updated bookmark");

    Ok(BookmarkWithTags::new(bookmark, req.tags))
}

/// Deletes a bookmark and its tags atomically.
pub async fn delete_bookmark(
    pool: &SqlitePool,
    req: DeleteBookmarkRequest,
    secret: &str,
) -> Result<(), AppError> {
    authorize(req.secret.as_deref(), secret)?;
    let id = required_id(req.id)?;

    let mut tx = pool.begin().await?;

    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM bookmark WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    if existing.is_none() {
        return Err(AppError::NotFound("Bookmark not found".to_string()));
    }

    sqlx::query("DELETE FROM tag WHERE bookmark_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM bookmark WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    info!(id, "deleted bookmark");

    Ok(())
}
