use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

/// A tag name and how often it is used, plus a presentational row id.
///
/// The id is assigned sequentially in output order for list consumers that
/// need a per-row key; it is not persisted and not stable across calls.
#[derive(Debug, Serialize)]
pub struct TagWithCount {
    pub id: i64,
    pub name: String,
    pub count: i64,
}

#[derive(FromRow)]
struct TagCountRow {
    name: String,
    count: i64,
}

/// Lists every distinct tag name with its usage count, most used first.
/// The count is the number of tag rows bearing the name, not the number of
/// distinct bookmarks using it.
pub async fn list_tags_with_count(pool: &SqlitePool) -> sqlx::Result<Vec<TagWithCount>> {
    let rows = sqlx::query_as::<_, TagCountRow>(
        "SELECT name, COUNT(id) AS count
         FROM tag
         GROUP BY name
         ORDER BY count DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .enumerate()
        .map(|(position, row)| TagWithCount {
            id: position as i64 + 1,
            name: row.name,
            count: row.count,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

    use crate::db::services::bookmark_service::{create_bookmark, delete_bookmark};
    use crate::web::models::{CreateBookmarkRequest, DeleteBookmarkRequest};

    const SECRET: &str = "test-secret";

    async fn setup_pool() -> SqlitePool {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        crate::db::MIGRATOR.run(&pool).await.unwrap();
        pool
    }

    async fn create(pool: &SqlitePool, url: &str, tags: &[&str]) -> i64 {
        let req = CreateBookmarkRequest {
            url: Some(url.to_string()),
            title: String::new(),
            description: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            secret: Some(SECRET.to_string()),
        };
        create_bookmark(pool, req, SECRET).await.unwrap().id
    }

    #[tokio::test]
    async fn counts_tag_rows_ordered_descending() {
        let pool = setup_pool().await;

        create(&pool, "http://a.com", &["go", "cli"]).await;
        create(&pool, "http://b.com", &["go"]).await;
        create(&pool, "http://c.com", &["go"]).await;

        let tags = list_tags_with_count(&pool).await.unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name, "go");
        assert_eq!(tags[0].count, 3);
        assert_eq!(tags[1].name, "cli");
        assert_eq!(tags[1].count, 1);

        // Presentational ids are 1-based and sequential.
        assert_eq!(tags[0].id, 1);
        assert_eq!(tags[1].id, 2);
    }

    #[tokio::test]
    async fn empty_store_yields_no_tags() {
        let pool = setup_pool().await;
        assert!(list_tags_with_count(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_a_bookmark_drops_its_tags_from_the_listing() {
        let pool = setup_pool().await;

        let a = create(&pool, "http://a.com", &["go", "solo"]).await;
        create(&pool, "http://b.com", &["go"]).await;

        delete_bookmark(
            &pool,
            DeleteBookmarkRequest {
                id: Some(a),
                secret: Some(SECRET.to_string()),
            },
            SECRET,
        )
        .await
        .unwrap();

        let tags = list_tags_with_count(&pool).await.unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "go");
        assert_eq!(tags[0].count, 1);
    }
}
