use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};

use crate::db::services::bookmark_service::{self, BookmarkWithTags, TagLogic};
use crate::web::models::{
    AppJson, CreateBookmarkRequest, DeleteBookmarkRequest, ListBookmarksQuery,
    UpdateBookmarkRequest,
};
use crate::web::{AppError, AppState};

// --- Route Handlers ---

async fn list_bookmarks_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<ListBookmarksQuery>,
) -> Result<Json<Vec<BookmarkWithTags>>, AppError> {
    let tag_names: Vec<String> = match query.tags.as_deref() {
        Some(raw) if !raw.is_empty() => raw.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };
    let logic = TagLogic::parse(query.logic.as_deref().unwrap_or("AND"));

    let bookmarks = bookmark_service::list_bookmarks(&app_state.pool, &tag_names, logic).await?;
    Ok(Json(bookmarks))
}

async fn create_bookmark_handler(
    State(app_state): State<Arc<AppState>>,
    AppJson(payload): AppJson<CreateBookmarkRequest>,
) -> Result<(StatusCode, Json<BookmarkWithTags>), AppError> {
    let bookmark =
        bookmark_service::create_bookmark(&app_state.pool, payload, &app_state.config.secret)
            .await?;
    Ok((StatusCode::CREATED, Json(bookmark)))
}

async fn update_bookmark_handler(
    State(app_state): State<Arc<AppState>>,
    AppJson(payload): AppJson<UpdateBookmarkRequest>,
) -> Result<Json<BookmarkWithTags>, AppError> {
    let bookmark =
        bookmark_service::update_bookmark(&app_state.pool, payload, &app_state.config.secret)
            .await?;
    Ok(Json(bookmark))
}

async fn delete_bookmark_handler(
    State(app_state): State<Arc<AppState>>,
    AppJson(payload): AppJson<DeleteBookmarkRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    bookmark_service::delete_bookmark(&app_state.pool, payload, &app_state.config.secret).await?;
    Ok(Json(serde_json::json!({ "message": "URL deleted" })))
}

// --- Router ---

pub fn create_bookmarks_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bookmarks", get(list_bookmarks_handler))
        .route("/create", post(create_bookmark_handler))
        .route("/update", post(update_bookmark_handler))
        .route("/delete", post(delete_bookmark_handler))
}
