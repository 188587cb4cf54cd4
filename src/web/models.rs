use axum::extract::FromRequest;
use serde::Deserialize;

use crate::web::error::AppError;

/// `axum::Json` with the rejection mapped onto [`AppError`], so a malformed
/// body or an ill-typed field answers 400 `Missing required fields` instead
/// of axum's default 422.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, Deserialize)]
pub struct CreateBookmarkRequest {
    pub url: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub secret: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookmarkRequest {
    pub id: Option<i64>,
    pub url: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub secret: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteBookmarkRequest {
    pub id: Option<i64>,
    pub secret: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListBookmarksQuery {
    pub tags: Option<String>,
    pub logic: Option<String>,
}
