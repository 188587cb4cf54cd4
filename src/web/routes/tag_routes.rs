use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};

use crate::db::services::tag_service::{self, TagWithCount};
use crate::web::{AppError, AppState};

async fn list_tags_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<TagWithCount>>, AppError> {
    let tags = tag_service::list_tags_with_count(&app_state.pool).await?;
    Ok(Json(tags))
}

pub fn create_tags_router() -> Router<Arc<AppState>> {
    Router::new().route("/tags", get(list_tags_handler))
}
