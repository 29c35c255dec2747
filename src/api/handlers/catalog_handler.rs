//! Catalog browsing handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::domain::{Category, SubCategory};
use crate::errors::AppResult;
use crate::types::ApiResponse;

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories))
        .route("/:id/sub-categories", get(list_sub_categories))
}

/// All categories
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Categories", body = Vec<Category>))
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Category>>>> {
    let categories = state.catalog_service.list_categories().await?;
    Ok(Json(ApiResponse::success(categories)))
}

/// Sub-categories of a category
#[utoipa::path(
    get,
    path = "/categories/{id}/sub-categories",
    tag = "Catalog",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Sub-categories", body = Vec<SubCategory>),
        (status = 404, description = "Category not found")
    )
)]
pub async fn list_sub_categories(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<SubCategory>>>> {
    let sub_categories = state.catalog_service.list_sub_categories(id).await?;
    Ok(Json(ApiResponse::success(sub_categories)))
}
