//! Wishlist and notification inbox handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{Notification, WishlistEntry};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created, NoContent, Paginated, PaginationParams};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct WishlistRequest {
    pub listing_id: Uuid,
}

pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_wishlist).post(add_to_wishlist))
        .route("/:listing_id", delete(remove_from_wishlist))
}

pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/:id/read", post(mark_notification_read))
}

/// Save a listing
#[utoipa::path(
    post,
    path = "/wishlist",
    tag = "Wishlist",
    security(("bearer_auth" = [])),
    request_body = WishlistRequest,
    responses(
        (status = 201, description = "Listing saved", body = WishlistEntry),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn add_to_wishlist(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<WishlistRequest>,
) -> AppResult<Created<WishlistEntry>> {
    let entry = state
        .engagement_service
        .add_to_wishlist(current_user.id, payload.listing_id)
        .await?;
    Ok(Created(entry))
}

/// Saved listings
#[utoipa::path(
    get,
    path = "/wishlist",
    tag = "Wishlist",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Wishlist", body = Vec<WishlistEntry>))
)]
pub async fn list_wishlist(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<WishlistEntry>>>> {
    let entries = state
        .engagement_service
        .list_wishlist(current_user.id)
        .await?;
    Ok(Json(ApiResponse::success(entries)))
}

/// Remove a saved listing
#[utoipa::path(
    delete,
    path = "/wishlist/{listing_id}",
    tag = "Wishlist",
    security(("bearer_auth" = [])),
    params(("listing_id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 204, description = "Removed"),
        (status = 404, description = "Listing was not saved")
    )
)]
pub async fn remove_from_wishlist(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(listing_id): Path<Uuid>,
) -> AppResult<NoContent> {
    state
        .engagement_service
        .remove_from_wishlist(current_user.id, listing_id)
        .await?;
    Ok(NoContent)
}

/// Notifications addressed to the caller
#[utoipa::path(
    get,
    path = "/notifications",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Items per page")
    ),
    responses((status = 200, description = "Paginated notifications"))
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<Notification>>>> {
    let (page, per_page) = (params.page, params.limit());
    let (notifications, total) = state
        .engagement_service
        .list_notifications(current_user.id, params)
        .await?;
    Ok(Json(ApiResponse::success(Paginated::new(
        notifications,
        page,
        per_page,
        total,
    ))))
}

/// Mark a notification read
#[utoipa::path(
    post,
    path = "/notifications/{id}/read",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification updated", body = Notification),
        (status = 404, description = "Notification not found")
    )
)]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Notification>>> {
    let notification = state
        .engagement_service
        .mark_notification_read(current_user.id, id)
        .await?;
    Ok(Json(ApiResponse::success(notification)))
}
