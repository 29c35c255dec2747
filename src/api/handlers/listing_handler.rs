//! Partner-side listing handlers.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::{MAX_LISTING_IMAGES, MAX_LISTING_UPLOAD_BYTES};
use crate::domain::{Listing, ListingDraft, ListingPatch, ModificationRequest};
use crate::errors::{AppError, AppResult};
use crate::types::{ApiResponse, Created, NoContent};

/// Multipart field carrying the listing as JSON
const LISTING_FIELD: &str = "listing";
/// Repeated multipart field carrying image files
const IMAGES_FIELD: &str = "images";

/// Multipart body of `POST /listings`
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ListingUpload {
    /// `ListingDraft` as a JSON string
    listing: String,
    #[schema(value_type = Vec<String>)]
    images: Vec<Vec<u8>>,
}

pub fn listing_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_own_listings)
                .post(create_listing)
                .layer(DefaultBodyLimit::max(MAX_LISTING_UPLOAD_BYTES)),
        )
        .route("/:id", get(get_listing).delete(delete_listing))
        .route("/:id/modification-requests", post(request_update))
}

/// Split a listing upload into the draft and raw image buffers.
async fn read_upload(mut multipart: Multipart) -> AppResult<(ListingDraft, Vec<Vec<u8>>)> {
    let mut draft = None;
    let mut images = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        match field.name() {
            Some(LISTING_FIELD) => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                let parsed: ListingDraft = serde_json::from_str(&text)
                    .map_err(|e| AppError::validation(format!("Invalid listing: {}", e)))?;
                draft = Some(parsed);
            }
            Some(IMAGES_FIELD) => {
                if images.len() == MAX_LISTING_IMAGES {
                    return Err(AppError::validation(format!(
                        "At most {} images per listing",
                        MAX_LISTING_IMAGES
                    )));
                }
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                images.push(bytes.to_vec());
            }
            _ => {}
        }
    }

    let draft = draft.ok_or_else(|| AppError::validation("Missing listing field"))?;
    Ok((draft, images))
}

/// Create a listing (pending review)
#[utoipa::path(
    post,
    path = "/listings",
    tag = "Listings",
    security(("bearer_auth" = [])),
    request_body(content = ListingUpload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Listing submitted for review", body = Listing),
        (status = 400, description = "Invalid listing, image or permissions"),
        (status = 403, description = "Partner account required")
    )
)]
pub async fn create_listing(
    State(state): State<AppState>,
    current_user: CurrentUser,
    multipart: Multipart,
) -> AppResult<Created<Listing>> {
    let (draft, images) = read_upload(multipart).await?;
    let listing = state
        .listing_service
        .create_listing(current_user.id, draft, images)
        .await?;
    Ok(Created(listing))
}

/// Listings owned by the calling partner
#[utoipa::path(
    get,
    path = "/listings",
    tag = "Listings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own listings", body = Vec<Listing>),
        (status = 403, description = "Partner account required")
    )
)]
pub async fn list_own_listings(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<Listing>>>> {
    let listings = state.listing_service.list_own(current_user.id).await?;
    Ok(Json(ApiResponse::success(listings)))
}

/// Get a listing
#[utoipa::path(
    get,
    path = "/listings/{id}",
    tag = "Listings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing", body = Listing),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Listing>>> {
    let listing = state.listing_service.get_listing(id).await?;
    Ok(Json(ApiResponse::success(listing)))
}

/// Delete an own listing without pending bookings
#[utoipa::path(
    delete,
    path = "/listings/{id}",
    tag = "Listings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 204, description = "Listing deleted"),
        (status = 404, description = "Listing not found"),
        (status = 409, description = "Listing has pending bookings")
    )
)]
pub async fn delete_listing(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state
        .listing_service
        .delete_listing(current_user.id, id)
        .await?;
    Ok(NoContent)
}

/// Propose changes to an own listing
#[utoipa::path(
    post,
    path = "/listings/{id}/modification-requests",
    tag = "Listings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Listing ID")),
    request_body = ListingPatch,
    responses(
        (status = 201, description = "Modification request created", body = ModificationRequest),
        (status = 400, description = "Empty or invalid patch"),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn request_update(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(patch): ValidatedJson<ListingPatch>,
) -> AppResult<Created<ModificationRequest>> {
    let request = state
        .listing_service
        .request_update(current_user.id, id, patch)
        .await?;
    Ok(Created(request))
}
