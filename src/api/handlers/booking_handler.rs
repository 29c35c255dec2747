//! Booking handlers for travelers and partners.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{Booking, BookingStatus, Message, NewBooking, NewMessage, NewReview, Review};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created, Paginated, PaginationParams};

/// Partner status change
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_my_bookings).post(create_booking))
        .route("/partner", get(list_partner_bookings))
        .route("/:id/status", patch(update_status))
        .route("/:id/cancel", post(cancel_booking))
        .route("/:id/reviews", post(create_review))
        .route("/:id/messages", post(send_message))
}

/// Book an approved listing
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    request_body = NewBooking,
    responses(
        (status = 201, description = "Booking created", body = Booking),
        (status = 400, description = "Listing not bookable or invalid input"),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<NewBooking>,
) -> AppResult<Created<Booking>> {
    let booking = state
        .booking_service
        .create_booking(current_user.id, payload)
        .await?;
    Ok(Created(booking))
}

/// Bookings made by the caller
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Items per page")
    ),
    responses((status = 200, description = "Paginated bookings"))
)]
pub async fn list_my_bookings(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<Booking>>>> {
    let (page, per_page) = (params.page, params.limit());
    let (bookings, total) = state
        .booking_service
        .list_traveler_bookings(current_user.id, params)
        .await?;
    Ok(Json(ApiResponse::success(Paginated::new(
        bookings, page, per_page, total,
    ))))
}

/// Bookings of the caller's partner account
#[utoipa::path(
    get,
    path = "/bookings/partner",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Paginated bookings"),
        (status = 403, description = "Partner account required")
    )
)]
pub async fn list_partner_bookings(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<Booking>>>> {
    let (page, per_page) = (params.page, params.limit());
    let (bookings, total) = state
        .booking_service
        .list_partner_bookings(current_user.id, params)
        .await?;
    Ok(Json(ApiResponse::success(Paginated::new(
        bookings, page, per_page, total,
    ))))
}

/// Move a booking to its next status (partner)
#[utoipa::path(
    patch,
    path = "/bookings/{id}/status",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Booking ID")),
    request_body = UpdateBookingStatusRequest,
    responses(
        (status = 200, description = "Booking updated", body = Booking),
        (status = 400, description = "Transition not allowed"),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking is already final")
    )
)]
pub async fn update_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateBookingStatusRequest>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    let booking = state
        .booking_service
        .update_status(current_user.id, id, payload.status)
        .await?;
    Ok(Json(ApiResponse::success(booking)))
}

/// Cancel an own booking
#[utoipa::path(
    post,
    path = "/bookings/{id}/cancel",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled", body = Booking),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking is already final")
    )
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    let booking = state
        .booking_service
        .cancel_booking(current_user.id, id)
        .await?;
    Ok(Json(ApiResponse::with_message(booking, "Booking cancelled")))
}

/// Review an own booking
#[utoipa::path(
    post,
    path = "/bookings/{id}/reviews",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Booking ID")),
    request_body = NewReview,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 400, description = "Invalid rating"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn create_review(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<NewReview>,
) -> AppResult<Created<Review>> {
    let review = state
        .booking_service
        .create_review(current_user.id, id, payload)
        .await?;
    Ok(Created(review))
}

/// Message the other party of a booking
#[utoipa::path(
    post,
    path = "/bookings/{id}/messages",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Booking ID")),
    request_body = NewMessage,
    responses(
        (status = 201, description = "Message sent", body = Message),
        (status = 403, description = "Not a participant"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn send_message(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<NewMessage>,
) -> AppResult<Created<Message>> {
    let message = state
        .booking_service
        .send_message(current_user.id, id, payload)
        .await?;
    Ok(Created(message))
}
