//! Payment handlers: form initiation and the gateway callback.

use std::collections::BTreeMap;

use axum::{
    extract::{rejection::FormRejection, State},
    response::Json,
    routing::post,
    Form, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{PaymentConfirmation, PaymentForm};
use crate::errors::{AppError, AppResult};
use crate::types::ApiResponse;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct InitiatePaymentRequest {
    pub booking_id: Uuid,
    #[validate(length(max = 100, message = "Description is too long"))]
    pub description: Option<String>,
}

/// Routes that need an authenticated traveler; the callback is mounted
/// publicly by the router.
pub fn payment_routes() -> Router<AppState> {
    Router::new().route("/initiate", post(initiate_payment))
}

/// Build the signed gateway form for a booking
#[utoipa::path(
    post,
    path = "/payments/initiate",
    tag = "Payments",
    security(("bearer_auth" = [])),
    request_body = InitiatePaymentRequest,
    responses(
        (status = 200, description = "Form to post to the gateway", body = PaymentForm),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking cannot be paid"),
        (status = 502, description = "Payment gateway unavailable")
    )
)]
pub async fn initiate_payment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<InitiatePaymentRequest>,
) -> AppResult<Json<ApiResponse<PaymentForm>>> {
    let form = state
        .payment_service
        .initiate_payment(current_user.id, payload.booking_id, payload.description)
        .await?;
    Ok(Json(ApiResponse::success(form)))
}

/// Gateway return URL
#[utoipa::path(
    post,
    path = "/payments/callback",
    tag = "Payments",
    request_body(content = BTreeMap<String, String>, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Payment confirmed", body = PaymentConfirmation),
        (status = 400, description = "Payment failed or signature invalid")
    )
)]
pub async fn payment_callback(
    State(state): State<AppState>,
    form: Result<Form<BTreeMap<String, String>>, FormRejection>,
) -> AppResult<Json<ApiResponse<PaymentConfirmation>>> {
    let Form(params) = form.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let confirmation = state.payment_service.verify_payment(params).await?;
    Ok(Json(ApiResponse::with_message(
        confirmation,
        "Payment verified successfully",
    )))
}
