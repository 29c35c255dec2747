//! Authentication handlers.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::TokenResponse;
use crate::types::ApiResponse;

/// One-time code request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct OtpRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "traveler@example.com")]
    pub email: String,
}

/// Account registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignUpRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "traveler@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Ayesha Khan")]
    pub name: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    #[validate(length(equal = 6, message = "OTP must be 6 digits"))]
    #[schema(example = "482913")]
    pub otp: String,
}

/// Sign-in request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignInRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "traveler@example.com")]
    pub email: String,
    #[schema(example = "SecurePass123!")]
    pub password: String,
    #[validate(length(equal = 6, message = "OTP must be 6 digits"))]
    #[schema(example = "482913")]
    pub otp: String,
}

/// Password reset request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(equal = 6, message = "OTP must be 6 digits"))]
    pub otp: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/otp", post(request_otp))
        .route("/signup", post(sign_up))
        .route("/signin", post(sign_in))
        .route("/reset-password", post(reset_password))
}

/// Email a one-time code
#[utoipa::path(
    post,
    path = "/auth/otp",
    tag = "Authentication",
    request_body = OtpRequest,
    responses(
        (status = 200, description = "OTP sent"),
        (status = 400, description = "Validation error"),
        (status = 429, description = "Too many requests")
    )
)]
pub async fn request_otp(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<OtpRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.auth_service.request_otp(payload.email).await?;
    Ok(Json(ApiResponse::message("OTP sent successfully")))
}

/// Register a traveler account
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "Authentication",
    request_body = SignUpRequest,
    responses(
        (status = 200, description = "Account created", body = TokenResponse),
        (status = 400, description = "Validation error or invalid OTP"),
        (status = 409, description = "User already exists")
    )
)]
pub async fn sign_up(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignUpRequest>,
) -> AppResult<Json<ApiResponse<TokenResponse>>> {
    let token = state
        .auth_service
        .sign_up(payload.email, payload.name, payload.password, payload.otp)
        .await?;

    Ok(Json(ApiResponse::with_message(token, "Account created")))
}

/// Sign in and get a JWT token
#[utoipa::path(
    post,
    path = "/auth/signin",
    tag = "Authentication",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Sign-in successful", body = TokenResponse),
        (status = 400, description = "Validation error or invalid OTP"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn sign_in(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignInRequest>,
) -> AppResult<Json<ApiResponse<TokenResponse>>> {
    let token = state
        .auth_service
        .sign_in(payload.email, payload.password, payload.otp)
        .await?;

    Ok(Json(ApiResponse::success(token)))
}

/// Replace a forgotten password
#[utoipa::path(
    post,
    path = "/auth/reset-password",
    tag = "Authentication",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password updated"),
        (status = 400, description = "Validation error or invalid OTP"),
        (status = 404, description = "User not found")
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ResetPasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .auth_service
        .reset_password(payload.email, payload.otp, payload.new_password)
        .await?;

    Ok(Json(ApiResponse::message("Password updated successfully")))
}
