//! Partner self-service handlers.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{OnboardingUser, Partner, PartnerOnboarding, PartnerType};
use crate::errors::AppResult;
use crate::services::PartnerProfileView;
use crate::types::{ApiResponse, Created};

/// Onboarding submission for the calling account
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct OnboardingRequest {
    pub partner_type: PartnerType,
    /// Display name to keep on the account
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// Type-specific profile data
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

pub fn partner_routes() -> Router<AppState> {
    Router::new()
        .route("/onboarding", post(initiate_onboarding))
        .route("/me", get(get_profile))
}

/// Become a partner
#[utoipa::path(
    post,
    path = "/partners/onboarding",
    tag = "Partners",
    security(("bearer_auth" = [])),
    request_body = OnboardingRequest,
    responses(
        (status = 201, description = "Partner account created", body = Partner),
        (status = 400, description = "Invalid profile data"),
        (status = 409, description = "Already a partner")
    )
)]
pub async fn initiate_onboarding(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidatedJson(payload): ValidatedJson<OnboardingRequest>,
) -> AppResult<Created<Partner>> {
    let onboarding = PartnerOnboarding {
        partner_type: payload.partner_type,
        user: OnboardingUser {
            name: payload.name,
            email: current_user.email,
        },
        data: payload.data,
    };

    let partner = state.partner_service.initiate_onboarding(onboarding).await?;
    Ok(Created(partner))
}

/// Calling partner's profile and category grants
#[utoipa::path(
    get,
    path = "/partners/me",
    tag = "Partners",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Partner profile", body = PartnerProfileView),
        (status = 404, description = "Not a partner")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<ApiResponse<PartnerProfileView>>> {
    let profile = state.partner_service.get_profile(current_user.id).await?;
    Ok(Json(ApiResponse::success(profile)))
}
