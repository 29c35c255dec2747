//! Calling-account handlers.

use axum::{extract::State, response::Json, routing::get, Router};

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::UserResponse;
use crate::errors::AppResult;
use crate::types::ApiResponse;

pub fn account_routes() -> Router<AppState> {
    Router::new().route("/", get(get_current_user))
}

/// Get the authenticated account
#[utoipa::path(
    get,
    path = "/me",
    tag = "Account",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state.auth_service.current_user(current_user.id).await?;
    Ok(Json(ApiResponse::success(UserResponse::from(user))))
}
