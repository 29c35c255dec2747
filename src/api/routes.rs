//! Application route configuration.

use std::path::Path;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    account_routes, admin_routes, auth_routes, booking_routes, catalog_routes, listing_routes,
    notification_routes, partner_routes, payment_callback, payment_routes, wishlist_routes,
};
use super::middleware::{
    admin_middleware, auth_middleware, rate_limit_auth_middleware, rate_limit_middleware,
};
use super::openapi::ApiDoc;
use super::AppState;

/// Create the application router with all routes configured.
///
/// Stored media under `media_dir` is served at `/media`.
pub fn create_router(state: AppState, media_dir: &Path) -> Router {
    // Protected routes (require JWT + general rate limiting)
    let protected = Router::new()
        .nest("/me", account_routes())
        .nest("/partners", partner_routes())
        .nest("/listings", listing_routes())
        .nest("/categories", catalog_routes())
        .nest("/bookings", booking_routes())
        .nest("/wishlist", wishlist_routes())
        .nest("/notifications", notification_routes())
        .nest("/payments", payment_routes())
        .nest(
            "/admin",
            admin_routes().route_layer(middleware::from_fn(admin_middleware)),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        // Health check endpoints (no rate limiting)
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public authentication routes (stricter rate limiting)
        .nest(
            "/auth",
            auth_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit_auth_middleware,
            )),
        )
        // Gateway return URL, authenticated by its signature
        .route("/payments/callback", post(payment_callback))
        .merge(protected)
        .nest_service("/media", ServeDir::new(media_dir))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Wayfarer travel marketplace API"
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    services: ServiceHealth,
}

/// Individual service health status
#[derive(Serialize)]
struct ServiceHealth {
    database: &'static str,
    redis: &'static str,
}

fn label(healthy: bool) -> &'static str {
    if healthy {
        "healthy"
    } else {
        "unhealthy"
    }
}

/// Health check endpoint with database and Redis connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (database, redis) = tokio::join!(state.database.is_healthy(), state.cache.is_healthy());
    let all_healthy = database && redis;

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" },
        services: ServiceHealth {
            database: label(database),
            redis: label(redis),
        },
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::state::testing::TestState;
    use crate::domain::{Booking, BookingStatus, BookingType, PaymentStatus, User, UserRole};
    use crate::errors::AppError;
    use crate::infra::MockRateLimitStore;
    use crate::services::Claims;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use chrono::Utc;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    const TOKEN: &str = "test-token";

    fn router(state: TestState) -> Router {
        create_router(state.build(), Path::new("./media"))
    }

    /// Resolve any bearer token to `user_id` with `role`.
    fn authenticate(state: &mut TestState, user_id: Uuid, role: UserRole) {
        state
            .auth
            .expect_verify_token()
            .returning(move |_| {
                Ok(Claims {
                    sub: user_id,
                    email: "caller@example.com".into(),
                    role,
                    exp: Utc::now().timestamp() + 3600,
                    iat: Utc::now().timestamp(),
                })
            });
    }

    fn authorized(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", TOKEN));
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn booking(traveler_id: Uuid, status: BookingStatus) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            listing_id: Some(Uuid::new_v4()),
            traveler_id,
            partner_id: Uuid::new_v4(),
            booking_type: BookingType::Group,
            group_size: Some(4),
            total_amount: 1_000_000,
            booking_dates: json!({}),
            status,
            payment_status: PaymentStatus::Pending,
            transaction_ref: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_health_reports_degraded_dependency() {
        let mut state = TestState::new();
        state.database.expect_is_healthy().return_const(true);
        state.cache.expect_is_healthy().return_const(false);

        let response = router(state)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["services"]["redis"], "unhealthy");
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let response = router(TestState::new())
            .oneshot(Request::get("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_me_returns_account_without_hash() {
        let user_id = Uuid::new_v4();
        let mut state = TestState::new();
        authenticate(&mut state, user_id, UserRole::Traveler);
        state.auth.expect_current_user().returning(|id| {
            let mut user = User::new(
                id,
                "caller@example.com".into(),
                "$argon2id$hash".into(),
                "Caller".into(),
            );
            user.role = UserRole::Traveler;
            Ok(user)
        });

        let response = router(state)
            .oneshot(authorized("GET", "/me", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["id"], user_id.to_string());
        assert!(body["data"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_admin_routes_reject_travelers() {
        let mut state = TestState::new();
        authenticate(&mut state, Uuid::new_v4(), UserRole::Traveler);
        state.listings.expect_approve_listing().never();

        let response = router(state)
            .oneshot(authorized(
                "POST",
                &format!("/admin/listings/{}/approve", Uuid::new_v4()),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_cancelling_final_booking_is_state_conflict() {
        let mut state = TestState::new();
        authenticate(&mut state, Uuid::new_v4(), UserRole::Traveler);
        state.bookings.expect_cancel_booking().returning(|_, _| {
            Err(AppError::invalid_state(
                "Booking is CANCELLED and can no longer change",
            ))
        });

        let response = router(state)
            .oneshot(authorized(
                "POST",
                &format!("/bookings/{}/cancel", Uuid::new_v4()),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "STATE_CONFLICT");
    }

    #[tokio::test]
    async fn test_create_booking_returns_created() {
        let traveler_id = Uuid::new_v4();
        let mut state = TestState::new();
        authenticate(&mut state, traveler_id, UserRole::Traveler);
        state
            .bookings
            .expect_create_booking()
            .withf(move |id, input| *id == traveler_id && input.group_size == Some(2))
            .returning(|id, _| Ok(booking(id, BookingStatus::Pending)));

        let response = router(state)
            .oneshot(authorized(
                "POST",
                "/bookings",
                Some(json!({
                    "listing_id": Uuid::new_v4(),
                    "booking_type": "GROUP",
                    "group_size": 2,
                    "booking_dates": { "start": "2026-11-01" }
                })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["data"]["status"], "PENDING");
        assert_eq!(body["data"]["payment_status"], "PENDING");
    }

    #[tokio::test]
    async fn test_invalid_review_rejected_before_service() {
        let mut state = TestState::new();
        authenticate(&mut state, Uuid::new_v4(), UserRole::Traveler);
        state.bookings.expect_create_review().never();

        let response = router(state)
            .oneshot(authorized(
                "POST",
                &format!("/bookings/{}/reviews", Uuid::new_v4()),
                Some(json!({ "rating": 6, "comment": "Too good" })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_auth_rate_limit_fails_closed() {
        let mut state = TestState::new();
        let mut limiter = MockRateLimitStore::new();
        limiter
            .expect_check_rate_limit()
            .returning(|_, _, _| Err(AppError::internal("redis down")));
        state.rate_limiter = limiter;
        state.auth.expect_request_otp().never();

        let response = router(state)
            .oneshot(
                Request::post("/auth/otp")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({ "email": "a@b.co" }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_payment_callback_is_public() {
        let mut state = TestState::new();
        state
            .payments
            .expect_verify_payment()
            .withf(|params| params.get("pp_ResponseCode").map(String::as_str) == Some("000"))
            .returning(|params| {
                Ok(crate::domain::PaymentConfirmation {
                    transaction_id: params["pp_TxnRefNo"].clone(),
                    amount: 100.0,
                })
            });

        let response = router(state)
            .oneshot(
                Request::post("/payments/callback")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("pp_TxnRefNo=T123&pp_ResponseCode=000"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["data"]["transaction_id"], "T123");
    }
}
