//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::AppError;

/// Validated JSON extractor that automatically validates requests.
///
/// # Example
///
/// ```rust,ignore
/// use serde::Deserialize;
/// use validator::Validate;
/// use wayfarer::api::extractors::ValidatedJson;
///
/// #[derive(Deserialize, Validate)]
/// struct ReviewRequest {
///     #[validate(range(min = 1, max = 5))]
///     rating: i16,
/// }
///
/// async fn review(ValidatedJson(payload): ValidatedJson<ReviewRequest>) {
///     // payload is already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
        name: String,
    }

    fn request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_payload_passes() {
        let ValidatedJson(payload) =
            ValidatedJson::<Payload>::from_request(request(r#"{"name":"Skardu"}"#), &())
                .await
                .unwrap();
        assert_eq!(payload.name, "Skardu");
    }

    #[tokio::test]
    async fn test_rule_violation_is_validation_error() {
        let result = ValidatedJson::<Payload>::from_request(request(r#"{"name":"K2"}"#), &()).await;
        assert!(
            matches!(result, Err(AppError::Validation(ref m)) if m.contains("at least 3 characters"))
        );
    }

    #[tokio::test]
    async fn test_malformed_json_is_validation_error() {
        let result = ValidatedJson::<Payload>::from_request(request("{"), &()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
