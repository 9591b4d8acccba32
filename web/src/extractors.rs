//! Custom Axum extractors.
//!
//! This module contains custom extractors for common HTTP patterns:
//! - `CorrelationId`: the request's correlation ID
//! - `ValidatedJson`: a JSON body that passed its [`Validate`] rules
//! - `PathId`: a numeric `{id}` path segment
//!
//! `ValidatedJson` and `PathId` reject with [`AppError::validation`], so a
//! malformed body, a failed rule and a non-numeric id all produce the same
//! 400 `VALIDATION_ERROR` body.
//!
//! # Examples
//!
//! ```ignore
//! use microshop_web::extractors::{CorrelationId, PathId, ValidatedJson};
//!
//! async fn handler(
//!     correlation_id: CorrelationId,
//!     PathId(id): PathId,
//!     ValidatedJson(request): ValidatedJson<UserRequest>,
//! ) -> Result<Json<User>, AppError> {
//!     tracing::info!(correlation_id = %correlation_id.0, id, "Updating user");
//!     // ...
//! }
//! ```

use crate::error::AppError;
use axum::{
    Json, async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// Correlation ID for request tracing.
///
/// Uses the ID stored by [`correlation_id_layer`](crate::middleware::correlation_id_layer)
/// when the layer is installed, so handler logs and the response header
/// agree. Otherwise reads the `X-Correlation-ID` header, or generates a new
/// UUID v4.
#[derive(Debug, Clone, Copy)]
pub struct CorrelationId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<Uuid>() {
            return Ok(Self(*id));
        }

        let correlation_id = parts
            .headers
            .get(crate::middleware::CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);

        Ok(Self(correlation_id))
    }
}

/// Field-level rules checked after a request body has been deserialized.
pub trait Validate {
    /// Check the rules.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first violated rule.
    fn validate(&self) -> Result<(), String>;
}

/// JSON body that deserialized and passed [`Validate::validate`].
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::validation(rejection.body_text()))?;

        value.validate().map_err(AppError::validation)?;

        Ok(Self(value))
    }
}

/// A single `{id}` path parameter parsed as `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::validation(rejection.body_text()))?;

        Ok(Self(id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        routing::{get, post},
    };
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize)]
    struct Greeting {
        name: Option<String>,
    }

    impl Validate for Greeting {
        fn validate(&self) -> Result<(), String> {
            match self.name.as_deref() {
                Some(name) if !name.trim().is_empty() => Ok(()),
                _ => Err("name is required".to_string()),
            }
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn greeting_app() -> Router {
        Router::new().route(
            "/greet",
            post(|ValidatedJson(g): ValidatedJson<Greeting>| async move {
                g.name.unwrap_or_default()
            }),
        )
    }

    fn post_json(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/greet")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_correlation_id_from_header() {
        let uuid = Uuid::new_v4();
        let req = Request::builder()
            .header("X-Correlation-ID", uuid.to_string())
            .body(())
            .expect("Valid request");

        let (mut parts, _) = req.into_parts();
        let correlation_id = CorrelationId::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(correlation_id.0, uuid);
    }

    #[tokio::test]
    async fn test_correlation_id_prefers_extension() {
        let stored = Uuid::new_v4();
        let req = Request::builder()
            .header("X-Correlation-ID", Uuid::new_v4().to_string())
            .body(())
            .expect("Valid request");

        let (mut parts, _) = req.into_parts();
        parts.extensions.insert(stored);
        let correlation_id = CorrelationId::from_request_parts(&mut parts, &())
            .await
            .expect("Should extract");

        assert_eq!(correlation_id.0, stored);
    }

    #[tokio::test]
    async fn test_valid_json_passes() {
        let response = greeting_app()
            .oneshot(post_json(r#"{"name":"Ada"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_failed_rule_is_validation_error() {
        let response = greeting_app()
            .oneshot(post_json(r#"{"name":"  "}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "name is required");
    }

    #[tokio::test]
    async fn test_malformed_json_is_validation_error() {
        let response = greeting_app().oneshot(post_json("{")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_missing_content_type_is_validation_error() {
        let request = Request::builder()
            .method("POST")
            .uri("/greet")
            .body(Body::from(r#"{"name":"Ada"}"#))
            .unwrap();

        let response = greeting_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_non_numeric_path_id_is_validation_error() {
        let app = Router::new().route("/items/:id", get(|PathId(id): PathId| async move { id.to_string() }));

        let ok = app
            .clone()
            .oneshot(Request::builder().uri("/items/42").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bad = app
            .oneshot(Request::builder().uri("/items/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(ok.status(), StatusCode::OK);
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(bad).await["code"], "VALIDATION_ERROR");
    }
}
