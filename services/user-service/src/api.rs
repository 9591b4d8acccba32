//! HTTP surface of the user service.

use crate::service::UserService;
use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use microshop_core::{User, UserId, UserProfile};
use microshop_web::{PathId, Validate, ValidatedJson, WebResult, correlation_id_layer};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

const MAX_FIELD_LENGTH: usize = 255;

/// Body of `POST /api/users` and `PUT /api/users/{id}`.
///
/// An `id` in the body is ignored; the store or the path decides it.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRequest {
    /// Display name.
    pub name: Option<String>,
    /// Contact email address.
    pub email: Option<String>,
}

fn check_length(field: &str, value: &str) -> Result<(), String> {
    if value.chars().count() > MAX_FIELD_LENGTH {
        return Err(format!("{field} must be at most {MAX_FIELD_LENGTH} characters"));
    }
    Ok(())
}

fn is_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

impl Validate for UserRequest {
    fn validate(&self) -> Result<(), String> {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => check_length("name", name)?,
            _ => return Err("name is required".to_string()),
        }
        match self.email.as_deref() {
            Some(email) if !email.trim().is_empty() => {
                check_length("email", email)?;
                if !is_email(email) {
                    return Err("email must be a valid email address".to_string());
                }
                Ok(())
            }
            _ => Err("email is required".to_string()),
        }
    }
}

impl UserRequest {
    fn into_profile(self) -> UserProfile {
        UserProfile {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
        }
    }
}

/// `GET /api/users`
pub async fn list_users(State(service): State<Arc<UserService>>) -> WebResult<Json<Vec<User>>> {
    Ok(Json(service.list().await?))
}

/// `GET /api/users/{id}`
pub async fn get_user(
    State(service): State<Arc<UserService>>,
    PathId(id): PathId,
) -> WebResult<Json<User>> {
    Ok(Json(service.get(UserId::new(id)).await?))
}

/// `POST /api/users`
pub async fn create_user(
    State(service): State<Arc<UserService>>,
    ValidatedJson(request): ValidatedJson<UserRequest>,
) -> WebResult<(StatusCode, Json<User>)> {
    let user = service.create(request.into_profile()).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `PUT /api/users/{id}`
pub async fn update_user(
    State(service): State<Arc<UserService>>,
    PathId(id): PathId,
    ValidatedJson(request): ValidatedJson<UserRequest>,
) -> WebResult<Json<User>> {
    Ok(Json(
        service
            .update(UserId::new(id), request.into_profile())
            .await?,
    ))
}

/// `DELETE /api/users/{id}`
pub async fn delete_user(
    State(service): State<Arc<UserService>>,
    PathId(id): PathId,
) -> WebResult<StatusCode> {
    service.delete(UserId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Build the user service router.
pub fn router(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/health", get(microshop_web::health_check))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: Option<&str>, email: Option<&str>) -> UserRequest {
        UserRequest {
            name: name.map(str::to_string),
            email: email.map(str::to_string),
        }
    }

    #[test]
    fn accepts_a_plain_profile() {
        assert_eq!(request(Some("Ada"), Some("ada@example.com")).validate(), Ok(()));
    }

    #[test]
    fn requires_non_blank_fields() {
        assert_eq!(
            request(None, Some("ada@example.com")).validate(),
            Err("name is required".to_string())
        );
        assert_eq!(
            request(Some("   "), Some("ada@example.com")).validate(),
            Err("name is required".to_string())
        );
        assert_eq!(
            request(Some("Ada"), None).validate(),
            Err("email is required".to_string())
        );
    }

    #[test]
    fn rejects_malformed_emails() {
        for email in ["ada", "@example.com", "ada@", "a@b@c", "ada @example.com"] {
            assert_eq!(
                request(Some("Ada"), Some(email)).validate(),
                Err("email must be a valid email address".to_string()),
                "{email}"
            );
        }
    }

    #[test]
    fn enforces_field_length() {
        let long = "x".repeat(256);
        assert!(request(Some(&long), Some("ada@example.com")).validate().is_err());
        assert!(request(Some(&"x".repeat(255)), Some("ada@example.com")).validate().is_ok());

        let long_email = format!("{}@example.com", "a".repeat(250));
        assert_eq!(
            request(Some("Ada"), Some(&long_email)).validate(),
            Err("email must be at most 255 characters".to_string())
        );
    }
}
