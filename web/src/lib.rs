//! Axum integration shared by the Microshop services.
//!
//! Each service is a thin imperative shell over a service struct:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           HTTP shell (Axum)             │  ← routing, JSON, status codes
//! │  - ValidatedJson / PathId extraction    │  ← 400 before any side effect
//! │  - AppError rendering                   │  ← {"code", "message"}
//! │  - correlation IDs, tracing spans       │
//! ├─────────────────────────────────────────┤
//! │           Service                       │
//! │  - repository calls                     │  ← Arc<dyn ...Repository>
//! │  - event publication                    │  ← Arc<dyn EventBus>
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Request Flow
//!
//! 1. **Correlation ID** assigned by [`correlation_id_layer`]
//! 2. **Extract** path id and JSON body, validating both
//! 3. **Call** the service
//! 4. **Map** the result: success status chosen by the handler, failures via
//!    `From<ServiceError> for AppError`
//!
//! # Example
//!
//! ```ignore
//! use microshop_web::{AppError, ValidatedJson};
//! use axum::{Router, routing::post, Json, http::StatusCode};
//!
//! async fn create_user(
//!     State(service): State<Arc<UserService>>,
//!     ValidatedJson(request): ValidatedJson<UserRequest>,
//! ) -> Result<(StatusCode, Json<User>), AppError> {
//!     let user = service.create(request.into_profile()).await?;
//!     Ok((StatusCode::CREATED, Json(user)))
//! }
//!
//! let app = Router::new()
//!     .route("/api/users", post(create_user))
//!     .with_state(service);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod server;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::{CorrelationId, PathId, Validate, ValidatedJson};
pub use handlers::health_check;
pub use middleware::{CORRELATION_ID_HEADER, correlation_id_layer};
pub use server::{ServerConfig, shutdown_signal};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
