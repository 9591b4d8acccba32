//! # User Service
//!
//! Create, read, update and delete users stored in Postgres. This service
//! publishes nothing.
//!
//! | Method | Path | Success | Failure |
//! |---|---|---|---|
//! | GET | `/api/users` | 200, all users | 500 |
//! | GET | `/api/users/{id}` | 200, user | 400, 404 |
//! | POST | `/api/users` | 201, stored user | 400, 500 |
//! | PUT | `/api/users/{id}` | 200, updated user | 400, 404 |
//! | DELETE | `/api/users/{id}` | 204 | 400, 404 |
//! | GET | `/health` | 200 `{"status":"UP"}` | |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod service;

pub use api::router;
pub use config::Config;
pub use service::UserService;
