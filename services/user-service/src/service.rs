//! User use cases.

use microshop_core::repository::UserRepository;
use microshop_core::{ServiceError, User, UserId, UserProfile};
use std::sync::Arc;

/// CRUD over users. Every operation is a single repository call.
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    /// Wire the service to its store.
    #[must_use]
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// All users, ascending by id.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Persistence`] if the store cannot be read.
    pub async fn list(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.repository.find_all().await?)
    }

    /// The user with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if no such user exists.
    pub async fn get(&self, id: UserId) -> Result<User, ServiceError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", id.get()))
    }

    /// Store a new user.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Persistence`] if the insert fails.
    pub async fn create(&self, profile: UserProfile) -> Result<User, ServiceError> {
        let user = self.repository.insert(profile).await?;
        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Overwrite the profile of the user with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if no such user exists.
    pub async fn update(&self, id: UserId, profile: UserProfile) -> Result<User, ServiceError> {
        let user = self
            .repository
            .update(User::from_profile(id, profile))
            .await?;
        tracing::info!(user_id = %user.id, "User updated");
        Ok(user)
    }

    /// Remove the user with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if no such user exists.
    pub async fn delete(&self, id: UserId) -> Result<(), ServiceError> {
        self.repository.delete_by_id(id).await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}
