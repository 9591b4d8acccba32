//! Order use cases.

use crate::publisher::OrderPublisher;
use microshop_core::repository::OrderRepository;
use microshop_core::{NewOrder, Order, ServiceError};
use std::sync::Arc;
use uuid::Uuid;

/// Lists and creates orders.
///
/// `create` is persist-then-publish with no transaction around the two:
///
/// 1. the repository stores the order and assigns its id and `created_at`
/// 2. the event is built from the stored record and sent in the background
///
/// If step 1 fails nothing is published. If step 2 fails the order stays
/// stored and the caller still gets it back. A crash between the two loses
/// the event.
#[derive(Clone)]
pub struct OrderService {
    repository: Arc<dyn OrderRepository>,
    publisher: OrderPublisher,
}

impl OrderService {
    /// Wire the service to its store and publisher.
    #[must_use]
    pub fn new(repository: Arc<dyn OrderRepository>, publisher: OrderPublisher) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    /// All orders, ascending by id.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Persistence`] if the store cannot be read.
    pub async fn list(&self) -> Result<Vec<Order>, ServiceError> {
        Ok(self.repository.find_all().await?)
    }

    /// Store `order` and announce it.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Persistence`] if the store rejects the insert.
    /// Publication failures are never returned.
    pub async fn create(
        &self,
        order: NewOrder,
        correlation_id: Option<Uuid>,
    ) -> Result<Order, ServiceError> {
        let stored = self.repository.save(order).await?;

        tracing::info!(
            order_id = %stored.id,
            user_id = %stored.user_id,
            total = %stored.total,
            "Order created"
        );

        // The handle is dropped: the response does not wait for the broker.
        let _ = self.publisher.publish_created(&stored, correlation_id);

        Ok(stored)
    }
}
