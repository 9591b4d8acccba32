//! HTTP surface of the order service.

use crate::service::OrderService;
use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use microshop_core::{Decimal, Money, NewOrder, Order, UserId};
use microshop_web::{CorrelationId, Validate, ValidatedJson, WebResult, correlation_id_layer};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Totals, once rounded to cents, must stay below this to fit a
/// `NUMERIC(19, 2)` column.
const TOTAL_LIMIT: i64 = 100_000_000_000_000_000;

/// Body of `POST /api/orders`.
///
/// `id` and `createdAt` are assigned by the store; if a client sends them they
/// are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// User placing the order.
    pub user_id: Option<i64>,
    /// Order total.
    pub total: Option<Money>,
}

impl Validate for OrderRequest {
    fn validate(&self) -> Result<(), String> {
        match self.user_id {
            None => return Err("userId is required".to_string()),
            Some(id) if id <= 0 => return Err("userId must be a positive number".to_string()),
            Some(_) => {}
        }
        match self.total {
            None => Err("total is required".to_string()),
            Some(total) if total.is_negative() => Err("total must not be negative".to_string()),
            Some(total) if total.round_to(2).amount() >= Decimal::from(TOTAL_LIMIT) => {
                Err("total must be less than 100000000000000000".to_string())
            }
            Some(_) => Ok(()),
        }
    }
}

impl OrderRequest {
    /// The unsaved order described by a validated request.
    fn into_new_order(self) -> NewOrder {
        NewOrder::new(
            UserId::new(self.user_id.unwrap_or_default()),
            self.total.unwrap_or_default(),
        )
    }
}

/// `GET /api/orders`
pub async fn list_orders(State(service): State<Arc<OrderService>>) -> WebResult<Json<Vec<Order>>> {
    Ok(Json(service.list().await?))
}

/// `POST /api/orders`
pub async fn create_order(
    State(service): State<Arc<OrderService>>,
    correlation_id: CorrelationId,
    ValidatedJson(request): ValidatedJson<OrderRequest>,
) -> WebResult<(StatusCode, Json<Order>)> {
    let order = service
        .create(request.into_new_order(), Some(correlation_id.0))
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Build the order service router.
pub fn router(service: Arc<OrderService>) -> Router {
    Router::new()
        .route("/api/orders", get(list_orders).post(create_order))
        .route("/health", get(microshop_web::health_check))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn request(user_id: Option<i64>, total: Option<&str>) -> OrderRequest {
        OrderRequest {
            user_id,
            total: total.map(|t| Money::from_str(t).unwrap()),
        }
    }

    #[test]
    fn accepts_zero_total() {
        assert_eq!(request(Some(1), Some("0")).validate(), Ok(()));
    }

    #[test]
    fn rejects_missing_and_out_of_range_fields() {
        assert_eq!(
            request(None, Some("1")).validate(),
            Err("userId is required".to_string())
        );
        assert_eq!(
            request(Some(0), Some("1")).validate(),
            Err("userId must be a positive number".to_string())
        );
        assert_eq!(
            request(Some(1), None).validate(),
            Err("total is required".to_string())
        );
        assert_eq!(
            request(Some(1), Some("-0.01")).validate(),
            Err("total must not be negative".to_string())
        );
        assert!(request(Some(1), Some("100000000000000000")).validate().is_err());
        assert!(request(Some(1), Some("99999999999999999.99")).validate().is_ok());
    }

    #[test]
    fn limit_applies_to_the_amount_as_stored() {
        assert_eq!(
            request(Some(1), Some("99999999999999999.995")).validate(),
            Err("total must be less than 100000000000000000".to_string())
        );
        assert!(request(Some(1), Some("99999999999999999.999")).validate().is_err());
        assert!(request(Some(1), Some("99999999999999999.994")).validate().is_ok());
    }

    proptest::proptest! {
        #[test]
        fn positive_user_and_non_negative_cents_are_accepted(
            user_id in 1..i64::MAX,
            cents in 0..1_000_000_000_i64,
        ) {
            let request = OrderRequest {
                user_id: Some(user_id),
                total: Some(Money::new(Decimal::new(cents, 2))),
            };
            proptest::prop_assert_eq!(request.validate(), Ok(()));
        }
    }

    #[test]
    fn client_supplied_id_and_timestamp_are_ignored() {
        let parsed: OrderRequest = serde_json::from_str(
            r#"{"id":99,"userId":7,"total":19.99,"createdAt":"1999-01-01T00:00:00"}"#,
        )
        .unwrap();

        let order = parsed.into_new_order();
        assert_eq!(order.user_id, UserId::new(7));
        assert_eq!(order.total, Money::from_str("19.99").unwrap());
    }
}
