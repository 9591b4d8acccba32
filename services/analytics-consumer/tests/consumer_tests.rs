//! End-to-end tests for the consumer: events published by the order flow,
//! replayed through the in-memory bus, plus the HTTP endpoints.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use analytics_consumer::{ConsumerStats, OrderConsumer, router};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use metrics_exporter_prometheus::PrometheusBuilder;
use microshop_core::event::SerializedEvent;
use microshop_core::event_bus::EventBus;
use microshop_core::order_event::ORDERS_EXCHANGE;
use microshop_core::{Money, Order, OrderEvent, OrderId, UserId};
use microshop_testing::{RecordingEventBus, test_clock};
use microshop_core::environment::Clock;
use std::str::FromStr;
use tower::ServiceExt;

fn order(id: i64) -> Order {
    Order {
        id: OrderId::new(id),
        user_id: UserId::new(7),
        total: Money::from_str("19.99").unwrap(),
        created_at: test_clock().now().naive_utc(),
    }
}

async fn publish(bus: &RecordingEventBus, event: SerializedEvent) {
    bus.publish(ORDERS_EXCHANGE, &event).await.unwrap();
}

#[tokio::test]
async fn consumes_every_order_published_to_the_exchange() {
    let bus = RecordingEventBus::new();
    for id in 1..=3 {
        let event = SerializedEvent::from_event(&OrderEvent::created(&order(id)), None).unwrap();
        publish(&bus, event).await;
    }
    publish(
        &bus,
        SerializedEvent::new("order.created".to_string(), b"garbage".to_vec(), None),
    )
    .await;
    bus.publish(
        "users.ex",
        &SerializedEvent::from_event(&OrderEvent::created(&order(9)), None).unwrap(),
    )
    .await
    .unwrap();

    let stats = OrderConsumer::new()
        .consume(&bus, ORDERS_EXCHANGE)
        .await
        .unwrap();

    assert_eq!(
        stats,
        ConsumerStats {
            processed: 3,
            rejected: 1,
            transport_errors: 0,
        }
    );
}

#[tokio::test]
async fn health_reports_up() {
    let handle = PrometheusBuilder::new().build_recorder().handle();

    let response = router(handle)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, serde_json::json!({ "status": "UP" }));
}

#[tokio::test]
async fn metrics_endpoint_renders_the_processed_counter() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    let event = SerializedEvent::from_event(&OrderEvent::created(&order(1)), None).unwrap();
    metrics::with_local_recorder(&recorder, || {
        OrderConsumer::new().process(&event).unwrap();
        OrderConsumer::new().process(&event).unwrap();
    });

    let response = router(handle)
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("orders_processed_total 2"), "{text}");
}
