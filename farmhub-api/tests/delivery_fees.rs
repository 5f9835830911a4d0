use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use farmhub_api::{app, AppState};
use farmhub_shared::{Customer, CustomerType, DeliveryRoute, Order, RawAmount};
use farmhub_store::{app_config::CorrectorConfig, InMemoryStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

struct Fixture {
    store: Arc<InMemoryStore>,
    undercharged: Order,
}

fn fixture() -> Fixture {
    let route = DeliveryRoute {
        id: Uuid::new_v4(),
        delivery_fee_home: Some(3i64.into()),
        home_min_free_delivery: Some(20i64.into()),
        ..Default::default()
    };
    let customer = Customer {
        delivery_route_id: Some(route.id),
        ..Customer::new(Uuid::new_v4(), CustomerType::Home)
    };

    let mut undercharged = Order::new(customer.id).with_item(1i64, "15");
    undercharged.delivery_price = Some(RawAmount::from(0i64));
    undercharged.total_price = Some(RawAmount::from(15i64));

    let mut correct = Order::new(customer.id).with_item(1i64, "25");
    correct.delivery_price = Some(RawAmount::from(0i64));
    correct.total_price = Some(RawAmount::from(25i64));

    let store = Arc::new(InMemoryStore::new(
        vec![undercharged.clone(), correct],
        vec![customer],
        vec![route],
    ));
    Fixture { store, undercharged }
}

fn router(store: Arc<InMemoryStore>) -> Router {
    app(AppState {
        store,
        corrector: CorrectorConfig::default(),
    })
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_options_is_preflight() {
    let fixture = fixture();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/fix-order-delivery-fees")
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(router(fixture.store.clone()), request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(fixture.store.writes().await.is_empty());
}

#[tokio::test]
async fn test_cors_preflight_headers() {
    let fixture = fixture();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/functions/v1/fix-order-delivery-fees")
        .header("origin", "https://farm.example.co")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();

    let response = router(fixture.store.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    assert!(fixture.store.writes().await.is_empty());
}

#[tokio::test]
async fn test_post_runs_correction() {
    let fixture = fixture();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/fix-order-delivery-fees")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(router(fixture.store.clone()), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["ordersChecked"], 2);
    assert_eq!(body["ordersUpdated"], 1);
    assert!(body["logs"].as_array().unwrap().len() >= 2);

    let writes = fixture.store.writes().await;
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].0, fixture.undercharged.id);

    // Same request again finds nothing to fix
    let request = Request::builder()
        .method(Method::GET)
        .uri("/fix-order-delivery-fees")
        .body(Body::empty())
        .unwrap();
    let (_, body) = send(router(fixture.store.clone()), request).await;
    assert_eq!(body["ordersUpdated"], 0);
}

#[tokio::test]
async fn test_dry_run_query() {
    let fixture = fixture();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/fix-order-delivery-fees?dryRun=true")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(router(fixture.store.clone()), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dryRun"], true);
    assert_eq!(body["correctedCount"], 1);
    assert_eq!(body["ordersUpdated"], 0);
    assert!(fixture.store.writes().await.is_empty());
}

#[tokio::test]
async fn test_malformed_dry_run_is_json_error() {
    let fixture = fixture();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/fix-order-delivery-fees?dryRun=abc")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(router(fixture.store.clone()), request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("query string"));
    assert!(fixture.store.writes().await.is_empty());
}

#[tokio::test]
async fn test_store_outage_is_500() {
    let fixture = fixture();
    fixture.store.set_offline(true);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/fix-order-delivery-fees")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(router(fixture.store.clone()), request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("failed to load"));
}

#[tokio::test]
async fn test_quote_endpoint() {
    let route_id = Uuid::new_v4();
    let payload = json!({
        "order": {
            "id": Uuid::new_v4(),
            "charge_delivery": true,
            "order_items": [{ "quantity": "3", "price_per_unit": "5,00" }]
        },
        "customer": {
            "id": Uuid::new_v4(),
            "customer_type": "home",
            "delivery_route_id": route_id
        },
        "route": { "id": route_id, "delivery_fee_home": 3, "home_min_free_delivery": 20 }
    });
    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/delivery-fees/quote")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();

    let (status, body) = send(router(Arc::new(InMemoryStore::default())), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fee"], 3.0);
    assert_eq!(body["subtotal"], 15.0);
    assert_eq!(body["reason"]["rule"], "flat_fee");
}

#[tokio::test]
async fn test_quote_rejects_malformed_amounts() {
    let payload = json!({
        "order": {
            "id": Uuid::new_v4(),
            "charge_delivery": true,
            "order_items": [{ "quantity": "drei", "price_per_unit": 5 }]
        }
    });
    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/delivery-fees/quote")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();

    let (status, body) = send(router(Arc::new(InMemoryStore::default())), request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(router(Arc::new(InMemoryStore::default())), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
