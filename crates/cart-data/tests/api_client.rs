//! ApiClient against a local backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use cart_commerce::lookup::{ProductLookup, StockLookup};
use cart_commerce::{LookupError, ProductId};
use cart_data::{
    ApiClient, BackoffStrategy, DependencyTag, FetchError, FetchPolicy, RetryPolicy, TimeoutConfig,
};
use serde_json::json;

#[derive(Clone, Default)]
struct Backend {
    stock_hits: Arc<AtomicUsize>,
}

async fn stock(State(backend): State<Backend>, Path(id): Path<i64>) -> impl IntoResponse {
    let hit = backend.stock_hits.fetch_add(1, Ordering::SeqCst);
    match id {
        1 => (StatusCode::OK, Json(json!({ "id": 1, "amount": 3 }))).into_response(),
        2 => (StatusCode::OK, "{ not json").into_response(),
        3 => {
            tokio::time::sleep(Duration::from_millis(500)).await;
            (StatusCode::OK, Json(json!({ "id": 3, "amount": 1 }))).into_response()
        }
        // Fails once, then recovers.
        4 if hit == 0 => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        4 => (StatusCode::OK, Json(json!({ "id": 4, "amount": 9 }))).into_response(),
        5 => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn product(Path(id): Path<i64>) -> impl IntoResponse {
    match id {
        1 => (
            StatusCode::OK,
            Json(json!({
                "id": 1,
                "title": "Tênis de Caminhada Leve Confortável",
                "price": 179.9,
                "image": "https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis1.jpg"
            })),
        )
            .into_response(),
        2 => (StatusCode::OK, Json(json!({ "title": "Sem id", "price": 99.9 }))).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn serve(backend: Backend) -> String {
    let app = Router::new()
        .route("/stock/{id}", get(stock))
        .route("/products/{id}", get(product))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

#[tokio::test]
async fn reads_stock_and_product() {
    let base = serve(Backend::default()).await;
    let client = ApiClient::new(base).unwrap();

    let stock = client.stock(ProductId::new(1)).await.unwrap();
    assert_eq!(stock.id, ProductId::new(1));
    assert_eq!(stock.amount, 3);

    let product = client.product(ProductId::new(1)).await.unwrap();
    assert_eq!(product.id, ProductId::new(1));
    assert_eq!(product.price, 179.9);
    assert!(product.image.ends_with("tenis1.jpg"));
}

#[tokio::test]
async fn missing_product_is_unknown() {
    let base = serve(Backend::default()).await;
    let client = ApiClient::new(base).unwrap();

    let err = client.product(ProductId::new(99)).await.unwrap_err();
    assert!(matches!(err, LookupError::UnknownProduct(id) if id == ProductId::new(99)));

    let err = client.stock(ProductId::new(99)).await.unwrap_err();
    assert!(matches!(err, LookupError::UnknownProduct(_)));
}

#[tokio::test]
async fn bad_bodies_are_malformed() {
    let base = serve(Backend::default()).await;
    let client = ApiClient::new(base).unwrap();

    let err = client.stock(ProductId::new(2)).await.unwrap_err();
    assert!(matches!(err, LookupError::Malformed(_)));

    let err = client.product(ProductId::new(2)).await.unwrap_err();
    assert!(matches!(err, LookupError::Malformed(_)));
}

#[tokio::test]
async fn slow_backend_times_out() {
    let base = serve(Backend::default()).await;
    let client = ApiClient::new(base)
        .unwrap()
        .with_timeout(Duration::from_millis(100));

    let err = client
        .fetch::<serde_json::Value>("stock/3", DependencyTag::Inventory)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Timeout(_)));

    let err = client.stock(ProductId::new(3)).await.unwrap_err();
    assert!(matches!(err, LookupError::Unavailable(_)));
}

#[tokio::test]
async fn server_errors_are_not_retried_by_default() {
    let backend = Backend::default();
    let base = serve(backend.clone()).await;
    let client = ApiClient::new(base).unwrap();

    let err = client.stock(ProductId::new(4)).await.unwrap_err();
    assert!(matches!(err, LookupError::Unavailable(_)));
    assert_eq!(backend.stock_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn retries_recover_from_server_errors() {
    let backend = Backend::default();
    let base = serve(backend.clone()).await;
    let policy = FetchPolicy::new(
        TimeoutConfig::from_total(Duration::from_secs(2)),
        RetryPolicy::new(2).with_backoff(BackoffStrategy::Fixed(Duration::from_millis(10))),
    );
    let client = ApiClient::new(base)
        .unwrap()
        .with_policy(DependencyTag::Inventory, policy);

    let stock = client.stock(ProductId::new(4)).await.unwrap();
    assert_eq!(stock.amount, 9);
    assert_eq!(backend.stock_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn retries_give_up_after_limit() {
    let backend = Backend::default();
    let base = serve(backend.clone()).await;
    let client = ApiClient::new(base).unwrap().with_policy(
        DependencyTag::Inventory,
        FetchPolicy::new(
            TimeoutConfig::default(),
            RetryPolicy::new(2).with_backoff(BackoffStrategy::None),
        ),
    );

    let err = client
        .fetch::<serde_json::Value>("stock/5", DependencyTag::Inventory)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Http { status: 503, .. }));
    assert_eq!(backend.stock_hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn unreachable_backend_is_unavailable() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(format!("http://{addr}")).unwrap();
    let err = client.stock(ProductId::new(1)).await.unwrap_err();
    assert!(matches!(err, LookupError::Unavailable(_)));
}
