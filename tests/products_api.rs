use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use jewelry_pricing::app::create_router;
use jewelry_pricing::app::quote::provider::{ConstantProvider, QuoteProvider};
use jewelry_pricing::infrastructure::catalog::{CatalogError, CatalogStore, StaticCatalog};
use jewelry_pricing::{AppState, Product, ProductImages, QuoteCache, QuoteSource};
use serde_json::Value;
use tower::ServiceExt;

fn product(name: &str, popularity_score: f64, weight: f64) -> Product {
    Product {
        name: name.to_string(),
        popularity_score,
        weight,
        images: ProductImages {
            yellow: "a".to_string(),
            rose: "b".to_string(),
            white: "c".to_string(),
        },
    }
}

fn fixed_cache(price_per_gram: f64) -> Arc<QuoteCache> {
    let source = QuoteSource::new(
        vec![Box::new(ConstantProvider::new("fixed", price_per_gram))],
        Duration::from_secs(1),
        65.0,
    );
    Arc::new(QuoteCache::new(Arc::new(source), Duration::from_secs(300)))
}

fn app_with(catalog: Arc<dyn CatalogStore>, cache: Arc<QuoteCache>) -> Router {
    create_router(AppState::new(catalog, cache), Duration::from_secs(5))
}

fn ring_app() -> Router {
    app_with(
        Arc::new(StaticCatalog::new(vec![product("Ring", 0.6, 2.0)])),
        fixed_cache(65.0),
    )
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_ring_within_price_range() {
    let (status, body) = get(ring_app(), "/products?minPrice=200&maxPrice=220").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 1);
    assert_eq!(body["totalCount"], 1);
    assert_eq!(body["filters"], serde_json::json!({ "minPrice": 200.0, "maxPrice": 220.0 }));

    let ring = &body["data"][0];
    assert_eq!(ring["name"], "Ring");
    assert_eq!(ring["popularityScore"], 0.6);
    assert_eq!(ring["images"]["rose"], "b");
    assert_eq!(ring["goldPrice"], 65.0);
    assert!((ring["price"].as_f64().unwrap() - 208.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_ring_above_min_price_is_excluded() {
    let (status, body) = get(ring_app(), "/products?minPrice=300").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], serde_json::json!([]));
    assert_eq!(body["count"], 0);
    assert_eq!(body["totalCount"], 1);
}

#[tokio::test]
async fn test_no_filters_returns_whole_catalog_in_order() {
    let app = app_with(
        Arc::new(StaticCatalog::new(vec![
            product("C", 0.1, 1.0),
            product("A", 0.9, 3.0),
            product("B", 0.5, 2.0),
        ])),
        fixed_cache(65.0),
    );
    let (_, body) = get(app, "/products").await;

    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["C", "A", "B"]);
    assert_eq!(body["filters"], serde_json::json!({}));
}

#[tokio::test]
async fn test_min_popularity_four_stars_is_inclusive() {
    let app = app_with(
        Arc::new(StaticCatalog::new(vec![
            product("Popular", 0.8, 1.0),
            product("Niche", 0.79, 1.0),
        ])),
        fixed_cache(65.0),
    );
    let (_, body) = get(app, "/products?minPopularity=4").await;

    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["name"], "Popular");
    assert_eq!(body["totalCount"], 2);
}

#[tokio::test]
async fn test_decimal_star_bounds_are_inclusive() {
    let app = app_with(
        Arc::new(StaticCatalog::new(vec![
            product("Engagement Ring 3", 0.92, 3.8),
            product("Engagement Ring 8", 0.9, 3.7),
            product("Engagement Ring 4", 0.88, 4.5),
        ])),
        fixed_cache(65.0),
    );
    let (_, body) = get(app, "/products?minPopularity=4.5&maxPopularity=4.6").await;

    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Engagement Ring 3", "Engagement Ring 8"]);
}

#[tokio::test]
async fn test_zero_popularity_is_applied() {
    let app = app_with(
        Arc::new(StaticCatalog::new(vec![
            product("Unknown", 0.0, 1.0),
            product("Known", 0.4, 1.0),
        ])),
        fixed_cache(65.0),
    );
    let (_, body) = get(app, "/products?maxPopularity=0").await;

    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["name"], "Unknown");
    assert_eq!(body["filters"], serde_json::json!({ "maxPopularity": 0.0 }));
}

#[tokio::test]
async fn test_non_numeric_parameter_is_rejected() {
    let (status, body) = get(ring_app(), "/products?minPrice=cheap").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
    assert_eq!(body["data"], serde_json::json!([]));
}

#[tokio::test]
async fn test_popularity_outside_star_scale_is_rejected() {
    let (status, _) = get(ring_app(), "/products?maxPopularity=7").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

struct StalledProvider;

#[async_trait]
impl QuoteProvider for StalledProvider {
    fn name(&self) -> &str {
        "stalled"
    }

    async fn fetch_price_per_gram(&self) -> Result<f64> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(65.0)
    }
}

#[tokio::test(start_paused = true)]
async fn test_request_timeout_uses_failure_envelope() {
    let source = QuoteSource::new(vec![Box::new(StalledProvider)], Duration::from_secs(60), 65.0);
    let cache = Arc::new(QuoteCache::new(Arc::new(source), Duration::from_secs(300)));
    let app = create_router(
        AppState::new(
            Arc::new(StaticCatalog::new(vec![product("Ring", 0.6, 2.0)])),
            cache,
        ),
        Duration::from_millis(100),
    );

    let (status, body) = get(app, "/products").await;

    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
    assert_eq!(body["data"], serde_json::json!([]));
}

struct BrokenCatalog;

impl CatalogStore for BrokenCatalog {
    fn load_catalog(&self) -> Result<Vec<Product>, CatalogError> {
        Err(CatalogError::Parse("unexpected end of input".to_string()))
    }
}

#[tokio::test]
async fn test_catalog_failure_uses_failure_envelope() {
    let app = app_with(Arc::new(BrokenCatalog), fixed_cache(65.0));
    let (status, body) = get(app, "/products").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["data"], serde_json::json!([]));
}

#[tokio::test]
async fn test_quote_endpoint() {
    let (status, body) = get(ring_app(), "/quote").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pricePerGram"], 65.0);
    assert_eq!(body["data"]["source"], "fixed");
    assert_eq!(body["data"]["display"], "$65.00");
    assert_eq!(body["data"]["cacheWindowSeconds"], 300);
}

#[tokio::test]
async fn test_health_and_unknown_route() {
    let (status, body) = get(ring_app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = get(ring_app(), "/rings").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_response_carries_request_id() {
    let response = ring_app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

/// 每次调用返回新价格并记录所有返回过的值
struct RecordingProvider {
    returned: Arc<Mutex<Vec<f64>>>,
}

#[async_trait]
impl QuoteProvider for RecordingProvider {
    fn name(&self) -> &str {
        "recording"
    }

    async fn fetch_price_per_gram(&self) -> Result<f64> {
        tokio::time::sleep(Duration::from_millis(10)).await;
        let mut returned = self.returned.lock().map_err(|_| anyhow!("poisoned"))?;
        let price = 60.0 + returned.len() as f64;
        returned.push(price);
        Ok(price)
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_during_expiry_see_real_quotes() {
    let returned = Arc::new(Mutex::new(Vec::new()));
    let source = QuoteSource::new(
        vec![Box::new(RecordingProvider {
            returned: returned.clone(),
        })],
        Duration::from_secs(1),
        65.0,
    );
    let cache = Arc::new(QuoteCache::new(Arc::new(source), Duration::from_secs(300)));
    let app = app_with(
        Arc::new(StaticCatalog::new(vec![product("Ring", 0.6, 2.0)])),
        cache.clone(),
    );

    let mut gold_prices = Vec::new();
    for _ in 0..3 {
        cache.invalidate().await;
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let app = app.clone();
                tokio::spawn(async move { get(app, "/products").await })
            })
            .collect();
        for handle in handles {
            let (status, body) = handle.await.unwrap();
            assert_eq!(status, StatusCode::OK);
            gold_prices.push(body["data"][0]["goldPrice"].as_f64().unwrap());
        }
    }

    let returned = returned.lock().unwrap().clone();
    assert!(!returned.is_empty());
    for price in gold_prices {
        assert!(returned.contains(&price), "goldPrice {} 从未由报价源返回", price);
    }
}
