//! 应用层：路由与共享状态

pub mod pricing;
pub mod products;
pub mod quote;

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, response::Json, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::core::{
    error::CoreError,
    middleware::{request_logging_middleware, timeout_envelope_middleware},
};
use pricing::service::PricingService;
use products::service::ProductService;
use quote::cache::QuoteCache;

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
    pub quote_cache: Arc<QuoteCache>,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn crate::infrastructure::catalog::CatalogStore>,
        quote_cache: Arc<QuoteCache>,
    ) -> Self {
        let pricing = PricingService::new(quote_cache.clone());
        Self {
            product_service: ProductService::new(catalog, pricing),
            quote_cache,
        }
    }
}

/// 创建路由
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/products", get(products::handler::list_products))
        .route("/quote", get(quote::handler::current_quote))
        .route("/health", get(health_check))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(timeout_envelope_middleware))
                .layer(TimeoutLayer::new(request_timeout))
                .layer(middleware::from_fn(request_logging_middleware)),
        )
        .with_state(state)
}

/// 健康检查
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn not_found(uri: axum::http::Uri) -> CoreError {
    CoreError::NotFound(format!("路径 {} 不存在", uri.path()))
}
