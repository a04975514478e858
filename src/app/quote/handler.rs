//! 报价查询处理器

use axum::{extract::State, response::Json};
use serde::Serialize;

use super::model::Quote;
use crate::app::pricing::service::format_usd;
use crate::app::AppState;
use crate::core::response::ApiResponse;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteView {
    #[serde(flatten)]
    pub quote: Quote,
    /// 格式化后的每克金价，例如 `$65.00`
    pub display: String,
    pub cache_window_seconds: u64,
}

/// `GET /quote`：当前缓存中的金价（必要时刷新）
pub async fn current_quote(State(state): State<AppState>) -> Json<ApiResponse<QuoteView>> {
    let quote = state.quote_cache.get().await;
    let view = QuoteView {
        display: format_usd(quote.price_per_gram),
        cache_window_seconds: state.quote_cache.window().as_secs(),
        quote,
    };
    Json(ApiResponse::success(view))
}
