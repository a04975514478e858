//! 定价服务

use std::sync::Arc;

use tracing::debug;

use super::model::{PricedProduct, Product};
use crate::app::quote::cache::QuoteCache;

/// 价格公式：`(人气 + 1) * 克重 * 每克金价`
pub fn price(product: &Product, price_per_gram: f64) -> f64 {
    (product.popularity_score + 1.0) * product.weight * price_per_gram
}

/// 按美元格式显示价格，例如 `$1,234.56`
pub fn format_usd(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, fraction)
}

#[derive(Clone)]
pub struct PricingService {
    quote_cache: Arc<QuoteCache>,
}

impl PricingService {
    pub fn new(quote_cache: Arc<QuoteCache>) -> Self {
        Self { quote_cache }
    }

    /// 为所有商品计算价格，只获取一次报价，保持输入顺序和数量
    pub async fn price_all(&self, products: &[Product]) -> Vec<PricedProduct> {
        let quote = self.quote_cache.get().await;
        debug!(
            "使用金价 {}/克 为 {} 个商品定价",
            format_usd(quote.price_per_gram),
            products.len()
        );

        products
            .iter()
            .map(|product| PricedProduct {
                product: product.clone(),
                price: price(product, quote.price_per_gram),
                gold_price: quote.price_per_gram,
            })
            .collect()
    }
}
