//! 报价数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 一金衡盎司对应的克数
pub const GRAMS_PER_TROY_OUNCE: f64 = 31.1035;

/// 所有提供方都失败时使用的固定金价（USD/克）
pub const FALLBACK_PRICE_PER_GRAM: f64 = 65.0;

/// 当前金价报价
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// 每克金价（USD）
    pub price_per_gram: f64,
    /// 产生该报价的提供方名称
    pub source: String,
    pub fetched_at: DateTime<Utc>,
}

impl Quote {
    pub fn new(price_per_gram: f64, source: impl Into<String>) -> Self {
        Self {
            price_per_gram,
            source: source.into(),
            fetched_at: Utc::now(),
        }
    }
}

/// 提供方报价所用的计量单位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteUnit {
    #[default]
    TroyOunce,
    Gram,
}

impl QuoteUnit {
    /// 把提供方原始报价换算为每克价格
    pub fn to_per_gram(self, raw: f64) -> f64 {
        match self {
            QuoteUnit::TroyOunce => raw / GRAMS_PER_TROY_OUNCE,
            QuoteUnit::Gram => raw,
        }
    }
}
