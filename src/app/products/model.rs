//! 商品查询数据模型

use serde::{Deserialize, Serialize};

use crate::app::pricing::model::{PricedProduct, MAX_STARS};
use crate::core::error::CoreError;

/// 过滤条件
///
/// 价格为闭区间；人气以 0-5 星级给出，比较前换算为 0-1。
/// `None` 表示未设置，`Some(0.0)` 是有效的过滤值。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_popularity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_popularity: Option<f64>,
}

/// 原始查询参数，保持字符串形式以便区分“缺失”和“无效”
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    #[serde(default)]
    pub min_price: Option<String>,
    #[serde(default)]
    pub max_price: Option<String>,
    #[serde(default)]
    pub min_popularity: Option<String>,
    #[serde(default)]
    pub max_popularity: Option<String>,
}

impl TryFrom<ProductQuery> for FilterCriteria {
    type Error = CoreError;

    fn try_from(query: ProductQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            min_price: parse_number("minPrice", query.min_price.as_deref())?,
            max_price: parse_number("maxPrice", query.max_price.as_deref())?,
            min_popularity: parse_stars("minPopularity", query.min_popularity.as_deref())?,
            max_popularity: parse_stars("maxPopularity", query.max_popularity.as_deref())?,
        })
    }
}

/// 解析十进制数参数，空字符串视为未设置
fn parse_number(field: &str, raw: Option<&str>) -> Result<Option<f64>, CoreError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(CoreError::BadRequest(format!(
            "参数 {} 不是有效的数字: {}",
            field, raw
        ))),
    }
}

fn parse_stars(field: &str, raw: Option<&str>) -> Result<Option<f64>, CoreError> {
    let value = parse_number(field, raw)?;
    if let Some(stars) = value {
        if !(0.0..=MAX_STARS).contains(&stars) {
            return Err(CoreError::BadRequest(format!(
                "参数 {} 必须在 0 到 {} 之间: {}",
                field, MAX_STARS, stars
            )));
        }
    }
    Ok(value)
}

/// 商品列表查询结果
#[derive(Debug, Clone)]
pub struct ProductListing {
    pub products: Vec<PricedProduct>,
    pub total_count: usize,
    pub criteria: FilterCriteria,
}
