//! 商品与派生价格数据模型

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 人气展示刻度（星级）的上限
pub const MAX_STARS: f64 = 5.0;

/// 三种金色对应的商品图片
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ProductImages {
    #[validate(length(min = 1))]
    pub yellow: String,
    #[validate(length(min = 1))]
    pub rose: String,
    #[validate(length(min = 1))]
    pub white: String,
}

/// 静态商品定义，进程生命周期内不可变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[validate(length(min = 1, message = "商品名称不能为空"))]
    pub name: String,
    /// 归一化人气，取值 [0, 1]
    #[validate(range(min = 0.0, max = 1.0, message = "人气必须在 0 到 1 之间"))]
    pub popularity_score: f64,
    /// 克重
    #[validate(range(exclusive_min = 0.0, message = "克重必须大于 0"))]
    pub weight: f64,
    #[validate(nested)]
    pub images: ProductImages,
}

impl Product {
    /// 人气换算为 0-5 星级
    pub fn stars(&self) -> f64 {
        self.popularity_score * MAX_STARS
    }
}

/// 0-5 星级换算为内部 0-1 人气
pub fn stars_to_score(stars: f64) -> f64 {
    stars / MAX_STARS
}

/// 带派生价格的商品，每次请求重新计算
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedProduct {
    #[serde(flatten)]
    pub product: Product,
    pub price: f64,
    /// 计算 `price` 时使用的每克金价
    pub gold_price: f64,
}
