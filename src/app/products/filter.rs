//! 商品过滤器

use super::model::FilterCriteria;
use crate::app::pricing::model::{stars_to_score, PricedProduct};

/// 人气比较容差，星级按 0.1 步进换算后不一定能精确表示
const POPULARITY_EPSILON: f64 = 1e-9;

impl FilterCriteria {
    /// 商品是否满足所有已设置的条件
    pub fn matches(&self, product: &PricedProduct) -> bool {
        let score = product.product.popularity_score;

        self.min_price.map_or(true, |min| product.price >= min)
            && self.max_price.map_or(true, |max| product.price <= max)
            && self
                .min_popularity
                .map_or(true, |min| score >= stars_to_score(min) - POPULARITY_EPSILON)
            && self
                .max_popularity
                .map_or(true, |max| score <= stars_to_score(max) + POPULARITY_EPSILON)
    }

    pub fn is_empty(&self) -> bool {
        *self == FilterCriteria::default()
    }
}

/// 稳定过滤：保留满足条件的商品，维持相对顺序
pub fn filter(mut products: Vec<PricedProduct>, criteria: &FilterCriteria) -> Vec<PricedProduct> {
    if !criteria.is_empty() {
        products.retain(|p| criteria.matches(p));
    }
    products
}
