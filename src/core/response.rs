//! 核心响应处理模块

use serde::Serialize;

use crate::app::pricing::model::PricedProduct;
use crate::app::products::model::{FilterCriteria, ProductListing};

/// API 响应结构
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// 商品列表响应结构
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    pub success: bool,
    pub data: Vec<PricedProduct>,
    pub count: usize,
    pub total_count: usize,
    pub filters: FilterCriteria,
}

impl From<ProductListing> for ProductListResponse {
    fn from(listing: ProductListing) -> Self {
        Self {
            success: true,
            count: listing.products.len(),
            data: listing.products,
            total_count: listing.total_count,
            filters: listing.criteria,
        }
    }
}
