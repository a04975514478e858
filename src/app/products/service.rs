//! 商品列表业务服务

use std::sync::Arc;

use tracing::{error, info};

use super::filter::filter;
use super::model::{FilterCriteria, ProductListing};
use crate::app::pricing::service::PricingService;
use crate::core::error::CoreError;
use crate::infrastructure::catalog::CatalogStore;

#[derive(Clone)]
pub struct ProductService {
    catalog: Arc<dyn CatalogStore>,
    pricing: PricingService,
}

impl ProductService {
    pub fn new(catalog: Arc<dyn CatalogStore>, pricing: PricingService) -> Self {
        Self { catalog, pricing }
    }

    /// 加载商品目录、按当前金价定价并过滤
    pub async fn list_products(&self, criteria: FilterCriteria) -> Result<ProductListing, CoreError> {
        let products = self.catalog.load_catalog().map_err(|e| {
            error!("加载商品目录失败: {}", e);
            CoreError::InternalServerError("加载商品时发生错误".to_string())
        })?;

        let priced = self.pricing.price_all(&products).await;
        let total_count = priced.len();
        let products = filter(priced, &criteria);

        info!(
            "商品查询完成: {}/{} 个商品满足条件 {:?}",
            products.len(),
            total_count,
            criteria
        );

        Ok(ProductListing {
            products,
            total_count,
            criteria,
        })
    }
}
