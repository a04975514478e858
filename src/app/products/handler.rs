//! 商品列表处理器

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Json,
};

use super::model::{FilterCriteria, ProductQuery};
use crate::app::AppState;
use crate::core::{error::CoreError, response::ProductListResponse};

/// `GET /products?minPrice=&maxPrice=&minPopularity=&maxPopularity=`
pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> Result<Json<ProductListResponse>, CoreError> {
    let Query(query) = query.map_err(|e| CoreError::BadRequest(e.body_text()))?;
    let criteria = FilterCriteria::try_from(query)?;

    let listing = state.product_service.list_products(criteria).await?;
    Ok(Json(listing.into()))
}
