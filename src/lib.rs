//! # 珠宝动态定价服务
//!
//! 根据外部金价实时计算商品价格，并支持按价格和人气过滤：
//! - 报价源：按优先级依次尝试多个金价提供方，全部失败时回退到固定金价
//! - 报价缓存：进程级单槽缓存，固定时间窗口内复用同一报价
//! - 定价引擎：`(人气 + 1) * 克重 * 每克金价`
//! - 商品过滤：基于派生价格和人气的区间过滤
//! - 查询边界：axum HTTP 接口

pub mod app;
pub mod core;
pub mod infrastructure;

pub use app::pricing::model::{PricedProduct, Product, ProductImages};
pub use app::products::model::FilterCriteria;
pub use app::quote::cache::QuoteCache;
pub use app::quote::model::Quote;
pub use app::quote::source::QuoteSource;
pub use app::AppState;
