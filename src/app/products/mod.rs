//! 商品列表：过滤条件、过滤器、服务与 HTTP 处理器

pub mod filter;
pub mod handler;
pub mod model;
pub mod service;
