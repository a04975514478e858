//! 基础设施层：配置、日志与商品目录存储

pub mod catalog;
pub mod config;
pub mod logger;
