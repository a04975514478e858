//! 金价报价：数据模型、报价源（提供方回退链）与进程级缓存

pub mod cache;
pub mod handler;
pub mod model;
pub mod provider;
pub mod source;
