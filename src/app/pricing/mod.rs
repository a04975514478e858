//! 定价引擎

pub mod model;
pub mod service;
