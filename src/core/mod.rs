//! 核心层：错误、响应封装与中间件

pub mod error;
pub mod middleware;
pub mod response;
