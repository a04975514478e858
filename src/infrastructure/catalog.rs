//! 商品目录存储

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use validator::Validate;

use crate::app::pricing::model::Product;

/// 商品目录错误类型
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("读取商品目录失败: {0}")]
    Read(String),
    #[error("解析商品目录失败: {0}")]
    Parse(String),
    #[error("商品 #{index} 无效: {reason}")]
    Invalid { index: usize, reason: String },
}

/// 商品目录存储 trait，对核心只读
pub trait CatalogStore: Send + Sync {
    fn load_catalog(&self) -> Result<Vec<Product>, CatalogError>;
}

/// 内存中的固定商品目录
pub struct StaticCatalog {
    products: Vec<Product>,
}

impl StaticCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }
}

impl CatalogStore for StaticCatalog {
    fn load_catalog(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.clone())
    }
}

/// JSON 文件商品目录，每次加载都重新读取文件
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogStore for JsonFileCatalog {
    fn load_catalog(&self) -> Result<Vec<Product>, CatalogError> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| CatalogError::Read(format!("{}: {}", self.path.display(), e)))?;
        let products = parse_catalog(&content)?;
        debug!("从 {} 加载了 {} 个商品", self.path.display(), products.len());
        Ok(products)
    }
}

/// 解析并校验商品列表，任一商品无效则整体失败
pub fn parse_catalog(content: &str) -> Result<Vec<Product>, CatalogError> {
    let products: Vec<Product> =
        serde_json::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))?;

    for (index, product) in products.iter().enumerate() {
        product.validate().map_err(|e| CatalogError::Invalid {
            index,
            reason: e.to_string(),
        })?;
    }

    Ok(products)
}
