//! 配置基础设施

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::app::quote::model::{QuoteUnit, FALLBACK_PRICE_PER_GRAM};

/// 指定配置文件路径的环境变量
pub const CONFIG_ENV: &str = "JEWELRY_CONFIG";

/// 服务配置结构
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP 服务配置
    pub http: HttpConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 金价报价配置
    pub quote: QuoteConfig,
    /// 商品目录配置
    pub catalog: CatalogConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// 绑定地址
    pub bind_address: String,
    /// HTTP 服务端口
    pub port: u16,
    /// 请求超时时间（秒）
    pub timeout_seconds: u64,
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
}

/// 金价报价配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    /// 缓存窗口（秒）
    pub cache_window_seconds: u64,
    /// 单个提供方的请求超时（秒）
    pub provider_timeout_seconds: u64,
    /// 所有提供方失败时使用的每克金价
    pub fallback_price_per_gram: f64,
    /// 按优先级排列的提供方
    pub providers: Vec<ProviderConfig>,
}

/// 提供方类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Goldapi,
    Rates,
    Constant,
}

/// 单个金价提供方配置
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub name: String,
    pub kind: ProviderKind,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub unit: QuoteUnit,
    /// 仅 `constant` 类型使用
    #[serde(default)]
    pub price_per_gram: Option<f64>,
}

/// 商品目录配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// 商品 JSON 文件路径
    pub path: PathBuf,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
            timeout_seconds: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            cache_window_seconds: 5 * 60,
            provider_timeout_seconds: 5,
            fallback_price_per_gram: FALLBACK_PRICE_PER_GRAM,
            providers: Vec::new(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/products.json"),
        }
    }
}

impl Config {
    /// 从配置文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::FileRead(e.to_string()))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        Ok(config)
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.bind_address.is_empty() {
            return Err(ConfigError::Validation("绑定地址不能为空".to_string()));
        }
        if self.http.timeout_seconds == 0 {
            return Err(ConfigError::Validation("请求超时时间必须大于0".to_string()));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "无效的日志级别: {}，有效值: {:?}",
                self.logging.level, valid_levels
            )));
        }

        let quote = &self.quote;
        if quote.cache_window_seconds == 0 {
            return Err(ConfigError::Validation("缓存窗口必须大于0".to_string()));
        }
        if quote.provider_timeout_seconds == 0 {
            return Err(ConfigError::Validation("提供方超时时间必须大于0".to_string()));
        }
        if !(quote.fallback_price_per_gram.is_finite() && quote.fallback_price_per_gram > 0.0) {
            return Err(ConfigError::Validation(format!(
                "回退金价必须为正数: {}",
                quote.fallback_price_per_gram
            )));
        }

        for provider in &quote.providers {
            provider.validate()?;
        }

        Ok(())
    }
}

impl ProviderConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::Validation("提供方名称不能为空".to_string()));
        }

        match self.kind {
            ProviderKind::Constant => match self.price_per_gram {
                Some(p) if p.is_finite() && p > 0.0 => Ok(()),
                _ => Err(ConfigError::Validation(format!(
                    "提供方 {} 需要正数 price_per_gram",
                    self.name
                ))),
            },
            ProviderKind::Goldapi | ProviderKind::Rates => {
                let url = self.url.as_deref().ok_or_else(|| {
                    ConfigError::Validation(format!("提供方 {} 缺少 url", self.name))
                })?;
                reqwest::Url::parse(url).map_err(|e| {
                    ConfigError::Validation(format!("提供方 {} 的 url 无效: {}", self.name, e))
                })?;
                Ok(())
            }
        }
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("文件读取错误: {0}")]
    FileRead(String),
    #[error("配置解析错误: {0}")]
    Parse(String),
    #[error("配置验证错误: {0}")]
    Validation(String),
}

/// 加载配置
///
/// 优先使用显式路径，其次是 `JEWELRY_CONFIG` 环境变量，
/// 再依次查找 `config.toml` 和 `./config/config.toml`，都不存在时使用默认配置。
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    if let Some(path) = explicit.map(Path::to_path_buf).or(env_path) {
        let config = Config::load_from_file(&path)?;
        config.validate()?;
        return Ok(config);
    }

    let config_paths = ["config.toml", "./config/config.toml"];
    for path in &config_paths {
        if Path::new(path).exists() {
            let config = Config::load_from_file(path)?;
            config.validate()?;
            return Ok(config);
        }
    }

    Ok(Config::default())
}
