//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置，静态持仓也在这里给出

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::models::PortfolioConfig;
use crate::services::quote::DEFAULT_HISTORY_DAYS;

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
}

/// 行情数据源配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// 接口地址
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// 访问令牌，作为 token 请求头发送
    #[serde(default)]
    pub token: String,
    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// 行情缓存有效期（毫秒）
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_ms: u64,
    /// 历史K线默认天数
    #[serde(default = "default_history_days")]
    pub history_days: usize,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub log: LogConfig,
    /// 持仓配置
    #[serde(default)]
    pub portfolio: PortfolioConfig,
}

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_base_url() -> String { "https://api.itick.org".to_string() }
fn default_timeout() -> u64 { 10 }
fn default_connect_timeout() -> u64 { 5 }
fn default_cache_ttl() -> u64 { 30_000 }
fn default_history_days() -> usize { DEFAULT_HISTORY_DAYS }
fn default_log_level() -> String { "info".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: String::new(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            cache_ttl_ms: default_cache_ttl(),
            history_days: default_history_days(),
        }
    }
}

impl ProviderConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 加载配置，优先从文件，失败则使用默认值
    ///
    /// 日志系统此时尚未初始化，加载结果以消息列表返回，由调用方在初始化日志后输出
    pub fn load() -> (Self, Vec<String>) {
        let config_paths = ["config.json", "config/config.json"];
        let mut notes = Vec::new();

        for path in config_paths {
            if Path::new(path).exists() {
                match Self::from_file(path) {
                    Ok(config) => {
                        notes.push(format!("从 {} 加载配置成功", path));
                        return (config, notes);
                    }
                    Err(e) => {
                        notes.push(format!("加载配置文件 {} 失败: {}", path, e));
                    }
                }
            }
        }

        notes.push("使用默认配置".to_string());
        (Self::default(), notes)
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Market, MissingPriceValue};

    #[test]
    fn test_defaults_when_sections_missing() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();

        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.provider.cache_ttl(), Duration::from_millis(30_000));
        assert_eq!(config.provider.history_days, 30);
        assert_eq!(config.log.level, "info");
        assert_eq!(config.portfolio.holding_count(), 0);
        assert_eq!(config.portfolio.us.market, Market::Us);
    }

    #[test]
    fn test_parse_portfolio_section() {
        let json = r#"{
            "provider": { "token": "abc", "cache_ttl_ms": 5000 },
            "portfolio": {
                "a-share": {
                    "market": "SZ",
                    "currency": "CNY",
                    "total_investment": 100000,
                    "holdings": [
                        { "code": "159915", "name": "创业板ETF", "allocation": 60, "purchase_price": 2.1, "currency": "CNY" },
                        { "code": "510300", "name": "沪深300ETF", "allocation": 40, "currency": "CNY" }
                    ]
                },
                "hk": { "market": "hk", "currency": "HKD", "missing_price_value": "zero" },
                "us": { "market": "Us", "currency": "USD", "missing_price_value": "cost_basis" }
            }
        }"#;

        let config: AppConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.provider.token, "abc");
        assert_eq!(config.provider.cache_ttl_ms, 5000);
        assert_eq!(config.provider.timeout_secs, 10);

        let a_share = &config.portfolio.a_share;
        assert_eq!(a_share.market, Market::AShare);
        assert_eq!(a_share.holdings.len(), 2);
        assert_eq!(a_share.holdings[0].purchase_price, Some(2.1));
        assert_eq!(a_share.holdings[1].purchase_price, None);
        assert_eq!(a_share.missing_price_value, MissingPriceValue::LastKnown);
        assert_eq!(config.portfolio.hk.market, Market::HongKong);
        assert_eq!(config.portfolio.hk.missing_price_value, MissingPriceValue::Zero);
        assert_eq!(config.portfolio.us.market, Market::Us);
        assert_eq!(config.portfolio.us.missing_price_value, MissingPriceValue::CostBasis);
        assert_eq!(config.portfolio.holding_count(), 2);
    }

    #[test]
    fn test_lowercase_region_in_config() {
        let json = r#"{ "portfolio": {
            "a-share": { "market": "sh", "currency": "CNY", "missing_price_value": "last_known" },
            "hk": { "market": "HK", "currency": "HKD" },
            "us": { "market": "us", "currency": "USD" }
        } }"#;

        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.portfolio.a_share.market, Market::AShare);
        assert_eq!(config.portfolio.us.market, Market::Us);

        let bad = r#"{ "portfolio": {
            "a-share": { "market": "jp", "currency": "JPY" },
            "hk": { "market": "HK", "currency": "HKD" },
            "us": { "market": "US", "currency": "USD" }
        } }"#;
        assert!(serde_json::from_str::<AppConfig>(bad).is_err());
    }

    #[test]
    fn test_portfolio_requires_all_three_categories() {
        let json = r#"{ "portfolio": { "a-share": { "market": "SZ", "currency": "CNY" } } }"#;
        assert!(serde_json::from_str::<AppConfig>(json).is_err());
    }
}
