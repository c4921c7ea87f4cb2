//! 组合数据模型
//!
//! 包含静态持仓配置、刷新后的持仓，以及汇总结果

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::quote::{Market, Quote};

/// 组合分类（A股 / 港股 / 美股）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "a-share")]
    AShare,
    #[serde(rename = "hk")]
    HongKong,
    #[serde(rename = "us")]
    Us,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::AShare, Category::HongKong, Category::Us];

    pub fn key(&self) -> &'static str {
        match self {
            Category::AShare => "a-share",
            Category::HongKong => "hk",
            Category::Us => "us",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a-share" | "ashare" | "a" => Ok(Category::AShare),
            "hk" => Ok(Category::HongKong),
            "us" => Ok(Category::Us),
            _ => Err(format!("不支持的分类: {}", s)),
        }
    }
}

/// 单个持仓的静态配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingConfig {
    /// 代码
    pub code: String,
    /// 名称
    pub name: String,
    /// 持仓比例（百分比）
    pub allocation: f64,
    /// 成本价
    #[serde(default)]
    pub purchase_price: Option<f64>,
    /// 币种
    pub currency: String,
}

/// 行情缺失时当前价值的取值方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPriceValue {
    /// 按最近一次成功拉取的价格计，没有则按 0 计
    #[default]
    LastKnown,
    /// 按 0 计
    Zero,
    /// 按成本计
    CostBasis,
}

/// 单个分类的配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// 所属市场
    pub market: Market,
    /// 币种
    pub currency: String,
    /// 该分类投入的总资金
    #[serde(default)]
    pub total_investment: f64,
    #[serde(default)]
    pub missing_price_value: MissingPriceValue,
    /// 持仓列表（有序）
    #[serde(default)]
    pub holdings: Vec<HoldingConfig>,
}

impl CategoryConfig {
    pub fn empty(market: Market, currency: &str) -> Self {
        Self {
            market,
            currency: currency.to_string(),
            total_investment: 0.0,
            missing_price_value: MissingPriceValue::default(),
            holdings: Vec::new(),
        }
    }
}

/// 组合配置，固定三个分类
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioConfig {
    #[serde(rename = "a-share")]
    pub a_share: CategoryConfig,
    pub hk: CategoryConfig,
    pub us: CategoryConfig,
}

impl PortfolioConfig {
    pub fn category(&self, category: Category) -> &CategoryConfig {
        match category {
            Category::AShare => &self.a_share,
            Category::HongKong => &self.hk,
            Category::Us => &self.us,
        }
    }

    pub fn holding_count(&self) -> usize {
        Category::ALL
            .iter()
            .map(|c| self.category(*c).holdings.len())
            .sum()
    }
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            a_share: CategoryConfig::empty(Market::AShare, "CNY"),
            hk: CategoryConfig::empty(Market::HongKong, "HKD"),
            us: CategoryConfig::empty(Market::Us, "USD"),
        }
    }
}

/// 刷新后的持仓：静态配置 + 本轮行情
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedHolding {
    #[serde(flatten)]
    pub config: HoldingConfig,
    /// 当前价（行情缺失时为空）
    pub current_price: Option<f64>,
    /// 本轮拉取到的行情
    pub quote: Option<Arc<Quote>>,
    /// 本轮行情缺失时，缓存中最近一次成功拉取的价格
    pub last_known_price: Option<f64>,
}

impl EnrichedHolding {
    pub fn new(config: HoldingConfig, quote: Option<Arc<Quote>>) -> Self {
        Self {
            current_price: quote.as_ref().map(|q| q.last_price),
            config,
            quote,
            last_known_price: None,
        }
    }

    /// 行情缺失的持仓带上过期的缓存价格
    pub fn with_last_known(mut self, last_known: Option<Arc<Quote>>) -> Self {
        if self.current_price.is_none() {
            self.last_known_price = last_known.map(|q| q.last_price);
        }
        self
    }
}

/// 单个持仓的计算结果
#[derive(Debug, Clone, Serialize)]
pub struct HoldingRow {
    pub code: String,
    pub name: String,
    pub allocation: f64,
    pub purchase_price: Option<f64>,
    pub current_price: Option<f64>,
    /// 成本
    pub cost: f64,
    /// 当前价值
    pub current_value: f64,
    /// 收益率（百分比），无法计算时为空
    pub profit_rate: Option<f64>,
    /// 当日涨跌幅（百分比）
    pub day_change_rate: Option<f64>,
    /// 当日收益
    pub day_profit: f64,
    /// 本轮行情缺失
    pub stale: bool,
}

/// 分类汇总
#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub currency: String,
    pub total_current_value: f64,
    pub total_cost: f64,
    pub total_profit: f64,
    /// 累计收益率（百分比），总成本为 0 时为 0
    pub total_profit_rate: f64,
    pub today_profit: f64,
    pub holdings: Vec<HoldingRow>,
}

impl CategorySummary {
    pub fn stale_count(&self) -> usize {
        self.holdings.iter().filter(|h| h.stale).count()
    }
}

/// 组合总览
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioSummary {
    pub categories: BTreeMap<Category, CategorySummary>,
    /// 总资产（各分类当前价值之和，不做汇率换算）
    pub total_assets: f64,
    pub total_cost: f64,
    pub total_profit: f64,
    pub total_profit_rate: f64,
    pub today_profit: f64,
    /// 行情缺失的持仓数量
    pub stale_holdings: usize,
    /// 刷新时间（北京时间）
    pub refreshed_at: String,
}
