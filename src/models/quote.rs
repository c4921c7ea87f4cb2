//! 行情数据模型
//!
//! 定义市场、行情、K线等标准化后的数据结构

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 市场（交易所）
///
/// 反序列化与 `FromStr` 一致，接受 region 或分类名，不区分大小写
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Market {
    /// A股
    #[serde(rename = "SZ")]
    AShare,
    /// 港股
    #[serde(rename = "HK")]
    HongKong,
    /// 美股
    #[serde(rename = "US")]
    Us,
}

impl Market {
    /// 数据源接口使用的 region 参数
    pub fn region(&self) -> &'static str {
        match self {
            Market::AShare => "SZ",
            Market::HongKong => "HK",
            Market::Us => "US",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.region())
    }
}

impl FromStr for Market {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sz" | "sh" | "a" | "a-share" | "ashare" => Ok(Market::AShare),
            "hk" => Ok(Market::HongKong),
            "us" => Ok(Market::Us),
            _ => Err(format!("不支持的市场: {}", s)),
        }
    }
}

impl TryFrom<String> for Market {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// 缓存键：市场 + 代码
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuoteKey {
    pub market: Market,
    pub code: String,
}

impl QuoteKey {
    pub fn new(market: Market, code: impl Into<String>) -> Self {
        Self {
            market,
            code: code.into(),
        }
    }
}

impl fmt::Display for QuoteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.market, self.code)
    }
}

/// 实时行情
///
/// 构造后不可变，每次拉取生成新的实例
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// 代码
    pub symbol: String,
    /// 最新价
    pub last_price: f64,
    /// 开盘价
    pub open: f64,
    /// 最高价
    pub high: f64,
    /// 最低价
    pub low: f64,
    /// 成交量
    pub volume: f64,
    /// 数据源时间戳（毫秒）
    pub timestamp: i64,
}

/// 日K线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// 时间戳（毫秒）
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    /// 成交额
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turnover: Option<f64>,
}

/// K线查询参数
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// 返回天数
    pub days: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_deserialize_is_case_insensitive() {
        for (raw, market) in [
            ("\"sz\"", Market::AShare),
            ("\"sh\"", Market::AShare),
            ("\"A-Share\"", Market::AShare),
            ("\"hk\"", Market::HongKong),
            ("\"Us\"", Market::Us),
        ] {
            assert_eq!(serde_json::from_str::<Market>(raw).unwrap(), market);
        }
        assert!(serde_json::from_str::<Market>("\"jp\"").is_err());
    }

    #[test]
    fn test_market_serializes_as_region() {
        assert_eq!(serde_json::to_string(&Market::AShare).unwrap(), "\"SZ\"");
        assert_eq!(serde_json::to_string(&Market::Us).unwrap(), "\"US\"");
    }
}
