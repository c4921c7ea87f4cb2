use async_trait::async_trait;

use crate::error::QuoteError;
use crate::models::{Market, PricePoint, Quote};

/// 行情数据源
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// 拉取单只标的实时行情
    async fn fetch_quote(&self, market: Market, code: &str) -> Result<Quote, QuoteError>;

    /// 拉取最近 limit 根日K线
    async fn fetch_kline(
        &self,
        market: Market,
        code: &str,
        limit: usize,
    ) -> Result<Vec<PricePoint>, QuoteError>;
}
