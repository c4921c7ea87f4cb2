//! 行情获取服务
//!
//! 在数据源之上叠加缓存：缓存有效期内不再请求数据源。
//! 所有错误在这里记录日志后转换为空结果，不再向上抛出

use std::sync::Arc;
use tokio::time::Instant;

use super::cache::QuoteCache;
use super::source::QuoteSource;
use crate::error::QuoteError;
use crate::models::{Market, PricePoint, Quote, QuoteKey};

/// 历史K线默认天数
pub const DEFAULT_HISTORY_DAYS: usize = 30;

pub struct QuoteFetcher<S> {
    source: S,
    cache: Arc<QuoteCache>,
}

impl<S: QuoteSource> QuoteFetcher<S> {
    /// 缓存由调用方创建并持有
    pub fn new(source: S, cache: Arc<QuoteCache>) -> Self {
        Self { source, cache }
    }

    pub fn cache(&self) -> &QuoteCache {
        &self.cache
    }

    #[cfg(test)]
    pub(crate) fn source(&self) -> &S {
        &self.source
    }

    /// 获取实时行情，失败时返回带分类的错误
    ///
    /// 失败结果不写入缓存；同一标的的并发请求不做合并
    pub async fn try_get_quote(
        &self,
        market: Market,
        code: &str,
    ) -> Result<Arc<Quote>, QuoteError> {
        let key = QuoteKey::new(market, code);

        if let Some(quote) = self.cache.get_fresh(&key, Instant::now()) {
            log::debug!("行情缓存命中: {}", key);
            return Ok(quote);
        }
        if let Some((_, age)) = self.cache.get(&key) {
            log::debug!("行情缓存已过期: {} ({} ms)", key, age.as_millis());
        }

        let quote = Arc::new(self.source.fetch_quote(market, code).await?);
        self.cache.put(key, quote.clone(), Instant::now());
        Ok(quote)
    }

    /// 获取实时行情，失败时记录日志并返回 None
    pub async fn get_quote(&self, market: Market, code: &str) -> Option<Arc<Quote>> {
        match self.try_get_quote(market, code).await {
            Ok(quote) => Some(quote),
            Err(e) => {
                log::warn!("获取行情失败 {}_{} [{}]: {}", market, code, e.kind(), e);
                None
            }
        }
    }

    /// 缓存中最近一次成功拉取的行情，不论是否过期
    pub fn last_known(&self, market: Market, code: &str) -> Option<Arc<Quote>> {
        self.cache.get(&QuoteKey::new(market, code)).map(|(quote, _age)| quote)
    }

    /// 获取最近 days 天的日K线，不缓存，失败时返回空序列
    pub async fn get_historical_series(
        &self,
        market: Market,
        code: &str,
        days: usize,
    ) -> Vec<PricePoint> {
        match self.source.fetch_kline(market, code, days).await {
            Ok(series) => series,
            Err(e) => {
                log::warn!("获取历史K线失败 {}_{} [{}]: {}", market, code, e.kind(), e);
                Vec::new()
            }
        }
    }
}
