//! 组合行情批量获取
//!
//! 三个分类之间、分类内各持仓之间都并发请求，结果按配置顺序排列。
//! 单个持仓失败只影响自身，不重试

use futures::future::join_all;
use std::collections::BTreeMap;

use super::summary::summarize_portfolio;
use crate::models::{
    get_beijing_time, Category, CategoryConfig, EnrichedHolding, PortfolioConfig, PortfolioSummary,
};
use crate::services::quote::{QuoteFetcher, QuoteSource};

pub struct PortfolioFetcher<'a, S> {
    quotes: &'a QuoteFetcher<S>,
}

impl<'a, S: QuoteSource> PortfolioFetcher<'a, S> {
    pub fn new(quotes: &'a QuoteFetcher<S>) -> Self {
        Self { quotes }
    }

    /// 获取单个分类的全部持仓行情
    pub async fn fetch_category(&self, category: &CategoryConfig) -> Vec<EnrichedHolding> {
        let market = category.market;
        join_all(category.holdings.iter().map(|holding| async move {
            let quote = self.quotes.get_quote(market, &holding.code).await;
            let last_known = match quote {
                Some(_) => None,
                None => self.quotes.last_known(market, &holding.code),
            };
            EnrichedHolding::new(holding.clone(), quote).with_last_known(last_known)
        }))
        .await
    }

    /// 获取全部分类的持仓行情
    pub async fn fetch_all(
        &self,
        config: &PortfolioConfig,
    ) -> BTreeMap<Category, Vec<EnrichedHolding>> {
        let results = join_all(Category::ALL.iter().map(|category| async move {
            (*category, self.fetch_category(config.category(*category)).await)
        }))
        .await;

        results.into_iter().collect()
    }

    /// 刷新一轮：批量获取后计算汇总
    pub async fn refresh(&self, config: &PortfolioConfig) -> PortfolioSummary {
        let holdings = self.fetch_all(config).await;
        let summary = summarize_portfolio(&holdings, config, get_beijing_time());

        if summary.stale_holdings > 0 {
            log::warn!(
                "组合刷新完成: {} 只持仓, {} 只行情缺失",
                config.holding_count(),
                summary.stale_holdings
            );
        } else {
            log::info!("组合刷新完成: {} 只持仓", config.holding_count());
        }

        summary
    }
}
