//! 收益汇总计算
//!
//! 纯函数：输入刷新后的持仓和静态配置，输出单个持仓、分类以及组合的价值与收益。
//! 当前价缺失是正常情况，每一步计算都按缺失处理而不是报错

use std::collections::BTreeMap;

use crate::models::{
    Category, CategoryConfig, CategorySummary, EnrichedHolding, HoldingRow, MissingPriceValue,
    PortfolioConfig, PortfolioSummary,
};

/// (现价 - 成本价) / 成本价 × 100，成本价为 0 或缺失时返回 None
pub fn profit_rate(current_price: Option<f64>, purchase_price: Option<f64>) -> Option<f64> {
    match (current_price, purchase_price) {
        (Some(current), Some(purchase)) if purchase != 0.0 => {
            Some((current - purchase) / purchase * 100.0)
        }
        _ => None,
    }
}

/// 收益 / 成本 × 100，成本为 0 时记为 0
fn rate_of(profit: f64, cost: f64) -> f64 {
    if cost == 0.0 {
        0.0
    } else {
        profit / cost * 100.0
    }
}

/// 计算单个持仓
pub fn summarize_holding(holding: &EnrichedHolding, category: &CategoryConfig) -> HoldingRow {
    let config = &holding.config;
    let cost = category.total_investment * config.allocation / 100.0;

    // 持有份额 = 成本 / 成本价
    let units = config
        .purchase_price
        .filter(|p| *p != 0.0)
        .map(|p| cost / p);

    let current_value = match (holding.current_price, units) {
        (Some(price), Some(units)) => price * units,
        _ => match category.missing_price_value {
            MissingPriceValue::LastKnown => match (holding.last_known_price, units) {
                (Some(price), Some(units)) => price * units,
                _ => 0.0,
            },
            MissingPriceValue::Zero => 0.0,
            MissingPriceValue::CostBasis => cost,
        },
    };

    let day_change_rate = holding
        .quote
        .as_ref()
        .filter(|q| q.open != 0.0)
        .map(|q| (q.last_price - q.open) / q.open * 100.0);

    let day_profit = match (holding.quote.as_ref(), units) {
        (Some(q), Some(units)) => (q.last_price - q.open) * units,
        _ => 0.0,
    };

    HoldingRow {
        code: config.code.clone(),
        name: config.name.clone(),
        allocation: config.allocation,
        purchase_price: config.purchase_price,
        current_price: holding.current_price,
        cost,
        current_value,
        profit_rate: profit_rate(holding.current_price, config.purchase_price),
        day_change_rate,
        day_profit,
        stale: holding.current_price.is_none(),
    }
}

/// 计算分类汇总，行顺序与输入持仓一致
pub fn summarize_category(
    holdings: &[EnrichedHolding],
    category: &CategoryConfig,
) -> CategorySummary {
    let rows: Vec<HoldingRow> = holdings
        .iter()
        .map(|h| summarize_holding(h, category))
        .collect();

    let total_current_value: f64 = rows.iter().map(|r| r.current_value).sum();
    let total_cost: f64 = rows.iter().map(|r| r.cost).sum();
    let total_profit = total_current_value - total_cost;

    CategorySummary {
        currency: category.currency.clone(),
        total_current_value,
        total_cost,
        total_profit,
        total_profit_rate: rate_of(total_profit, total_cost),
        today_profit: rows.iter().map(|r| r.day_profit).sum(),
        holdings: rows,
    }
}

/// 总资产：各分类当前价值之和
pub fn total_assets<'a, I>(summaries: I) -> f64
where
    I: IntoIterator<Item = &'a CategorySummary>,
{
    summaries.into_iter().map(|s| s.total_current_value).sum()
}

/// 计算组合总览
pub fn summarize_portfolio(
    holdings: &BTreeMap<Category, Vec<EnrichedHolding>>,
    config: &PortfolioConfig,
    refreshed_at: String,
) -> PortfolioSummary {
    let categories: BTreeMap<Category, CategorySummary> = Category::ALL
        .iter()
        .map(|category| {
            let rows = holdings.get(category).map(Vec::as_slice).unwrap_or(&[]);
            (*category, summarize_category(rows, config.category(*category)))
        })
        .collect();

    let total_assets = total_assets(categories.values());
    let total_cost: f64 = categories.values().map(|s| s.total_cost).sum();
    let total_profit = total_assets - total_cost;

    PortfolioSummary {
        total_assets,
        total_cost,
        total_profit,
        total_profit_rate: rate_of(total_profit, total_cost),
        today_profit: categories.values().map(|s| s.today_profit).sum(),
        stale_holdings: categories.values().map(CategorySummary::stale_count).sum(),
        categories,
        refreshed_at,
    }
}
