pub mod health;
pub mod portfolio;
pub mod quote;

use actix_web::web;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::PortfolioConfig;
use crate::services::quote::{ITickClient, QuoteCache, QuoteFetcher};

/// 各 worker 共享的应用状态
pub struct AppState {
    pub quotes: QuoteFetcher<ITickClient>,
    pub portfolio: PortfolioConfig,
    pub history_days: usize,
}

impl AppState {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let cache = Arc::new(QuoteCache::new(config.provider.cache_ttl()));
        let client = ITickClient::new(&config.provider)?;

        Ok(Self {
            quotes: QuoteFetcher::new(client, cache),
            portfolio: config.portfolio.clone(),
            history_days: config.provider.history_days,
        })
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::config)
            .configure(portfolio::config)
            .configure(quote::config)
    );
}
