//! 组合服务模块
//!
//! 批量获取持仓行情并计算分类与组合汇总

pub mod fetcher;
pub mod summary;

pub use fetcher::PortfolioFetcher;
pub use summary::summarize_category;
