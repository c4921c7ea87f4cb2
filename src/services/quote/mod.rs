//! 行情数据服务模块
//!
//! 数据源抽象、iTick 接口实现、行情缓存与带缓存的获取服务

pub mod cache;
pub mod fetcher;
pub mod itick;
pub mod source;

pub use cache::QuoteCache;
pub use fetcher::{QuoteFetcher, DEFAULT_HISTORY_DAYS};
pub use itick::ITickClient;
pub use source::QuoteSource;
