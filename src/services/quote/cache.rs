//! 行情缓存
//!
//! 按 (市场, 代码) 保存最近一次成功拉取的行情和拉取时刻，
//! 过期条目不删除，由下一次成功拉取整体替换

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

use crate::models::{Quote, QuoteKey};

/// 缓存条目
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub quote: Arc<Quote>,
    pub fetched_at: Instant,
}

impl CacheEntry {
    /// now - fetched_at < ttl
    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.fetched_at) < ttl
    }
}

/// 行情缓存
#[derive(Debug)]
pub struct QuoteCache {
    entries: Mutex<HashMap<QuoteKey, CacheEntry>>,
    ttl: Duration,
}

impl QuoteCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    // 锁内不做任何 await，中毒的锁直接复用内部数据
    fn lock(&self) -> MutexGuard<'_, HashMap<QuoteKey, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 查询缓存，返回行情及其缓存时长
    pub fn get(&self, key: &QuoteKey) -> Option<(Arc<Quote>, Duration)> {
        let now = Instant::now();
        self.lock()
            .get(key)
            .map(|entry| (entry.quote.clone(), now.saturating_duration_since(entry.fetched_at)))
    }

    /// 查询仍在有效期内的行情
    pub fn get_fresh(&self, key: &QuoteKey, now: Instant) -> Option<Arc<Quote>> {
        self.lock()
            .get(key)
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .map(|entry| entry.quote.clone())
    }

    /// 写入行情，已有条目整体替换
    pub fn put(&self, key: QuoteKey, quote: Arc<Quote>, fetched_at: Instant) {
        self.lock().insert(key, CacheEntry { quote, fetched_at });
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Default for QuoteCache {
    fn default() -> Self {
        Self::new(Duration::from_millis(30_000))
    }
}
