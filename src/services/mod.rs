//! 业务逻辑服务模块
//!
//! 封装行情获取和组合汇总逻辑

pub mod portfolio; // 组合批量获取与汇总
pub mod quote;     // 行情数据源与缓存
