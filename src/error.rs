//! 行情获取错误类型

use thiserror::Error;

/// 行情获取过程中的错误分类
#[derive(Debug, Error)]
pub enum QuoteError {
    /// 网络不可达、超时等传输层错误
    #[error("网络请求失败: {0}")]
    Transport(#[from] reqwest::Error),

    /// 非 2xx 的 HTTP 状态
    #[error("HTTP 状态异常: {0}")]
    HttpStatus(u16),

    /// 数据源返回的业务错误（code != 0）
    #[error("接口返回错误 (code={code}): {msg}")]
    Provider { code: i64, msg: String },

    /// 成功响应但数据缺失或字段不符
    #[error("响应数据格式错误: {0}")]
    Malformed(String),
}

impl QuoteError {
    /// 日志里使用的简短分类名
    pub fn kind(&self) -> &'static str {
        match self {
            QuoteError::Transport(_) => "transport",
            QuoteError::HttpStatus(_) => "http_status",
            QuoteError::Provider { .. } => "provider",
            QuoteError::Malformed(_) => "malformed",
        }
    }
}
