//! iTick 行情接口实现
//!
//! 对接 {base}/stock/quote 和 {base}/stock/kline，
//! 统一解析 { code, msg, data } 响应包

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde::Deserialize;

use super::source::QuoteSource;
use crate::config::ProviderConfig;
use crate::error::QuoteError;
use crate::models::{Market, PricePoint, Quote};

/// 实时行情路径
pub const ITICK_QUOTE_PATH: &str = "/stock/quote";
/// K线路径
pub const ITICK_KLINE_PATH: &str = "/stock/kline";
/// 日K线类型
pub const ITICK_DAILY_KTYPE: &str = "10";

/// 响应包
#[derive(Debug, Deserialize)]
struct Envelope {
    code: i64,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

/// 实时行情原始字段
#[derive(Debug, Deserialize)]
struct QuotePayload {
    s: String,
    ld: f64,
    o: f64,
    h: f64,
    l: f64,
    v: f64,
    t: i64,
}

impl From<QuotePayload> for Quote {
    fn from(p: QuotePayload) -> Self {
        Quote {
            symbol: p.s,
            last_price: p.ld,
            open: p.o,
            high: p.h,
            low: p.l,
            volume: p.v,
            timestamp: p.t,
        }
    }
}

/// K线原始字段
#[derive(Debug, Deserialize)]
struct CandlePayload {
    t: i64,
    o: f64,
    h: f64,
    l: f64,
    c: f64,
    v: f64,
    #[serde(default)]
    tu: Option<f64>,
}

impl From<CandlePayload> for PricePoint {
    fn from(p: CandlePayload) -> Self {
        PricePoint {
            timestamp: p.t,
            open: p.o,
            high: p.h,
            low: p.l,
            close: p.c,
            volume: p.v,
            turnover: p.tu,
        }
    }
}

/// iTick 行情客户端
pub struct ITickClient {
    client: Client,
    base_url: String,
}

impl ITickClient {
    /// 按配置构建客户端，token 作为默认请求头
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if !config.token.is_empty() {
            let token = HeaderValue::from_str(&config.token).context("token 含有非法字符")?;
            headers.insert("token", token);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_envelope(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<serde_json::Value, QuoteError> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("请求 iTick 接口: {} {:?}", url, query);

        let response = self.client.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            return Err(QuoteError::HttpStatus(response.status().as_u16()));
        }

        let text = response.text().await?;
        unwrap_envelope(&text)
    }
}

#[async_trait]
impl QuoteSource for ITickClient {
    async fn fetch_quote(&self, market: Market, code: &str) -> Result<Quote, QuoteError> {
        let data = self
            .get_envelope(ITICK_QUOTE_PATH, &[("region", market.region()), ("code", code)])
            .await?;
        parse_quote(data)
    }

    async fn fetch_kline(
        &self,
        market: Market,
        code: &str,
        limit: usize,
    ) -> Result<Vec<PricePoint>, QuoteError> {
        let limit = limit.to_string();
        let data = self
            .get_envelope(
                ITICK_KLINE_PATH,
                &[
                    ("region", market.region()),
                    ("code", code),
                    ("kType", ITICK_DAILY_KTYPE),
                    ("limit", limit.as_str()),
                ],
            )
            .await?;
        parse_kline(data)
    }
}

/// 拆包：code == 0 且 data 非空才算成功
fn unwrap_envelope(body: &str) -> Result<serde_json::Value, QuoteError> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| QuoteError::Malformed(format!("响应不是合法 JSON: {}", e)))?;

    if envelope.code != 0 {
        return Err(QuoteError::Provider {
            code: envelope.code,
            msg: envelope.msg.unwrap_or_default(),
        });
    }

    match envelope.data {
        Some(data) if !data.is_null() => Ok(data),
        _ => Err(QuoteError::Malformed("缺少 data 字段".to_string())),
    }
}

fn parse_quote(data: serde_json::Value) -> Result<Quote, QuoteError> {
    serde_json::from_value::<QuotePayload>(data)
        .map(Quote::from)
        .map_err(|e| QuoteError::Malformed(format!("行情字段不完整: {}", e)))
}

fn parse_kline(data: serde_json::Value) -> Result<Vec<PricePoint>, QuoteError> {
    serde_json::from_value::<Vec<CandlePayload>>(data)
        .map(|candles| candles.into_iter().map(PricePoint::from).collect())
        .map_err(|e| QuoteError::Malformed(format!("K线字段不完整: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(base_url: &str) -> ITickClient {
        let config = ProviderConfig {
            base_url: base_url.to_string(),
            token: "test-token".to_string(),
            ..ProviderConfig::default()
        };
        ITickClient::new(&config).unwrap()
    }

    #[test]
    fn test_unwrap_envelope_errors() {
        let err = unwrap_envelope(r#"{"code":1,"msg":"invalid token"}"#).unwrap_err();
        match err {
            QuoteError::Provider { code, msg } => {
                assert_eq!(code, 1);
                assert_eq!(msg, "invalid token");
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let err = unwrap_envelope(r#"{"code":0,"data":null}"#).unwrap_err();
        assert_eq!(err.kind(), "malformed");

        let err = unwrap_envelope("<html>bad gateway</html>").unwrap_err();
        assert_eq!(err.kind(), "malformed");
    }

    #[test]
    fn test_parse_quote_missing_field_is_malformed() {
        let data = serde_json::json!({ "s": "700", "ld": 320.4, "o": 318.0 });
        let err = parse_quote(data).unwrap_err();
        assert_eq!(err.kind(), "malformed");
    }

    #[tokio::test]
    async fn test_fetch_quote_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/stock/quote")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("region".into(), "HK".into()),
                Matcher::UrlEncoded("code".into(), "700".into()),
            ]))
            .match_header("token", "test-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"code":0,"msg":null,"data":{"s":"700","ld":320.4,"o":318.0,"h":322.6,"l":317.2,"v":15234567,"t":1731052800000}}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server.url());
        let quote = client.fetch_quote(Market::HongKong, "700").await.unwrap();

        mock.assert_async().await;
        assert_eq!(quote.symbol, "700");
        assert_eq!(quote.last_price, 320.4);
        assert_eq!(quote.open, 318.0);
        assert_eq!(quote.high, 322.6);
        assert_eq!(quote.low, 317.2);
        assert_eq!(quote.volume, 15_234_567.0);
        assert_eq!(quote.timestamp, 1_731_052_800_000);
    }

    #[tokio::test]
    async fn test_fetch_quote_http_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/stock/quote")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let err = client.fetch_quote(Market::Us, "AAPL").await.unwrap_err();

        assert!(matches!(err, QuoteError::HttpStatus(503)));
    }

    #[tokio::test]
    async fn test_fetch_quote_provider_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/stock/quote")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"code":429,"msg":"rate limited"}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let err = client.fetch_quote(Market::Us, "AAPL").await.unwrap_err();

        assert_eq!(err.kind(), "provider");
        assert!(err.to_string().contains("rate limited"));
    }

    #[tokio::test]
    async fn test_fetch_quote_unreachable() {
        // 端口 1 上没有服务
        let client = client_for("http://127.0.0.1:1");
        let err = client.fetch_quote(Market::Us, "AAPL").await.unwrap_err();

        assert_eq!(err.kind(), "transport");
    }

    #[tokio::test]
    async fn test_fetch_kline_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/stock/kline")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("region".into(), "US".into()),
                Matcher::UrlEncoded("code".into(), "QQQ".into()),
                Matcher::UrlEncoded("kType".into(), "10".into()),
                Matcher::UrlEncoded("limit".into(), "2".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"code":0,"data":[
                    {"t":1730937600000,"o":500.1,"h":505.0,"l":499.0,"c":504.2,"v":32000000,"tu":1.6e10},
                    {"t":1731024000000,"o":504.5,"h":510.3,"l":503.8,"c":509.9,"v":28000000}
                ]}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server.url());
        let series = client.fetch_kline(Market::Us, "QQQ", 2).await.unwrap();

        mock.assert_async().await;
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].close, 504.2);
        assert_eq!(series[0].turnover, Some(1.6e10));
        assert_eq!(series[1].timestamp, 1_731_024_000_000);
        assert_eq!(series[1].turnover, None);
    }
}
