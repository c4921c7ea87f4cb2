use actix_web::{web, HttpResponse, Result};
use serde::Serialize;

use super::AppState;
use crate::models::ApiResponse;

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
    holdings: usize,
    cached_quotes: usize,
    /// 缓存中已有行情
    cache_warm: bool,
}

pub async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse> {
    let status = HealthStatus {
        status: "ok",
        holdings: state.portfolio.holding_count(),
        cached_quotes: state.quotes.cache().len(),
        cache_warm: !state.quotes.cache().is_empty(),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(status)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
