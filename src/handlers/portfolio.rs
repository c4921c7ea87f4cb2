//! 组合接口处理器
//!
//! - GET /portfolio - 刷新并返回组合总览
//! - GET /portfolio/{category} - 刷新并返回单个分类（a-share / hk / us）

use actix_web::{web, HttpResponse, Result};

use super::AppState;
use crate::models::{ApiResponse, Category, CategorySummary};
use crate::services::portfolio::{summarize_category, PortfolioFetcher};

fn stale_message(stale: usize) -> String {
    if stale == 0 {
        "Success".to_string()
    } else {
        format!("{} 只持仓行情缺失", stale)
    }
}

pub async fn get_portfolio(state: web::Data<AppState>) -> Result<HttpResponse> {
    let summary = PortfolioFetcher::new(&state.quotes).refresh(&state.portfolio).await;
    let message = stale_message(summary.stale_holdings);

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(summary, message)))
}

pub async fn get_category(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let category = match path.into_inner().parse::<Category>() {
        Ok(category) => category,
        Err(e) => {
            let response = ApiResponse::<CategorySummary>::error(e);
            return Ok(HttpResponse::BadRequest().json(response));
        }
    };

    let config = state.portfolio.category(category);
    let holdings = PortfolioFetcher::new(&state.quotes).fetch_category(config).await;
    let summary = summarize_category(&holdings, config);
    let message = stale_message(summary.stale_count());

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(summary, message)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/portfolio")
            .route("", web::get().to(get_portfolio))
            .route("/{category}", web::get().to(get_category))
    );
}
