use actix_web::{web, HttpResponse, Result};

use super::AppState;
use crate::models::{ApiResponse, HistoryQuery, Market, PricePoint, Quote};

/// 单次查询K线天数上限
const MAX_HISTORY_DAYS: usize = 1000;

pub async fn get_quote(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (market, code) = path.into_inner();
    let market = match market.parse::<Market>() {
        Ok(market) => market,
        Err(e) => return Ok(HttpResponse::BadRequest().json(ApiResponse::<Quote>::error(e))),
    };

    match state.quotes.get_quote(market, &code).await {
        Some(quote) => Ok(HttpResponse::Ok().json(ApiResponse::success(quote))),
        None => {
            let response = ApiResponse::<Quote>::error(format!("暂无 {}_{} 的行情", market, code));
            Ok(HttpResponse::NotFound().json(response))
        }
    }
}

/// 历史K线，失败时返回空数组；days 须在 1..=MAX_HISTORY_DAYS 内
pub async fn get_quote_history(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse> {
    let (market, code) = path.into_inner();
    let market = match market.parse::<Market>() {
        Ok(market) => market,
        Err(e) => {
            let response = ApiResponse::<Vec<PricePoint>>::error(e);
            return Ok(HttpResponse::BadRequest().json(response));
        }
    };

    let days = query.days.unwrap_or(state.history_days);
    if !(1..=MAX_HISTORY_DAYS).contains(&days) {
        let response = ApiResponse::<Vec<PricePoint>>::error(format!(
            "days 须在 1 到 {} 之间: {}",
            MAX_HISTORY_DAYS, days
        ));
        return Ok(HttpResponse::BadRequest().json(response));
    }
    let series = state.quotes.get_historical_series(market, &code, days).await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(series)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/quotes")
            .route("/{market}/{code}", web::get().to(get_quote))
            .route("/{market}/{code}/history", web::get().to(get_quote_history))
    );
}
