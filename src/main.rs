//! 基金组合监控后端服务
//!
//! 轮询 iTick 行情接口，汇总 A股、港股、美股三个分类的持仓收益，
//! 以 RESTful API 的形式提供给前端展示

mod config;     // 配置加载
mod error;      // 行情错误类型
mod handlers;   // HTTP 请求处理器
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use std::env;

use crate::config::AppConfig;
use crate::handlers::AppState;

/// 应用程序入口
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let (mut config, notes) = AppConfig::load();

    // 初始化日志系统，RUST_LOG 优先于配置文件中的级别
    env_logger::init_from_env(Env::default().default_filter_or(config.log.level.as_str()));
    for note in notes {
        log::info!("{}", note);
    }

    if let Ok(token) = env::var("ITICK_TOKEN") {
        config.provider.token = token;
    }
    if config.provider.token.is_empty() {
        log::warn!("未配置 iTick token，行情请求可能被拒绝");
    }

    let state = web::Data::new(AppState::new(&config)?);
    let bind_addr = config.bind_addr();

    log::info!(
        "启动基金监控服务: {}, 持仓 {} 只, 行情缓存 {} ms",
        bind_addr,
        config.portfolio.holding_count(),
        config.provider.cache_ttl_ms
    );

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())  // 添加请求日志中间件
            .app_data(state.clone())
            .configure(handlers::config)  // 配置路由
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(bind_addr)?.run().await?;
    Ok(())
}
