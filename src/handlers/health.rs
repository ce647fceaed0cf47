//! 헬스 체크 엔드포인트
//!
//! - `/health`, `/live`: 프로세스 생존 확인 (저장소 접근 없음)
//! - `/health/full`, `/ready`: 저장소 ping 포함, 실패 시 503

use actix_web::{get, web, HttpResponse};
use serde_json::json;

use crate::core::context::AppContext;

#[get("/health")]
pub async fn health_check(ctx: web::Data<AppContext>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "account_service",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": ctx.config.environment.as_str(),
        "timestamp": ctx.clock.now().to_rfc3339(),
    }))
}

#[get("/health/full")]
pub async fn health_full(ctx: web::Data<AppContext>) -> HttpResponse {
    let store = ctx.store.ping().await;
    let body = json!({
        "status": if store.is_ok() { "healthy" } else { "degraded" },
        "service": "account_service",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": ctx.clock.now().to_rfc3339(),
        "checks": {
            "store": if store.is_ok() { "up" } else { "down" },
            "googleOAuth": if ctx.google.is_configured() { "configured" } else { "disabled" },
            "push": if ctx.config.push.vapid_public_key.is_some() { "configured" } else { "disabled" },
        }
    });

    match store {
        Ok(()) => HttpResponse::Ok().json(body),
        Err(e) => {
            log::error!("❌ 저장소 헬스 체크 실패: {}", e);
            HttpResponse::ServiceUnavailable().json(body)
        }
    }
}

#[get("/ready")]
pub async fn readiness(ctx: web::Data<AppContext>) -> HttpResponse {
    match ctx.store.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({ "status": "ready" })),
        Err(e) => {
            log::warn!("⚠️ 준비 상태 아님: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({ "status": "not_ready" }))
        }
    }
}

#[get("/live")]
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "alive" }))
}
