//! 라우트 구성
//!
//! ```text
//! /health, /health/full, /ready, /live      공개
//! /auth/*                                   공개 (/auth/google/revoke 제외)
//! /auth/login                               IP별 로그인 속도 제한 (설정 시)
//! /users/*                                  세션 토큰 필수
//! /push/vapid-public-key                    공개
//! /push/{subscribe,unsubscribe,test}        세션 토큰 필수
//! /push/{send-to-all,send-to-role}          관리자
//! ```

use actix_governor::governor::middleware::NoOpMiddleware;
use actix_governor::{Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor};
use actix_web::{error, web, HttpRequest};

use crate::config::RateLimitConfig;
use crate::core::errors::{AppError, AppResult};
use crate::handlers;
use crate::middlewares::AuthMiddleware;

/// `/auth/login` 전용 IP별 속도 제한 설정
pub type LoginRateLimit = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// 로그인 속도 제한 설정 생성
///
/// `login_attempts`회를 한 번에 허용하고, `login_window_minutes` 동안 모두 회복됩니다.
///
/// # Errors
///
/// * `ValidationError` - 허용 횟수가 0인 경우
pub fn login_rate_limit(config: &RateLimitConfig) -> AppResult<LoginRateLimit> {
    GovernorConfigBuilder::default()
        .seconds_per_request(config.login_replenish_seconds())
        .burst_size(config.login_attempts)
        .finish()
        .ok_or_else(|| {
            AppError::ValidationError(
                "LOGIN_RATE_LIMIT_ATTEMPTS는 0보다 커야 합니다".to_string(),
            )
        })
}

/// 로그인 속도 제한 없이 전체 라우트를 등록합니다.
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    configure_routes(cfg, None);
}

pub fn configure_routes(cfg: &mut web::ServiceConfig, login_limit: Option<&LoginRateLimit>) {
    // 본문/쿼리 역직렬화 실패도 일관된 400 JSON으로 응답
    cfg.app_data(web::JsonConfig::default().limit(64 * 1024).error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler));

    configure_health_routes(cfg);
    configure_auth_routes(cfg, login_limit);
    configure_user_routes(cfg);
    configure_push_routes(cfg);
}

fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("JSON 본문 파싱 실패: {}", err);
    AppError::ValidationError(format!("잘못된 요청 본문입니다: {}", err)).into()
}

fn query_error_handler(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("쿼리 파싱 실패: {}", err);
    AppError::ValidationError(format!("잘못된 쿼리 파라미터입니다: {}", err)).into()
}

fn configure_health_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::health::health_check)
        .service(handlers::health::health_full)
        .service(handlers::health::readiness)
        .service(handlers::health::liveness);
}

fn configure_auth_routes(cfg: &mut web::ServiceConfig, login_limit: Option<&LoginRateLimit>) {
    let login = web::resource("/login").route(web::post().to(handlers::auth::login));
    let scope = match login_limit {
        Some(limit) => web::scope("/auth").service(login.wrap(Governor::new(limit))),
        None => web::scope("/auth").service(login),
    };

    cfg.service(
        scope
            // 로컬 인증
            .service(handlers::auth::register)
            .service(handlers::auth::refresh_token)
            .service(handlers::auth::forgot_password)
            .service(handlers::auth::verify_reset_token)
            .service(handlers::auth::reset_password)
            .service(handlers::auth::verify_token)
            .service(handlers::auth::activate_account)
            .service(handlers::auth::resend_activation)
            // Google OAuth
            .service(handlers::oauth::google_login_url)
            .service(handlers::oauth::google_oauth_callback)
            .service(handlers::oauth::google_verify)
            .service(handlers::oauth::google_revoke),
    );
}

fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .wrap(AuthMiddleware::required())
            .service(handlers::users::me)
            .service(handlers::users::update_profile)
            .service(handlers::users::change_password)
            .service(handlers::users::count_users)
            .service(handlers::users::delete_user)
            .service(handlers::users::unlock_user),
    );
}

fn configure_push_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/push")
            .service(handlers::push::vapid_public_key)
            .service(handlers::push::subscribe)
            .service(handlers::push::unsubscribe)
            .service(handlers::push::send_test)
            .service(handlers::push::send_to_all)
            .service(handlers::push::send_to_role),
    );
}
