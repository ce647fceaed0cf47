//! # Google OAuth HTTP Handlers
//!
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | `GET` | `/auth/google` | 동의 화면 URL과 `state` 발급 |
//! | `GET` | `/auth/google/callback` | 코드 교환 후 프론트엔드로 리다이렉트 |
//! | `POST` | `/auth/google/verify` | Google ID 토큰 로그인 |
//! | `POST` | `/auth/google/revoke` | 연동 해제 (인증 필요) |
//!
//! Google OAuth가 설정되지 않은 경우 모두 503을 반환합니다.

use actix_web::{get, http::header, post, web, HttpResponse};
use validator::Validate;

use crate::core::context::AppContext;
use crate::core::errors::AppError;
use crate::domain::dto::oauth::request::{GoogleRevokeRequest, GoogleVerifyRequest, OAuthCallbackQuery};
use crate::domain::models::auth::AuthenticatedUser;
use crate::middlewares::AuthMiddleware;

#[get("/google")]
pub async fn google_login_url(ctx: web::Data<AppContext>) -> Result<HttpResponse, AppError> {
    let response = ctx.google.login_url()?;
    Ok(HttpResponse::Ok().json(response))
}

/// 결과는 JSON 대신 프론트엔드 리다이렉트로 전달합니다.
///
/// - 성공: `{FRONTEND_ORIGIN}/auth/success?token=...`
/// - 실패: `{FRONTEND_ORIGIN}/auth/error?error=...`
#[get("/google/callback")]
pub async fn google_oauth_callback(
    ctx: web::Data<AppContext>,
    query: web::Query<OAuthCallbackQuery>,
) -> Result<HttpResponse, AppError> {
    if !ctx.google.is_configured() {
        return Err(AppError::ServiceUnavailable(
            "Google OAuth가 설정되지 않았습니다".to_string(),
        ));
    }

    let frontend = ctx.config.server.frontend_origin.trim_end_matches('/');
    let query = query.into_inner();

    if let Some(error) = &query.error {
        let description = query
            .error_description
            .as_deref()
            .unwrap_or("OAuth 인증이 취소되었거나 실패했습니다");
        log::warn!("Google OAuth 에러: {} - {}", error, description);
        return Ok(redirect(format!(
            "{}/auth/error?error={}",
            frontend,
            urlencoding::encode(error)
        )));
    }

    let (Some(code), Some(state)) = (query.code.as_deref(), query.state.as_deref()) else {
        return Ok(redirect(format!("{}/auth/error?error=missing_code", frontend)));
    };

    match ctx.google.authenticate_with_code(code, state).await {
        Ok(auth) => Ok(redirect(format!(
            "{}/auth/success?token={}",
            frontend,
            urlencoding::encode(&auth.token)
        ))),
        Err(e) => {
            log::warn!("Google OAuth 로그인 실패: {}", e);
            Ok(redirect(format!(
                "{}/auth/error?error={}",
                frontend,
                urlencoding::encode(e.code())
            )))
        }
    }
}

fn redirect(location: String) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

#[post("/google/verify")]
pub async fn google_verify(
    ctx: web::Data<AppContext>,
    payload: web::Json<GoogleVerifyRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let response = ctx.google.verify_id_token(&payload.id_token).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/google/revoke", wrap = "AuthMiddleware::required()")]
pub async fn google_revoke(
    ctx: web::Data<AppContext>,
    auth: AuthenticatedUser,
    payload: Option<web::Json<GoogleRevokeRequest>>,
) -> Result<HttpResponse, AppError> {
    let access_token = payload.and_then(|p| p.into_inner().access_token);
    let response = ctx.google.revoke(&auth, access_token).await?;
    Ok(HttpResponse::Ok().json(response))
}
