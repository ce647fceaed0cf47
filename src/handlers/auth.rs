//! # Authentication HTTP Handlers
//!
//! 로컬 계정 인증 엔드포인트입니다.
//!
//! | 메서드 | 경로 | 설명 | 상태 코드 |
//! |--------|------|------|-----------|
//! | `POST` | `/auth/register` | 회원가입 + 인증 메일 | 201 / 400 / 502 |
//! | `POST` | `/auth/login` | 로그인 | 200 / 401 / 403 / 423 |
//! | `POST` | `/auth/refresh-token` | 세션 갱신 | 200 / 401 / 403 |
//! | `POST` | `/auth/forgot-password` | 재설정 메일 요청 | 항상 200 |
//! | `POST` | `/auth/verify-reset-token` | 재설정 토큰 확인 | 200 / 400 |
//! | `POST` | `/auth/reset-password` | 비밀번호 재설정 | 200 / 400 |
//! | `POST` | `/auth/verify-token` | 이메일 인증 | 200 / 400 |
//! | `GET` | `/auth/activate-account?token=` | 메일 링크용 이메일 인증 | 200 / 400 |
//! | `POST` | `/auth/resend-activation` | 인증 메일 재발송 | 항상 200 |

use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::core::context::AppContext;
use crate::core::errors::AppError;
use crate::domain::dto::users::request::{
    ActivationQuery, ForgotPasswordRequest, LoginRequest, RefreshTokenRequest, RegisterRequest,
    ResendActivationRequest, ResetPasswordRequest, TokenRequest,
};

#[post("/register")]
pub async fn register(
    ctx: web::Data<AppContext>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let response = ctx.auth.register(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

/// 로그인
///
/// IP별 로그인 속도 제한을 걸 수 있도록 매크로 대신 `web::resource`로 등록됩니다.
pub async fn login(
    ctx: web::Data<AppContext>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let response = ctx.auth.login(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/refresh-token")]
pub async fn refresh_token(
    ctx: web::Data<AppContext>,
    payload: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let response = ctx.auth.refresh(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/forgot-password")]
pub async fn forgot_password(
    ctx: web::Data<AppContext>,
    payload: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let response = ctx.auth.forgot_password(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/verify-reset-token")]
pub async fn verify_reset_token(
    ctx: web::Data<AppContext>,
    payload: web::Json<TokenRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let response = ctx.auth.verify_reset_token(&payload.token).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/reset-password")]
pub async fn reset_password(
    ctx: web::Data<AppContext>,
    payload: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let response = ctx.auth.reset_password(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/verify-token")]
pub async fn verify_token(
    ctx: web::Data<AppContext>,
    payload: web::Json<TokenRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let response = ctx.auth.verify_activation(&payload.token).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// 인증 메일의 링크가 직접 여는 엔드포인트
#[get("/activate-account")]
pub async fn activate_account(
    ctx: web::Data<AppContext>,
    query: web::Query<ActivationQuery>,
) -> Result<HttpResponse, AppError> {
    query
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let response = ctx.auth.verify_activation(&query.token).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/resend-activation")]
pub async fn resend_activation(
    ctx: web::Data<AppContext>,
    payload: web::Json<ResendActivationRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let response = ctx.auth.resend_activation(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
