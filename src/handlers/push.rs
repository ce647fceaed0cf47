//! # Web Push HTTP Handlers
//!
//! | 메서드 | 경로 | 권한 |
//! |--------|------|------|
//! | `GET` | `/push/vapid-public-key` | 공개 |
//! | `POST` | `/push/subscribe` | 인증 |
//! | `DELETE` | `/push/unsubscribe` | 인증 |
//! | `POST` | `/push/test` | 인증 |
//! | `POST` | `/push/send-to-all` | 관리자 |
//! | `POST` | `/push/send-to-role` | 관리자 |

use actix_web::{delete, get, post, web, HttpResponse};
use validator::Validate;

use crate::core::context::AppContext;
use crate::core::errors::AppError;
use crate::domain::dto::push::{
    SendPushRequest, SendPushToRoleRequest, SubscribeRequest, UnsubscribeRequest,
};
use crate::domain::models::auth::AuthenticatedUser;
use crate::middlewares::AuthMiddleware;

#[get("/vapid-public-key")]
pub async fn vapid_public_key(ctx: web::Data<AppContext>) -> Result<HttpResponse, AppError> {
    let response = ctx.push.vapid_public_key()?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/subscribe", wrap = "AuthMiddleware::required()")]
pub async fn subscribe(
    ctx: web::Data<AppContext>,
    auth: AuthenticatedUser,
    payload: web::Json<SubscribeRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let response = ctx.push.subscribe(&auth, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[delete("/unsubscribe", wrap = "AuthMiddleware::required()")]
pub async fn unsubscribe(
    ctx: web::Data<AppContext>,
    auth: AuthenticatedUser,
    payload: web::Json<UnsubscribeRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let response = ctx.push.unsubscribe(&auth, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/test", wrap = "AuthMiddleware::required()")]
pub async fn send_test(
    ctx: web::Data<AppContext>,
    auth: AuthenticatedUser,
    payload: web::Json<SendPushRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let response = ctx.push.send_test(&auth, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/send-to-all", wrap = "AuthMiddleware::admin()")]
pub async fn send_to_all(
    ctx: web::Data<AppContext>,
    auth: AuthenticatedUser,
    payload: web::Json<SendPushRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let response = ctx.push.send_to_all(&auth, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/send-to-role", wrap = "AuthMiddleware::admin()")]
pub async fn send_to_role(
    ctx: web::Data<AppContext>,
    auth: AuthenticatedUser,
    payload: web::Json<SendPushToRoleRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let response = ctx.push.send_to_role(&auth, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
