//! # User Management HTTP Handlers
//!
//! `/users` 스코프는 전체가 세션 토큰 인증(`AuthMiddleware::required()`) 아래에 있습니다.
//!
//! | 메서드 | 경로 | 설명 | 권한 |
//! |--------|------|------|------|
//! | `GET` | `/users/me` | 내 정보 | 본인 |
//! | `PUT` | `/users/profile` | 이름/이메일 수정 (409: 이메일 중복) | 본인 |
//! | `PUT` | `/users/change-password` | 비밀번호 변경 | 본인 |
//! | `DELETE` | `/users/{id}` | 소프트 삭제 | 본인 또는 관리자 |
//! | `GET` | `/users/count?role=` | 사용자 수 | 관리자 |
//! | `POST` | `/users/{id}/unlock` | 로그인 잠금 해제 | 관리자 |

use actix_web::{delete, get, post, put, web, HttpResponse};
use validator::Validate;

use crate::core::context::AppContext;
use crate::core::errors::AppError;
use crate::domain::dto::users::request::{
    ChangePasswordRequest, CountUsersQuery, UpdateProfileRequest,
};
use crate::domain::models::auth::AuthenticatedUser;

#[get("/me")]
pub async fn me(
    ctx: web::Data<AppContext>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = ctx.users.me(&auth).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[put("/profile")]
pub async fn update_profile(
    ctx: web::Data<AppContext>,
    auth: AuthenticatedUser,
    payload: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let response = ctx.users.update_profile(&auth, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[put("/change-password")]
pub async fn change_password(
    ctx: web::Data<AppContext>,
    auth: AuthenticatedUser,
    payload: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let response = ctx.users.change_password(&auth, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

// `/count`가 `/{user_id}`보다 먼저 등록되어야 합니다.
#[get("/count")]
pub async fn count_users(
    ctx: web::Data<AppContext>,
    auth: AuthenticatedUser,
    query: web::Query<CountUsersQuery>,
) -> Result<HttpResponse, AppError> {
    let response = ctx.users.count(&auth, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[delete("/{user_id}")]
pub async fn delete_user(
    ctx: web::Data<AppContext>,
    auth: AuthenticatedUser,
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = ctx.users.delete_user(&auth, &user_id).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/{user_id}/unlock")]
pub async fn unlock_user(
    ctx: web::Data<AppContext>,
    auth: AuthenticatedUser,
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let response = ctx.users.unlock(&auth, &user_id).await?;
    Ok(HttpResponse::Ok().json(response))
}
