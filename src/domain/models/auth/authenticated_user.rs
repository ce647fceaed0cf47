use std::future::{ready, Ready};

use actix_web::{FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::core::errors::AppError;
use crate::domain::entities::users::user::Role;

/// 세션 토큰에서 추출된 사용자 정보
///
/// 인증 미들웨어가 request extensions에 저장하며, 핸들러 인자로 바로 받을 수 있습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// 사용자 고유 ID (ObjectId hex)
    pub user_id: String,

    /// 토큰 발급 시점의 이메일
    pub email: String,

    /// 토큰 발급 시점의 역할
    pub role: Role,
}

impl AuthenticatedUser {
    /// 관리자 권한(admin, superAdmin) 보유 여부
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// 대상 사용자 본인이거나 관리자인지 확인
    pub fn can_manage(&self, target_user_id: &str) -> bool {
        self.user_id == target_user_id || self.is_admin()
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(AppError::AuthenticationError(
                "인증되지 않은 요청입니다".to_string(),
            ))),
        }
    }
}
