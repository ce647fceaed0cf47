//! JWT 토큰 클레임
//!
//! 하나의 서명 비밀키로 세 가지 용도의 토큰을 발급하며, `purpose` 클레임으로
//! 서로 다른 용도의 토큰이 교차 사용되지 않도록 구분합니다.

use serde::{Deserialize, Serialize};

use crate::domain::entities::users::user::Role;

/// 토큰 용도
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    /// 로그인 세션 (Bearer)
    Session,
    /// 이메일 인증 / 계정 활성화
    Activation,
    /// 비밀번호 재설정
    PasswordReset,
}

impl TokenPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenPurpose::Session => "session",
            TokenPurpose::Activation => "activation",
            TokenPurpose::PasswordReset => "password_reset",
        }
    }
}

/// 사용자 토큰 클레임
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// 사용자 ID (ObjectId hex)
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub purpose: TokenPurpose,
    /// 발급 시각 (unix seconds)
    pub iat: i64,
    /// 만료 시각 (unix seconds)
    pub exp: i64,
    /// 토큰 고유 ID. 같은 초에 발급된 토큰도 서로 다른 값을 갖습니다.
    pub jti: String,
}

/// OAuth `state` 파라미터용 클레임 (CSRF 방지)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthStateClaims {
    pub nonce: String,
    pub iat: i64,
    pub exp: i64,
}

/// 발급된 세션 토큰과 만료까지 남은 시간
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}
