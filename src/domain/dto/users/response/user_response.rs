//! 사용자/인증 응답 DTO
//!
//! 비밀번호 해시, 활성화/재설정 토큰 다이제스트, 잠금 카운터는 어떤 응답에도
//! 포함되지 않습니다. `UserResponse`는 `User`에서만 생성됩니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AuthProvider;
use crate::domain::entities::users::user::{Role, User};
use crate::utils::clock::from_bson;

/// 클라이언트에 노출되는 사용자 정보
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    pub auth_provider: AuthProvider,
    pub is_active: bool,
    pub is_email_verified: bool,
    pub picture: Option<String>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let auth_provider = user.auth_provider();
        let User {
            id,
            email,
            name,
            role,
            is_active,
            is_email_verified,
            picture,
            last_login_at,
            created_at,
            updated_at,
            ..
        } = user;

        Self {
            id: id.to_hex(),
            email,
            name,
            role,
            auth_provider,
            is_active,
            is_email_verified,
            picture,
            last_login_at: last_login_at.map(from_bson),
            created_at: from_bson(created_at),
            updated_at: from_bson(updated_at),
        }
    }
}

/// 세션 토큰 발급 응답 (로그인, 토큰 갱신, Google ID 토큰 로그인)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    /// 만료까지 남은 시간(초)
    pub expires_in: i64,
    pub user: UserResponse,
}

impl AuthResponse {
    pub fn bearer(token: String, expires_in: i64, user: User) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
            expires_in,
            user: UserResponse::from(user),
        }
    }
}

/// 단순 메시지 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 메시지와 사용자 정보를 함께 담는 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub message: String,
    pub user: UserResponse,
}

impl UserEnvelope {
    pub fn new(message: impl Into<String>, user: User) -> Self {
        Self {
            message: message.into(),
            user: UserResponse::from(user),
        }
    }
}

/// 재설정 토큰 확인 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetTokenInfoResponse {
    pub valid: bool,
    pub email: String,
}

/// 사용자 수 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCountResponse {
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_never_contains_secrets() {
        let mut user = User::new_local(
            "kim@example.com".to_string(),
            Some("Kim".to_string()),
            "$2b$04$secret-hash".to_string(),
            Role::Student,
            Utc::now(),
        );
        user.activation_token = Some("digest".to_string());
        user.reset_password_token = Some("digest".to_string());

        let json = serde_json::to_string(&UserResponse::from(user)).unwrap();
        assert!(!json.contains("passwordHash"));
        assert!(!json.contains("secret-hash"));
        assert!(!json.contains("activationToken"));
        assert!(!json.contains("resetPasswordToken"));
        assert!(!json.contains("loginAttempts"));
        assert!(json.contains("\"authProvider\":\"local\""));
    }
}
