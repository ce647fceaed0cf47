//! # Authentication Configuration Module
//!
//! 토큰 발급, 로그인 잠금 정책, Google OAuth 관련 설정을 관리합니다.
//!
//! ## 환경 변수
//!
//! ### 토큰
//! ```bash
//! export JWT_SECRET="your-super-secret-jwt-key"   # 프로덕션 필수
//! export SESSION_TOKEN_TTL_HOURS="168"
//! export ACTIVATION_TOKEN_TTL_HOURS="24"
//! export PASSWORD_RESET_TTL_MINUTES="15"
//! export REFRESH_GRACE_SECONDS="0"
//! ```
//!
//! ### 로그인 잠금
//! ```bash
//! export MAX_LOGIN_ATTEMPTS="5"
//! export LOCKOUT_MINUTES="15"
//! ```
//!
//! ### Google OAuth (선택)
//! ```bash
//! export GOOGLE_CLIENT_ID="your-google-client-id"
//! export GOOGLE_CLIENT_SECRET="your-google-client-secret"
//! export GOOGLE_REDIRECT_URI="http://localhost:8080/auth/google/callback"
//! ```
//!
//! 세 값 중 하나라도 없으면 Google 관련 엔드포인트는 503을 반환합니다.

use std::env;

use serde::{Deserialize, Serialize};

use super::{env_parse, Environment};
use crate::core::errors::{AppError, AppResult};

const DEV_JWT_SECRET: &str = "dev-only-insecure-jwt-secret";

/// 토큰 발급 및 로그인 잠금 정책
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 서명 비밀키
    pub jwt_secret: String,
    /// 세션 토큰 유효 시간 (기본 168시간 = 7일)
    pub session_ttl_hours: i64,
    /// 계정 활성화 토큰 유효 시간 (기본 24시간)
    pub activation_ttl_hours: i64,
    /// 비밀번호 재설정 토큰 유효 시간 (기본 15분)
    pub reset_ttl_minutes: i64,
    /// 만료된 세션 토큰을 갱신할 수 있는 유예 시간(초)
    pub refresh_grace_seconds: i64,
    /// OAuth state 토큰 유효 시간 (기본 10분)
    pub oauth_state_ttl_minutes: i64,
    /// 잠금까지 허용되는 연속 로그인 실패 횟수 (기본 5)
    pub max_login_attempts: i32,
    /// 잠금 지속 시간 (기본 15분)
    pub lockout_minutes: i64,
}

impl AuthConfig {
    /// 환경 변수에서 인증 정책을 읽습니다.
    ///
    /// # Errors
    ///
    /// * 프로덕션/스테이징 환경에서 `JWT_SECRET`이 없는 경우
    pub fn from_env(environment: &Environment) -> AppResult<Self> {
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if environment.is_development() => {
                log::warn!("⚠️ JWT_SECRET이 설정되지 않아 개발용 기본값을 사용합니다");
                DEV_JWT_SECRET.to_string()
            }
            _ => {
                return Err(AppError::InternalError(
                    "JWT_SECRET 환경 변수가 필요합니다".to_string(),
                ));
            }
        };

        Ok(Self {
            jwt_secret,
            session_ttl_hours: env_parse("SESSION_TOKEN_TTL_HOURS", 168i64),
            activation_ttl_hours: env_parse("ACTIVATION_TOKEN_TTL_HOURS", 24i64),
            reset_ttl_minutes: env_parse("PASSWORD_RESET_TTL_MINUTES", 15i64),
            refresh_grace_seconds: env_parse("REFRESH_GRACE_SECONDS", 0i64),
            oauth_state_ttl_minutes: env_parse("OAUTH_STATE_TTL_MINUTES", 10i64),
            max_login_attempts: env_parse("MAX_LOGIN_ATTEMPTS", 5i32),
            lockout_minutes: env_parse("LOCKOUT_MINUTES", 15i64),
        })
    }
}

/// Google OAuth 2.0 클라이언트 설정
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub userinfo_uri: String,
    pub tokeninfo_uri: String,
    pub revoke_uri: String,
}

impl GoogleOAuthConfig {
    /// 클라이언트 ID, 시크릿, 리다이렉트 URI가 모두 있을 때만 `Some`을 반환합니다.
    pub fn from_env() -> Option<Self> {
        let client_id = non_empty_var("GOOGLE_CLIENT_ID")?;
        let client_secret = non_empty_var("GOOGLE_CLIENT_SECRET")?;
        let redirect_uri = non_empty_var("GOOGLE_REDIRECT_URI")?;

        Some(Self {
            client_id,
            client_secret,
            redirect_uri,
            auth_uri: env::var("GOOGLE_AUTH_URI")
                .unwrap_or_else(|_| "https://accounts.google.com/o/oauth2/v2/auth".to_string()),
            token_uri: env::var("GOOGLE_TOKEN_URI")
                .unwrap_or_else(|_| "https://oauth2.googleapis.com/token".to_string()),
            userinfo_uri: "https://www.googleapis.com/oauth2/v2/userinfo".to_string(),
            tokeninfo_uri: "https://oauth2.googleapis.com/tokeninfo".to_string(),
            revoke_uri: "https://oauth2.googleapis.com/revoke".to_string(),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// 계정의 인증 방식
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    /// 이메일/비밀번호
    Local,
    /// Google OAuth
    Google,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Local => "local",
            AuthProvider::Google => "google",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_provider_as_string() {
        assert_eq!(AuthProvider::Local.as_str(), "local");
        assert_eq!(AuthProvider::Google.as_str(), "google");
    }

    #[test]
    fn test_auth_provider_serialization() {
        let json = serde_json::to_string(&AuthProvider::Google).unwrap();
        assert_eq!(json, "\"google\"");
        let back: AuthProvider = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AuthProvider::Google);
    }
}
