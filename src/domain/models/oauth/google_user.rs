//! # Google OAuth 응답 모델
//!
//! Google OAuth 2.0 엔드포인트가 반환하는 JSON을 매핑합니다.
//!
//! | 모델 | 엔드포인트 |
//! |------|------------|
//! | `GoogleTokenResponse` | `POST https://oauth2.googleapis.com/token` |
//! | `GoogleUserInfo` | `GET https://www.googleapis.com/oauth2/v2/userinfo` |
//! | `GoogleIdTokenInfo` | `GET https://oauth2.googleapis.com/tokeninfo?id_token=` |

use serde::Deserialize;

/// Authorization code 교환 결과
#[derive(Debug, Deserialize)]
pub struct GoogleTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// userinfo 엔드포인트의 사용자 프로필
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUserInfo {
    /// Google 계정 고유 ID
    pub id: String,

    pub email: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub picture: Option<String>,

    #[serde(default)]
    pub verified_email: bool,
}

/// tokeninfo 엔드포인트의 ID 토큰 검증 결과
///
/// `email_verified`는 문자열 `"true"` 또는 불리언으로 내려옵니다.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleIdTokenInfo {
    pub sub: String,
    pub aud: String,
    pub email: String,
    #[serde(default)]
    pub email_verified: Option<serde_json::Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

impl GoogleIdTokenInfo {
    pub fn is_email_verified(&self) -> bool {
        match &self.email_verified {
            Some(serde_json::Value::Bool(v)) => *v,
            Some(serde_json::Value::String(s)) => s == "true",
            _ => false,
        }
    }

    pub fn into_user_info(self) -> GoogleUserInfo {
        let verified_email = self.is_email_verified();
        GoogleUserInfo {
            id: self.sub,
            email: self.email,
            name: self.name,
            picture: self.picture,
            verified_email,
        }
    }
}
