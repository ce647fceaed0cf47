//! 알림 전송 설정
//!
//! 메일 API와 푸시 릴레이 주소를 관리합니다. 주소가 없으면 전송 대신
//! 로그만 남기는 구현이 선택됩니다.

use std::env;

/// 메일 전송 설정
///
/// # Environment Variables
///
/// - `EMAIL_API_URL`: HTTP 메일 API 주소 (없으면 로그 전송)
/// - `EMAIL_API_KEY`: Bearer 인증 키
/// - `EMAIL_FROM`: 발신 주소
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub from_address: String,
}

impl MailConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: env::var("EMAIL_API_URL").ok().filter(|v| !v.is_empty()),
            api_key: env::var("EMAIL_API_KEY").ok().filter(|v| !v.is_empty()),
            from_address: env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "no-reply@localhost".to_string()),
        }
    }
}

/// 웹 푸시 설정
///
/// # Environment Variables
///
/// - `VAPID_PUBLIC_KEY`: 클라이언트 구독에 필요한 공개 키
/// - `PUSH_RELAY_URL`: 푸시 전송 릴레이 주소 (없으면 로그 전송)
#[derive(Debug, Clone)]
pub struct PushConfig {
    pub vapid_public_key: Option<String>,
    pub relay_url: Option<String>,
}

impl PushConfig {
    pub fn from_env() -> Self {
        Self {
            vapid_public_key: env::var("VAPID_PUBLIC_KEY").ok().filter(|v| !v.is_empty()),
            relay_url: env::var("PUSH_RELAY_URL").ok().filter(|v| !v.is_empty()),
        }
    }
}
