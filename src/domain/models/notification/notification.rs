//! 알림 메시지 모델
//!
//! 메일과 웹 푸시 전송기에 전달되는 값 객체입니다. 본문 작성은
//! `services::notifications::templates`가 담당합니다.

use serde::{Deserialize, Serialize};

/// 알림 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// OAuth 가입 환영
    Welcome,
    /// 회원가입 이메일 인증
    Activation,
    /// 비밀번호 재설정 링크
    PasswordReset,
    /// 로그인 실패 누적 잠금
    AccountLocked,
    /// 새 로그인 감지
    SecurityAlert,
    /// 비밀번호 변경 완료
    PasswordChanged,
    /// 관리자 브로드캐스트 / 테스트
    Custom,
}

/// 발송할 메일
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
    #[serde(skip)]
    pub kind: Option<NotificationKind>,
}

/// 웹 푸시 페이로드 (서비스 워커가 받는 JSON)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub timestamp: i64,
}

/// 단일 구독에 대한 푸시 전송 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Delivered,
    /// 구독이 만료되어 더 이상 유효하지 않음 (HTTP 404/410)
    Expired,
}

/// 다중 전송 결과
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub success: usize,
    pub failed: usize,
    /// 만료되어 저장소에서 제거된 구독 수
    pub removed: usize,
}
