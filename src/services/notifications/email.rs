//! 메일 전송기
//!
//! 전송 방식은 [`EmailSender`] trait 뒤에 숨겨집니다. `EMAIL_API_URL`이 설정되면
//! [`HttpEmailSender`], 아니면 로그만 남기는 [`LogEmailSender`]가 주입됩니다.

use async_trait::async_trait;
use serde_json::json;

use crate::config::MailConfig;
use crate::core::errors::{AppError, AppResult};
use crate::domain::models::notification::EmailMessage;

#[async_trait]
pub trait EmailSender: Send + Sync {
    /// 메일 한 통을 전송합니다. 실패 시 `ExternalServiceError`를 반환합니다.
    async fn send(&self, message: &EmailMessage) -> AppResult<()>;
}

/// 개발용 전송기: 실제로 보내지 않고 수신자와 제목만 기록합니다.
#[derive(Debug, Clone, Default)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        log::info!(
            "📧 [메일 로그 전송] to={} subject={} kind={:?}",
            message.to,
            message.subject,
            message.kind
        );
        Ok(())
    }
}

/// HTTP 메일 API 전송기
///
/// `POST {api_url}` 으로 `{from, to, subject, html, text}` JSON을 보냅니다.
pub struct HttpEmailSender {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    from_address: String,
}

impl HttpEmailSender {
    pub fn new(api_url: String, config: &MailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key: config.api_key.clone(),
            from_address: config.from_address.clone(),
        }
    }
}

#[async_trait]
impl EmailSender for HttpEmailSender {
    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        let mut request = self.client.post(&self.api_url).json(&json!({
            "from": self.from_address,
            "to": message.to,
            "subject": message.subject,
            "html": message.html,
            "text": message.text,
        }));

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("메일 API 요청 실패: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "메일 API 응답 오류: {}",
                response.status()
            )));
        }

        log::debug!("메일 전송 완료: {}", message.subject);
        Ok(())
    }
}
