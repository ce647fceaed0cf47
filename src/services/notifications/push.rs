//! 웹 푸시 전송기
//!
//! VAPID 서명과 페이로드 암호화는 외부 릴레이가 담당하고, 이 서비스는
//! 구독 정보와 페이로드를 릴레이에 넘깁니다.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;

use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::users::user::PushSubscription;
use crate::domain::models::notification::{PushOutcome, PushPayload};

#[async_trait]
pub trait PushSender: Send + Sync {
    /// 구독 하나에 페이로드를 전송합니다.
    ///
    /// 구독이 만료된 경우 에러 대신 `PushOutcome::Expired`를 반환합니다.
    async fn send(
        &self,
        subscription: &PushSubscription,
        payload: &PushPayload,
    ) -> AppResult<PushOutcome>;
}

#[derive(Debug, Clone, Default)]
pub struct LogPushSender;

#[async_trait]
impl PushSender for LogPushSender {
    async fn send(
        &self,
        subscription: &PushSubscription,
        payload: &PushPayload,
    ) -> AppResult<PushOutcome> {
        log::info!(
            "🔔 [푸시 로그 전송] endpoint={} title={}",
            truncate_endpoint(&subscription.endpoint),
            payload.title
        );
        Ok(PushOutcome::Delivered)
    }
}

/// 푸시 릴레이 전송기
///
/// `POST {relay_url}` 으로 `{subscription, payload}`를 보내며,
/// 릴레이가 404/410을 돌려주면 구독이 만료된 것으로 판단합니다.
pub struct RelayPushSender {
    client: reqwest::Client,
    relay_url: String,
}

impl RelayPushSender {
    pub fn new(relay_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            relay_url,
        }
    }
}

#[async_trait]
impl PushSender for RelayPushSender {
    async fn send(
        &self,
        subscription: &PushSubscription,
        payload: &PushPayload,
    ) -> AppResult<PushOutcome> {
        let response = self
            .client
            .post(&self.relay_url)
            .json(&json!({
                "subscription": subscription,
                "payload": payload,
            }))
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("푸시 릴레이 요청 실패: {}", e)))?;

        match response.status() {
            status if status.is_success() => Ok(PushOutcome::Delivered),
            StatusCode::NOT_FOUND | StatusCode::GONE => Ok(PushOutcome::Expired),
            status => Err(AppError::ExternalServiceError(format!(
                "푸시 릴레이 응답 오류: {}",
                status
            ))),
        }
    }
}

/// 로그에 endpoint 전체를 남기지 않도록 앞부분만 자릅니다.
pub(crate) fn truncate_endpoint(endpoint: &str) -> String {
    let head: String = endpoint.chars().take(50).collect();
    if head.len() < endpoint.len() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_endpoint() {
        assert_eq!(truncate_endpoint("https://short"), "https://short");
        let long = format!("https://push.example.com/{}", "a".repeat(100));
        let truncated = truncate_endpoint(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 53);
    }
}
