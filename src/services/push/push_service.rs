//! 웹 푸시 서비스
//!
//! 구독 등록/해제와 테스트 발송, 관리자 브로드캐스트를 담당합니다.
//! `VAPID_PUBLIC_KEY`가 설정되지 않으면 모든 기능이 503을 반환합니다.

use std::sync::Arc;

use crate::core::errors::{AppError, AppResult};
use crate::domain::dto::push::{
    DeliveryReportResponse, SendPushRequest, SendPushToRoleRequest, SubscribeRequest,
    UnsubscribeRequest, VapidKeyResponse,
};
use crate::domain::dto::users::response::MessageResponse;
use crate::domain::entities::users::user::PushSubscription;
use crate::domain::models::auth::AuthenticatedUser;
use crate::domain::models::notification::NotificationKind;
use crate::repositories::users::{parse_object_id, UserStore};
use crate::services::notifications::{templates, NotificationDispatcher};
use crate::utils::clock::Clock;

#[derive(Clone)]
pub struct PushService {
    vapid_public_key: Option<String>,
    store: Arc<dyn UserStore>,
    clock: Arc<dyn Clock>,
    notifier: NotificationDispatcher,
}

impl PushService {
    pub fn new(
        vapid_public_key: Option<String>,
        store: Arc<dyn UserStore>,
        clock: Arc<dyn Clock>,
        notifier: NotificationDispatcher,
    ) -> Self {
        Self {
            vapid_public_key,
            store,
            clock,
            notifier,
        }
    }

    fn ensure_configured(&self) -> AppResult<&str> {
        self.vapid_public_key.as_deref().ok_or_else(|| {
            AppError::ServiceUnavailable("푸시 알림 서비스가 설정되지 않았습니다".to_string())
        })
    }

    pub fn vapid_public_key(&self) -> AppResult<VapidKeyResponse> {
        Ok(VapidKeyResponse {
            public_key: self.ensure_configured()?.to_string(),
        })
    }

    /// 구독 등록. 같은 endpoint는 한 번만 저장됩니다.
    pub async fn subscribe(
        &self,
        auth: &AuthenticatedUser,
        request: SubscribeRequest,
    ) -> AppResult<MessageResponse> {
        self.ensure_configured()?;
        let id = parse_object_id(&auth.user_id)?;
        let subscription = PushSubscription::from(request.subscription);

        let before = self
            .store
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))?;

        if before
            .push_subscriptions
            .iter()
            .any(|s| s.endpoint == subscription.endpoint)
        {
            return Ok(MessageResponse::new("이미 등록된 구독입니다"));
        }

        self.store
            .add_push_subscription(&id, subscription, self.clock.now())
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))?;

        log::info!("🔔 푸시 구독 등록 (user={})", auth.user_id);
        Ok(MessageResponse::new("푸시 알림 구독이 등록되었습니다"))
    }

    pub async fn unsubscribe(
        &self,
        auth: &AuthenticatedUser,
        request: UnsubscribeRequest,
    ) -> AppResult<MessageResponse> {
        let id = parse_object_id(&auth.user_id)?;
        self.store
            .remove_push_subscription(&id, &request.endpoint, self.clock.now())
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))?;

        log::info!("푸시 구독 해제 (user={})", auth.user_id);
        Ok(MessageResponse::new("푸시 알림 구독이 해제되었습니다"))
    }

    /// 본인 구독으로 테스트 알림 발송
    pub async fn send_test(
        &self,
        auth: &AuthenticatedUser,
        request: SendPushRequest,
    ) -> AppResult<DeliveryReportResponse> {
        self.ensure_configured()?;
        let id = parse_object_id(&auth.user_id)?;
        let user = self
            .store
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))?;

        if user.push_subscriptions.is_empty() {
            return Err(AppError::ValidationError(
                "등록된 푸시 구독이 없습니다".to_string(),
            ));
        }

        let payload = templates::push(
            NotificationKind::Custom,
            request.title,
            request.body,
            request.url,
            self.clock.now(),
        );
        let report = self.notifier.send_to_user(&user, &payload).await;

        Ok(DeliveryReportResponse {
            message: "테스트 알림을 발송했습니다".to_string(),
            report,
        })
    }

    /// 전체 사용자에게 발송 (관리자)
    pub async fn send_to_all(
        &self,
        auth: &AuthenticatedUser,
        request: SendPushRequest,
    ) -> AppResult<DeliveryReportResponse> {
        self.ensure_configured()?;
        let payload = templates::push(
            NotificationKind::Custom,
            request.title,
            request.body,
            request.url,
            self.clock.now(),
        );

        log::info!("📣 전체 푸시 발송 요청 (by={})", auth.user_id);
        let report = self.notifier.broadcast(None, &payload).await?;

        Ok(DeliveryReportResponse {
            message: "전체 사용자에게 알림을 발송했습니다".to_string(),
            report,
        })
    }

    /// 특정 역할 사용자에게 발송 (관리자)
    pub async fn send_to_role(
        &self,
        auth: &AuthenticatedUser,
        request: SendPushToRoleRequest,
    ) -> AppResult<DeliveryReportResponse> {
        self.ensure_configured()?;
        let payload = templates::push(
            NotificationKind::Custom,
            request.title,
            request.body,
            request.url,
            self.clock.now(),
        );

        log::info!(
            "📣 역할별 푸시 발송 요청 (role={}, by={})",
            request.role.as_str(),
            auth.user_id
        );
        let report = self.notifier.broadcast(Some(request.role), &payload).await?;

        Ok(DeliveryReportResponse {
            message: format!("'{}' 역할 사용자에게 알림을 발송했습니다", request.role.as_str()),
            report,
        })
    }
}
