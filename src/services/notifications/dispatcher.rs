//! 알림 디스패처
//!
//! 상태 변경을 일으킨 요청과 알림 전송을 분리합니다.
//!
//! | 알림 | 채널 | 실패 처리 |
//! |------|------|-----------|
//! | 회원가입 이메일 인증 | 메일 | 호출자에게 502 반환 |
//! | 활성화 재발송, 비밀번호 재설정 | 메일 | 로그만 기록 |
//! | 계정 잠금 | 메일 + 푸시 | 로그만 기록 |
//! | 새 로그인 | 메일 + 푸시 | 로그만 기록 |
//! | 비밀번호 변경 | 푸시 | 로그만 기록 |
//! | OAuth 가입 환영 | 메일 | 로그만 기록 |
//!
//! 회원가입 인증 메일을 제외한 모든 알림은 `actix_web::rt::spawn`으로
//! 백그라운드에서 전송되어 HTTP 응답을 지연시키지 않습니다.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::users::user::{Role, User};
use crate::domain::models::notification::{DeliveryReport, EmailMessage, PushOutcome, PushPayload};
use crate::repositories::users::UserStore;
use crate::services::notifications::email::EmailSender;
use crate::services::notifications::push::{truncate_endpoint, PushSender};
use crate::services::notifications::templates;
use crate::utils::clock::Clock;

#[derive(Clone)]
pub struct NotificationDispatcher {
    email: Arc<dyn EmailSender>,
    push: Arc<dyn PushSender>,
    store: Arc<dyn UserStore>,
    clock: Arc<dyn Clock>,
    api_url: String,
    frontend_origin: String,
    activation_ttl_hours: i64,
    reset_ttl_minutes: i64,
    lockout_minutes: i64,
}

impl NotificationDispatcher {
    pub fn new(
        config: &AppConfig,
        email: Arc<dyn EmailSender>,
        push: Arc<dyn PushSender>,
        store: Arc<dyn UserStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            email,
            push,
            store,
            clock,
            api_url: config.server.api_url.clone(),
            frontend_origin: config.server.frontend_origin.clone(),
            activation_ttl_hours: config.auth.activation_ttl_hours,
            reset_ttl_minutes: config.auth.reset_ttl_minutes,
            lockout_minutes: config.auth.lockout_minutes,
        }
    }

    fn activation_message(&self, user: &User, token: &str) -> EmailMessage {
        let link = templates::activation_link(&self.api_url, token);
        templates::activation_email(
            &user.email,
            user.name.as_deref(),
            &link,
            self.activation_ttl_hours,
        )
    }

    /// 회원가입 인증 메일. 전송 완료까지 기다리며 실패를 그대로 반환합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ExternalServiceError` - 메일 전송 실패
    pub async fn send_activation(&self, user: &User, token: &str) -> AppResult<()> {
        let message = self.activation_message(user, token);

        self.email.send(&message).await.map_err(|e| {
            log::error!("❌ 인증 메일 전송 실패 (user={}): {}", user.id_string(), e);
            match e {
                AppError::ExternalServiceError(_) => e,
                other => AppError::ExternalServiceError(other.to_string()),
            }
        })
    }

    /// 활성화 메일 재발송 (백그라운드)
    pub fn dispatch_activation(&self, user: &User, token: &str) {
        self.spawn_email(self.activation_message(user, token));
    }

    pub fn dispatch_password_reset(&self, user: &User, token: &str) {
        let link = templates::reset_link(&self.frontend_origin, token);
        self.spawn_email(templates::password_reset_email(
            &user.email,
            &link,
            self.reset_ttl_minutes,
        ));
    }

    pub fn dispatch_account_locked(&self, user: &User) {
        log::warn!(
            "🔒 계정 잠금 알림 발송 (user={}, {}분)",
            user.id_string(),
            self.lockout_minutes
        );
        self.spawn_email(templates::account_locked_email(
            &user.email,
            self.lockout_minutes,
        ));
        self.spawn_push(
            user.clone(),
            templates::account_locked_push(self.lockout_minutes, self.clock.now()),
        );
    }

    pub fn dispatch_login_alert(&self, user: &User) {
        let now = self.clock.now();
        self.spawn_email(templates::security_alert_email(&user.email, now));
        self.spawn_push(user.clone(), templates::security_alert_push(now));
    }

    pub fn dispatch_password_changed(&self, user: &User) {
        self.spawn_push(
            user.clone(),
            templates::password_changed_push(self.clock.now()),
        );
    }

    pub fn dispatch_welcome(&self, user: &User) {
        self.spawn_email(templates::welcome_email(&user.email, user.name.as_deref()));
    }

    fn spawn_email(&self, message: EmailMessage) {
        let sender = self.email.clone();
        actix_web::rt::spawn(async move {
            if let Err(e) = sender.send(&message).await {
                log::error!(
                    "❌ 알림 메일 전송 실패 ({:?}): {}",
                    message.kind,
                    e
                );
            }
        });
    }

    fn spawn_push(&self, user: User, payload: PushPayload) {
        if user.push_subscriptions.is_empty() {
            return;
        }

        let dispatcher = self.clone();
        actix_web::rt::spawn(async move {
            let report = dispatcher.send_to_user(&user, &payload).await;
            if report.failed > 0 {
                log::warn!(
                    "⚠️ 푸시 일부 실패 (user={}): 성공 {}, 실패 {}",
                    user.id_string(),
                    report.success,
                    report.failed
                );
            }
        });
    }

    /// 사용자의 모든 구독에 푸시를 보냅니다. 만료된 구독은 저장소에서 제거합니다.
    pub async fn send_to_user(&self, user: &User, payload: &PushPayload) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        for subscription in &user.push_subscriptions {
            match self.push.send(subscription, payload).await {
                Ok(PushOutcome::Delivered) => report.success += 1,
                Ok(PushOutcome::Expired) => {
                    report.failed += 1;
                    log::info!(
                        "만료된 푸시 구독 제거: {}",
                        truncate_endpoint(&subscription.endpoint)
                    );
                    match self
                        .store
                        .remove_push_subscription(&user.id, &subscription.endpoint, self.clock.now())
                        .await
                    {
                        Ok(_) => report.removed += 1,
                        Err(e) => log::error!("❌ 만료 구독 제거 실패: {}", e),
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    log::error!(
                        "❌ 푸시 전송 실패 ({}): {}",
                        truncate_endpoint(&subscription.endpoint),
                        e
                    );
                }
            }
        }

        report
    }

    /// 구독 중인 활성 사용자 전체(또는 특정 역할)에게 푸시를 보냅니다.
    pub async fn broadcast(
        &self,
        role: Option<Role>,
        payload: &PushPayload,
    ) -> AppResult<DeliveryReport> {
        let recipients = self.store.push_recipients(role).await?;
        let mut total = DeliveryReport::default();

        for user in &recipients {
            let report = self.send_to_user(user, payload).await;
            total.success += report.success;
            total.failed += report.failed;
            total.removed += report.removed;
        }

        log::info!(
            "📣 푸시 브로드캐스트 완료 (대상 {}명): 성공 {}, 실패 {}",
            recipients.len(),
            total.success,
            total.failed
        );

        Ok(total)
    }
}
