//! 통합 테스트 공용 도구
//!
//! 인메모리 저장소, 수동 시계, 기록용 메일/푸시 전송기로 `AppContext`를 조립합니다.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use account_service_backend::config::AppConfig;
use account_service_backend::core::{AppContext, AppError, AppResult};
use account_service_backend::domain::dto::users::{LoginRequest, RegisterRequest};
use account_service_backend::domain::entities::users::user::{PushSubscription, Role, User};
use account_service_backend::domain::models::notification::{
    EmailMessage, NotificationKind, PushOutcome, PushPayload,
};
use account_service_backend::repositories::users::{InMemoryUserStore, UserStore};
use account_service_backend::services::auth::PasswordHasher;
use account_service_backend::services::notifications::{EmailSender, PushSender};
use account_service_backend::utils::clock::ManualClock;

pub const PASSWORD: &str = "Strong1!";

/// 보낸 메일을 모두 기록하는 전송기
#[derive(Clone, Default)]
pub struct RecordingEmailSender {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
}

impl RecordingEmailSender {
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_of(&self, kind: NotificationKind) -> Vec<EmailMessage> {
        self.sent()
            .into_iter()
            .filter(|m| m.kind == Some(kind))
            .collect()
    }

    /// 해당 종류의 마지막 메일 본문 링크에서 `token=` 값을 꺼냅니다.
    pub fn last_token(&self, kind: NotificationKind, to: &str) -> Option<String> {
        self.sent_of(kind)
            .into_iter()
            .rev()
            .find(|m| m.to == to)
            .and_then(|m| extract_token(&m.text))
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

pub fn extract_token(text: &str) -> Option<String> {
    let start = text.find("token=")? + "token=".len();
    let token: String = text[start..]
        .chars()
        .take_while(|c| !c.is_whitespace())
        .collect();
    Some(urlencoding::decode(&token).ok()?.into_owned())
}

/// 항상 실패하는 메일 전송기
#[derive(Clone, Default)]
pub struct FailingEmailSender;

#[async_trait]
impl EmailSender for FailingEmailSender {
    async fn send(&self, _message: &EmailMessage) -> AppResult<()> {
        Err(AppError::ExternalServiceError("mail provider down".to_string()))
    }
}

/// 푸시 전송을 기록하고, 지정된 endpoint는 만료로 응답하는 전송기
#[derive(Clone, Default)]
pub struct RecordingPushSender {
    sent: Arc<Mutex<Vec<(String, PushPayload)>>>,
    expired: Arc<Mutex<Vec<String>>>,
}

impl RecordingPushSender {
    pub fn sent(&self) -> Vec<(String, PushPayload)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn expire(&self, endpoint: &str) {
        self.expired.lock().unwrap().push(endpoint.to_string());
    }
}

#[async_trait]
impl PushSender for RecordingPushSender {
    async fn send(
        &self,
        subscription: &PushSubscription,
        payload: &PushPayload,
    ) -> AppResult<PushOutcome> {
        if self.expired.lock().unwrap().contains(&subscription.endpoint) {
            return Ok(PushOutcome::Expired);
        }
        self.sent
            .lock()
            .unwrap()
            .push((subscription.endpoint.clone(), payload.clone()));
        Ok(PushOutcome::Delivered)
    }
}

pub struct TestContext {
    pub ctx: AppContext,
    pub store: Arc<InMemoryUserStore>,
    pub clock: Arc<ManualClock>,
    pub mail: RecordingEmailSender,
    pub push: RecordingPushSender,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_email_sender(AppConfig::for_tests(), None)
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self::with_email_sender(config, None)
    }

    /// 메일 전송이 항상 실패하는 컨텍스트
    pub fn with_failing_mail() -> Self {
        Self::with_email_sender(AppConfig::for_tests(), Some(Arc::new(FailingEmailSender)))
    }

    fn with_email_sender(config: AppConfig, email: Option<Arc<dyn EmailSender>>) -> Self {
        let store = Arc::new(InMemoryUserStore::new());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let mail = RecordingEmailSender::default();
        let push = RecordingPushSender::default();

        let email: Arc<dyn EmailSender> = match email {
            Some(sender) => sender,
            None => Arc::new(mail.clone()),
        };

        let ctx = AppContext::new(
            config,
            store.clone(),
            email,
            Arc::new(push.clone()),
            clock.clone(),
        );

        Self {
            ctx,
            store,
            clock,
            mail,
            push,
        }
    }

    /// 회원가입 후 인증 메일 토큰을 반환합니다.
    pub async fn register(&self, email: &str, role: Option<Role>) -> String {
        self.ctx
            .auth
            .register(RegisterRequest {
                email: email.to_string(),
                password: PASSWORD.to_string(),
                role,
                name: Some("Tester".to_string()),
            })
            .await
            .expect("register");

        self.mail
            .last_token(NotificationKind::Activation, email)
            .expect("activation token")
    }

    /// 가입, 활성화, 로그인까지 마치고 (사용자 ID, 세션 토큰)을 반환합니다.
    pub async fn active_user(&self, email: &str, role: Option<Role>) -> (String, String) {
        let activation = self.register(email, role).await;
        self.ctx
            .auth
            .verify_activation(&activation)
            .await
            .expect("activate");
        self.login(email).await
    }

    pub async fn login(&self, email: &str) -> (String, String) {
        let response = self
            .ctx
            .auth
            .login(LoginRequest {
                email: email.to_string(),
                password: PASSWORD.to_string(),
            })
            .await
            .expect("login");
        (response.user.id, response.token)
    }

    /// 관리자 계정은 자가 가입이 불가능하므로 저장소에 직접 넣습니다.
    pub async fn admin(&self, email: &str) -> (String, String) {
        let hash = PasswordHasher::new(4).hash(PASSWORD).expect("hash");
        let mut user = User::new_local(
            email.to_string(),
            Some("Admin".to_string()),
            hash,
            Role::Admin,
            Utc::now(),
        );
        user.is_active = true;
        user.is_email_verified = true;
        self.store.insert(user).await.expect("insert admin");
        self.login(email).await
    }

    pub async fn user(&self, email: &str) -> User {
        self.store
            .find_by_email(email)
            .await
            .expect("store")
            .expect("user exists")
    }

    /// 백그라운드 알림 태스크가 끝날 때까지 잠시 양보합니다.
    pub async fn settle(&self) {
        for _ in 0..5 {
            actix_web::rt::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// 테스트 앱 생성
macro_rules! init_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(
                    actix_web::middleware::ErrorHandlers::new().default_handler_server(
                        account_service_backend::middlewares::internal_error_detail,
                    ),
                )
                .app_data(actix_web::web::Data::new($ctx.clone()))
                .configure(account_service_backend::routes::configure_all_routes),
        )
        .await
    };
}

/// 요청을 보내고 (상태 코드, JSON 본문)을 반환합니다.
macro_rules! call {
    ($app:expr, $req:expr) => {{
        let resp = actix_web::test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let bytes = actix_web::test::read_body(resp).await;
        let json: serde_json::Value = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, json)
    }};
}
