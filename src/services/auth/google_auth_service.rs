//! Google OAuth 2.0 인증 서비스
//!
//! 두 가지 로그인 경로를 지원합니다.
//!
//! 1. **Authorization Code 흐름**: `/auth/google` → Google 동의 화면 →
//!    `/auth/google/callback` → 코드 교환 → userinfo 조회 → 세션 발급
//! 2. **ID 토큰 검증**: 클라이언트(Google Identity Services)가 받은 ID 토큰을
//!    tokeninfo 엔드포인트로 검증하고 `aud`가 클라이언트 ID와 일치하는지 확인
//!
//! ## 계정 매칭 순서
//!
//! ```text
//! googleId 일치 → 기존 계정
//! 이메일 일치   → 검증된 Google 이메일만 연동 (인증/활성 처리), 미인증이면 401
//! 없음          → 활성/인증 완료된 student 계정 생성 + 환영 메일
//! ```
//!
//! `state` 파라미터는 서명된 단기 토큰이므로 서버에 저장하지 않고 검증합니다.
//! OAuth 로그인은 비밀번호 검증을 거치지 않으므로 로그인 잠금 대상이 아닙니다.

use std::sync::Arc;

use crate::config::GoogleOAuthConfig;
use crate::core::errors::{AppError, AppResult};
use crate::domain::dto::oauth::response::OAuthLoginUrlResponse;
use crate::domain::dto::users::response::{AuthResponse, MessageResponse};
use crate::domain::entities::users::user::User;
use crate::domain::models::auth::AuthenticatedUser;
use crate::domain::models::oauth::{GoogleIdTokenInfo, GoogleTokenResponse, GoogleUserInfo};
use crate::repositories::users::{parse_object_id, UserStore};
use crate::services::auth::token_service::TokenService;
use crate::services::notifications::NotificationDispatcher;
use crate::utils::clock::Clock;
use crate::utils::string_utils::normalize_email;

#[derive(Clone)]
pub struct GoogleAuthService {
    config: Option<GoogleOAuthConfig>,
    client: reqwest::Client,
    store: Arc<dyn UserStore>,
    clock: Arc<dyn Clock>,
    tokens: TokenService,
    notifier: NotificationDispatcher,
}

impl GoogleAuthService {
    pub fn new(
        config: Option<GoogleOAuthConfig>,
        store: Arc<dyn UserStore>,
        clock: Arc<dyn Clock>,
        tokens: TokenService,
        notifier: NotificationDispatcher,
    ) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            store,
            clock,
            tokens,
            notifier,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    fn config(&self) -> AppResult<&GoogleOAuthConfig> {
        self.config.as_ref().ok_or_else(|| {
            AppError::ServiceUnavailable("Google OAuth가 설정되지 않았습니다".to_string())
        })
    }

    /// Google 동의 화면 URL과 서명된 `state` 생성
    ///
    /// # Errors
    ///
    /// * `ServiceUnavailable` - Google OAuth 미설정 (503)
    pub fn login_url(&self) -> AppResult<OAuthLoginUrlResponse> {
        let config = self.config()?;
        let state = self.tokens.issue_oauth_state(self.clock.now())?;

        let params = [
            ("client_id", config.client_id.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("scope", "openid email profile"),
            ("response_type", "code"),
            ("access_type", "online"),
            ("prompt", "select_account"),
            ("state", state.as_str()),
        ];

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        Ok(OAuthLoginUrlResponse {
            auth_url: format!("{}?{}", config.auth_uri, query_string),
            state,
        })
    }

    /// Authorization code로 로그인
    pub async fn authenticate_with_code(&self, code: &str, state: &str) -> AppResult<AuthResponse> {
        let config = self.config()?;
        self.tokens.verify_oauth_state(state, self.clock.now())?;

        let token_response = self.exchange_code_for_token(config, code).await?;
        let google_user = self.fetch_user_info(config, &token_response.access_token).await?;

        self.sign_in(google_user).await
    }

    /// 클라이언트가 받은 Google ID 토큰으로 로그인
    ///
    /// # Errors
    ///
    /// * `AuthenticationError` - tokeninfo 검증 실패 또는 `aud` 불일치
    pub async fn verify_id_token(&self, id_token: &str) -> AppResult<AuthResponse> {
        let config = self.config()?;

        let response = self
            .client
            .get(&config.tokeninfo_uri)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Google tokeninfo 요청 실패: {}", e)))?;

        if !response.status().is_success() {
            log::warn!("⚠️ Google ID 토큰 검증 실패: {}", response.status());
            return Err(AppError::AuthenticationError(
                "유효하지 않은 Google ID 토큰입니다".to_string(),
            ));
        }

        let info = response.json::<GoogleIdTokenInfo>().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Google tokeninfo 응답 파싱 실패: {}", e))
        })?;

        if info.aud != config.client_id {
            log::warn!("⚠️ Google ID 토큰 audience 불일치");
            return Err(AppError::AuthenticationError(
                "유효하지 않은 Google ID 토큰입니다".to_string(),
            ));
        }

        self.sign_in(info.into_user_info()).await
    }

    /// Google 권한 철회 및 계정 연동 해제
    ///
    /// Google 측 철회 실패는 기록만 하고 연동 해제는 계속 진행합니다.
    pub async fn revoke(
        &self,
        auth: &AuthenticatedUser,
        access_token: Option<String>,
    ) -> AppResult<MessageResponse> {
        let config = self.config()?;

        if let Some(token) = access_token.filter(|t| !t.is_empty()) {
            match self
                .client
                .post(&config.revoke_uri)
                .form(&[("token", token.as_str())])
                .send()
                .await
            {
                Ok(response) if response.status().is_success() => {
                    log::info!("Google 토큰 철회 완료 (user={})", auth.user_id);
                }
                Ok(response) => {
                    log::warn!("⚠️ Google 토큰 철회 응답 오류: {}", response.status());
                }
                Err(e) => log::warn!("⚠️ Google 토큰 철회 요청 실패: {}", e),
            }
        }

        let id = parse_object_id(&auth.user_id)?;
        self.store
            .unlink_google(&id, self.clock.now())
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))?;

        Ok(MessageResponse::new("Google 계정 연동이 해제되었습니다"))
    }

    async fn exchange_code_for_token(
        &self,
        config: &GoogleOAuthConfig,
        code: &str,
    ) -> AppResult<GoogleTokenResponse> {
        let params = [
            ("code", code),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .client
            .post(&config.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Google 토큰 요청 실패: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "Google 토큰 교환 실패: {}",
                error_text
            )));
        }

        response
            .json::<GoogleTokenResponse>()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Google 토큰 응답 파싱 실패: {}", e)))
    }

    async fn fetch_user_info(
        &self,
        config: &GoogleOAuthConfig,
        access_token: &str,
    ) -> AppResult<GoogleUserInfo> {
        let response = self
            .client
            .get(&config.userinfo_uri)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Google 사용자 정보 요청 실패: {}", e))
            })?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "Google 사용자 정보 조회 실패: {}",
                error_text
            )));
        }

        response.json::<GoogleUserInfo>().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Google 사용자 정보 파싱 실패: {}", e))
        })
    }

    async fn sign_in(&self, google_user: GoogleUserInfo) -> AppResult<AuthResponse> {
        let now = self.clock.now();
        let user = self.resolve_account(google_user).await?;

        if !user.is_active {
            return Err(AppError::AuthorizationError(
                "비활성화된 계정입니다".to_string(),
            ));
        }

        let user = self
            .store
            .record_successful_login(&user.id, now)
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))?;

        let session = self.tokens.issue_session(&user, now)?;
        log::info!("✅ Google 로그인 성공 (user={})", user.id_string());

        Ok(AuthResponse::bearer(session.token, session.expires_in, user))
    }

    async fn resolve_account(&self, google_user: GoogleUserInfo) -> AppResult<User> {
        let now = self.clock.now();
        let email = normalize_email(&google_user.email);

        if let Some(user) = self.store.find_by_google_id(&google_user.id).await? {
            return Ok(user);
        }

        if let Some(existing) = self.store.find_by_email(&email).await? {
            if !google_user.verified_email {
                log::warn!(
                    "⚠️ 미인증 Google 이메일로 기존 계정 연동 시도 거부 (user={})",
                    existing.id_string()
                );
                return Err(AppError::AuthenticationError(
                    "Google 계정의 이메일 인증이 필요합니다".to_string(),
                ));
            }

            log::info!("Google 계정 연동 (user={})", existing.id_string());
            return self
                .store
                .link_google_account(
                    &existing.id,
                    &google_user.id,
                    google_user.picture,
                    true,
                    now,
                )
                .await?
                .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()));
        }

        if !google_user.verified_email {
            return Err(AppError::AuthenticationError(
                "Google 계정의 이메일 인증이 필요합니다".to_string(),
            ));
        }

        let user = User::new_google(
            email,
            google_user.name,
            google_user.id,
            google_user.picture,
            now,
        );
        let user = self.store.insert(user).await?;

        log::info!("새 Google 사용자 등록 (user={})", user.id_string());
        self.notifier.dispatch_welcome(&user);

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::domain::entities::users::user::Role;
    use crate::repositories::users::InMemoryUserStore;
    use crate::services::notifications::{LogEmailSender, LogPushSender};
    use crate::utils::clock::ManualClock;
    use chrono::Utc;

    fn service(store: Arc<InMemoryUserStore>) -> GoogleAuthService {
        let config = AppConfig::for_tests();
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(Utc::now()));
        let notifier = NotificationDispatcher::new(
            &config,
            Arc::new(LogEmailSender),
            Arc::new(LogPushSender),
            store.clone(),
            clock.clone(),
        );
        GoogleAuthService::new(
            None,
            store,
            clock,
            TokenService::new(&config.auth),
            notifier,
        )
    }

    fn google_user(id: &str, email: &str, verified: bool) -> GoogleUserInfo {
        GoogleUserInfo {
            id: id.to_string(),
            email: email.to_string(),
            name: Some("Kim".to_string()),
            picture: None,
            verified_email: verified,
        }
    }

    async fn local_teacher(store: &InMemoryUserStore) -> User {
        let mut user = User::new_local(
            "kim@example.com".to_string(),
            None,
            "hash".to_string(),
            Role::Teacher,
            Utc::now(),
        );
        user.is_active = true;
        user.is_email_verified = true;
        store.insert(user).await.unwrap()
    }

    #[actix_web::test]
    async fn test_unverified_google_email_does_not_link_existing_account() {
        let store = Arc::new(InMemoryUserStore::new());
        let existing = local_teacher(&store).await;
        let svc = service(store.clone());

        let err = svc
            .sign_in(google_user("google-1", "kim@example.com", false))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::AuthenticationError(_)));
        let stored = store.find_by_id(&existing.id).await.unwrap().unwrap();
        assert!(stored.google_id.is_none());
        assert!(store.find_by_google_id("google-1").await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_verified_google_email_links_existing_account() {
        let store = Arc::new(InMemoryUserStore::new());
        let existing = local_teacher(&store).await;
        let svc = service(store.clone());

        let response = svc
            .sign_in(google_user("google-1", "Kim@Example.com", true))
            .await
            .unwrap();

        assert_eq!(response.user.id, existing.id_string());
        assert_eq!(response.user.role, Role::Teacher);
        let stored = store.find_by_id(&existing.id).await.unwrap().unwrap();
        assert_eq!(stored.google_id.as_deref(), Some("google-1"));
    }

    #[actix_web::test]
    async fn test_known_google_id_signs_in_existing_account() {
        let store = Arc::new(InMemoryUserStore::new());
        let svc = service(store.clone());

        let first = svc
            .sign_in(google_user("google-1", "lee@example.com", true))
            .await
            .unwrap();
        let again = svc
            .sign_in(google_user("google-1", "lee@example.com", true))
            .await
            .unwrap();

        assert_eq!(first.user.id, again.user.id);
        assert_eq!(first.user.role, Role::Student);
        assert_eq!(store.count(None).await.unwrap(), 1);
    }

    #[actix_web::test]
    async fn test_unverified_google_email_does_not_create_account() {
        let store = Arc::new(InMemoryUserStore::new());
        let svc = service(store.clone());

        let err = svc
            .sign_in(google_user("google-2", "park@example.com", false))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::AuthenticationError(_)));
        assert_eq!(store.count(None).await.unwrap(), 0);
    }
}
