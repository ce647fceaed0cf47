//! # 인증 서비스
//!
//! 회원가입, 로그인, 세션 갱신, 이메일 인증, 비밀번호 재설정을 담당합니다.
//!
//! ## 로그인 흐름
//!
//! ```text
//! 요청 → 이메일 정규화 → 사용자 조회 (없음: 401)
//!      → 잠금 검사 (유효: 423, 만료: 지연 해제)
//!      → 비밀번호 검증 (실패: 원자적 실패 카운트 증가 후 401)
//!      → 활성 여부 (비활성: 403)
//!      → 카운터 초기화 + 세션 토큰 발급 (200)
//! ```
//!
//! ## 일회성 토큰
//!
//! 활성화/재설정 토큰은 서명된 JWT이며, 저장소에는 SHA-256 다이제스트만 기록됩니다.
//! 사용 시 서명/용도/만료 검증 후 다이제스트가 일치하는 문서를 원자적으로 갱신하므로
//! 같은 토큰은 한 번만 사용할 수 있습니다.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;

use crate::core::errors::{AppError, AppResult};
use crate::domain::dto::users::request::{
    ForgotPasswordRequest, LoginRequest, RefreshTokenRequest, RegisterRequest,
    ResendActivationRequest, ResetPasswordRequest,
};
use crate::domain::dto::users::response::{
    AuthResponse, MessageResponse, ResetTokenInfoResponse, UserEnvelope,
};
use crate::domain::entities::users::user::User;
use crate::domain::models::token::{TokenClaims, TokenPurpose};
use crate::repositories::users::{parse_object_id, UserStore};
use crate::services::auth::lockout::{LockState, LockoutGuard};
use crate::services::auth::password::PasswordHasher;
use crate::services::auth::token_service::TokenService;
use crate::services::notifications::NotificationDispatcher;
use crate::utils::clock::Clock;
use crate::utils::string_utils::{clean_optional_string, normalize_email, token_digest};

const FORGOT_PASSWORD_MESSAGE: &str =
    "해당 이메일로 가입된 계정이 있다면 비밀번호 재설정 링크가 발송됩니다";
const RESEND_ACTIVATION_MESSAGE: &str =
    "인증이 필요한 계정이 있다면 인증 메일이 다시 발송됩니다";

fn invalid_credentials() -> AppError {
    AppError::AuthenticationError("이메일 또는 비밀번호가 올바르지 않습니다".to_string())
}

/// 일회성 토큰 사용 경로에서는 토큰 오류를 400으로 보고합니다.
fn redemption_error(error: AppError) -> AppError {
    match error {
        AppError::TokenExpired(_) => AppError::ValidationError("토큰이 만료되었습니다".to_string()),
        AppError::TokenInvalid(_) => {
            AppError::ValidationError("유효하지 않은 토큰입니다".to_string())
        }
        other => other,
    }
}

/// 인증 비즈니스 로직
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    clock: Arc<dyn Clock>,
    tokens: TokenService,
    hasher: PasswordHasher,
    lockout: LockoutGuard,
    notifier: NotificationDispatcher,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn UserStore>,
        clock: Arc<dyn Clock>,
        tokens: TokenService,
        hasher: PasswordHasher,
        lockout: LockoutGuard,
        notifier: NotificationDispatcher,
    ) -> Self {
        Self {
            store,
            clock,
            tokens,
            hasher,
            lockout,
            notifier,
        }
    }

    /// 로컬 계정 회원가입
    ///
    /// 계정은 비활성 상태로 생성되며, 인증 메일 전송이 끝난 뒤에 응답합니다.
    ///
    /// # Errors
    ///
    /// * `ValidationError` - 이미 등록된 이메일, 직접 가입할 수 없는 역할
    /// * `ExternalServiceError` - 인증 메일 전송 실패 (계정은 남으며 재발송 가능)
    pub async fn register(&self, request: RegisterRequest) -> AppResult<MessageResponse> {
        let start_time = Instant::now();
        let now = self.clock.now();
        let email = normalize_email(&request.email);

        let role = request.role.unwrap_or_default();
        if !role.is_self_assignable() {
            return Err(AppError::ValidationError(format!(
                "'{}' 역할로는 직접 가입할 수 없습니다",
                role.as_str()
            )));
        }

        if self.store.find_by_email(&email).await?.is_some() {
            return Err(AppError::ValidationError(
                "이미 등록된 이메일입니다".to_string(),
            ));
        }

        let hash_start = Instant::now();
        let password_hash = self.hasher.hash(&request.password)?;
        log::debug!("Password hashing took: {:?}", hash_start.elapsed());

        let user = User::new_local(
            email,
            clean_optional_string(request.name),
            password_hash,
            role,
            now,
        );

        // 동시 가입으로 유니크 인덱스에 걸린 경우도 같은 400으로 보고
        let user = self.store.insert(user).await.map_err(|e| match e {
            AppError::ConflictError(_) => {
                AppError::ValidationError("이미 등록된 이메일입니다".to_string())
            }
            other => other,
        })?;

        let activation = self.tokens.issue_activation(&user, now)?;
        self.store
            .set_activation_token(&user.id, &token_digest(&activation.token), now)
            .await?;

        self.notifier.send_activation(&user, &activation.token).await?;

        log::info!(
            "✅ 회원가입 완료 (user={}, role={}) - {:?}",
            user.id_string(),
            user.role.as_str(),
            start_time.elapsed()
        );

        Ok(MessageResponse::new(
            "회원가입이 완료되었습니다. 이메일을 확인하여 계정을 활성화해주세요",
        ))
    }

    /// 이메일/비밀번호 로그인
    ///
    /// # Errors
    ///
    /// * `AuthenticationError` (401) - 없는 사용자, 잘못된 비밀번호
    /// * `AuthorizationError` (403) - 비활성 계정
    /// * `AccountLocked` (423) - 잠금 유지 중 (실패 카운트는 변하지 않음)
    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let now = self.clock.now();
        let email = normalize_email(&request.email);

        let mut user = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or_else(invalid_credentials)?;

        match self.lockout.check(&user, now) {
            Err(locked) => {
                log::warn!("🔒 잠긴 계정 로그인 시도 (user={})", user.id_string());
                return Err(locked);
            }
            Ok(LockState::Expired) => {
                if let Some(cleared) = self.store.clear_expired_lock(&user.id, now).await? {
                    log::info!("🔓 잠금 만료 해제 (user={})", user.id_string());
                    user = cleared;
                }
            }
            Ok(LockState::Clear) => {}
        }

        let password_ok = user
            .password_hash
            .as_deref()
            .is_some_and(|hash| self.hasher.verify(&request.password, hash));

        if !password_ok {
            self.record_failure(&user, now).await?;
            return Err(invalid_credentials());
        }

        if !user.is_active {
            log::warn!("⚠️ 비활성 계정 로그인 시도 (user={})", user.id_string());
            return Err(AppError::AuthorizationError(
                "계정이 활성화되지 않았습니다. 이메일 인증을 완료해주세요".to_string(),
            ));
        }

        let user = self
            .store
            .record_successful_login(&user.id, now)
            .await?
            .ok_or_else(invalid_credentials)?;

        let session = self.tokens.issue_session(&user, now)?;
        self.notifier.dispatch_login_alert(&user);

        log::info!("✅ 로그인 성공 (user={})", user.id_string());
        Ok(AuthResponse::bearer(session.token, session.expires_in, user))
    }

    async fn record_failure(&self, user: &User, now: DateTime<Utc>) -> AppResult<()> {
        let updated = self
            .store
            .record_failed_login(
                &user.id,
                self.lockout.max_attempts(),
                self.lockout.lock_deadline(now),
                now,
            )
            .await?;

        if let Some(updated) = updated {
            log::warn!(
                "⚠️ 로그인 실패 (user={}, {}/{})",
                updated.id_string(),
                updated.login_attempts,
                self.lockout.max_attempts()
            );
            if self.lockout.just_locked(&updated) {
                self.notifier.dispatch_account_locked(&updated);
            }
        }

        Ok(())
    }

    /// 세션 토큰 갱신
    ///
    /// 비밀번호는 다시 묻지 않지만 계정 존재/삭제/활성 상태는 다시 확인합니다.
    pub async fn refresh(&self, request: RefreshTokenRequest) -> AppResult<AuthResponse> {
        let now = self.clock.now();
        let claims = self.tokens.verify_for_refresh(&request.token, now)?;
        let user_id = Self::subject_id(&claims)?;

        let user = self.store.find_by_id(&user_id).await?.ok_or_else(|| {
            AppError::AuthenticationError("사용자를 찾을 수 없습니다".to_string())
        })?;

        if !user.is_active {
            return Err(AppError::AuthorizationError(
                "비활성화된 계정입니다".to_string(),
            ));
        }

        let session = self.tokens.issue_session(&user, now)?;
        log::debug!("세션 갱신 (user={})", user.id_string());
        Ok(AuthResponse::bearer(session.token, session.expires_in, user))
    }

    /// 비밀번호 재설정 요청
    ///
    /// 계정 존재 여부와 관계없이 항상 같은 메시지를 반환합니다.
    pub async fn forgot_password(
        &self,
        request: ForgotPasswordRequest,
    ) -> AppResult<MessageResponse> {
        let now = self.clock.now();
        let email = normalize_email(&request.email);

        match self.store.find_by_email(&email).await? {
            Some(user) if user.is_active => {
                let issued = self.tokens.issue_password_reset(&user, now)?;
                let expires_at = now + self.tokens.reset_ttl();
                let stored = self
                    .store
                    .set_reset_token(&user.id, &token_digest(&issued.token), expires_at, now)
                    .await?;

                if stored {
                    self.notifier.dispatch_password_reset(&user, &issued.token);
                    log::info!("🔑 비밀번호 재설정 토큰 발급 (user={})", user.id_string());
                }
            }
            Some(user) => {
                log::info!(
                    "비활성 계정의 재설정 요청 무시 (user={})",
                    user.id_string()
                );
            }
            None => log::debug!("등록되지 않은 이메일의 재설정 요청"),
        }

        Ok(MessageResponse::new(FORGOT_PASSWORD_MESSAGE))
    }

    async fn resolve_reset_user(&self, token: &str, now: DateTime<Utc>) -> AppResult<User> {
        let claims = self
            .tokens
            .verify(token, TokenPurpose::PasswordReset, now)
            .map_err(redemption_error)?;
        let user_id = Self::subject_id(&claims).map_err(redemption_error)?;

        self.store
            .find_by_reset_token(&user_id, &token_digest(token), now)
            .await?
            .ok_or_else(|| {
                AppError::ValidationError("유효하지 않거나 만료된 재설정 토큰입니다".to_string())
            })
    }

    /// 재설정 토큰이 아직 사용 가능한지 확인하고 대상 이메일을 반환합니다.
    pub async fn verify_reset_token(&self, token: &str) -> AppResult<ResetTokenInfoResponse> {
        let user = self.resolve_reset_user(token, self.clock.now()).await?;
        Ok(ResetTokenInfoResponse {
            valid: true,
            email: user.email,
        })
    }

    /// 재설정 토큰을 사용해 비밀번호를 교체합니다.
    ///
    /// 서명이 유효해도 저장된 `resetPasswordExpires`가 지났으면 실패합니다.
    pub async fn reset_password(
        &self,
        request: ResetPasswordRequest,
    ) -> AppResult<MessageResponse> {
        let now = self.clock.now();
        let user = self.resolve_reset_user(&request.token, now).await?;

        let password_hash = self.hasher.hash(&request.new_password)?;
        let user = self
            .store
            .consume_reset_token(&user.id, &token_digest(&request.token), &password_hash, now)
            .await?
            .ok_or_else(|| {
                AppError::ValidationError("유효하지 않거나 만료된 재설정 토큰입니다".to_string())
            })?;

        self.notifier.dispatch_password_changed(&user);
        log::info!("🔑 비밀번호 재설정 완료 (user={})", user.id_string());

        Ok(MessageResponse::new("비밀번호가 재설정되었습니다"))
    }

    /// 이메일 인증 토큰으로 계정을 활성화합니다.
    ///
    /// # Errors
    ///
    /// * `ValidationError` - 만료/위조/이미 사용된 토큰
    pub async fn verify_activation(&self, token: &str) -> AppResult<UserEnvelope> {
        let now = self.clock.now();
        let claims = self
            .tokens
            .verify(token, TokenPurpose::Activation, now)
            .map_err(redemption_error)?;
        let user_id = Self::subject_id(&claims).map_err(redemption_error)?;

        let user = self
            .store
            .activate(&user_id, &token_digest(token), now)
            .await?
            .ok_or_else(|| {
                AppError::ValidationError(
                    "유효하지 않거나 이미 사용된 인증 토큰입니다".to_string(),
                )
            })?;

        log::info!("✅ 계정 활성화 (user={})", user.id_string());
        Ok(UserEnvelope::new("계정이 활성화되었습니다", user))
    }

    /// 인증 메일 재발송. 새 토큰을 발급하면 이전 토큰은 무효가 됩니다.
    pub async fn resend_activation(
        &self,
        request: ResendActivationRequest,
    ) -> AppResult<MessageResponse> {
        let now = self.clock.now();
        let email = normalize_email(&request.email);

        if let Some(user) = self.store.find_by_email(&email).await? {
            if !user.is_active && user.password_hash.is_some() {
                let activation = self.tokens.issue_activation(&user, now)?;
                if self
                    .store
                    .set_activation_token(&user.id, &token_digest(&activation.token), now)
                    .await?
                {
                    self.notifier.dispatch_activation(&user, &activation.token);
                    log::info!("📧 인증 메일 재발송 (user={})", user.id_string());
                }
            }
        }

        Ok(MessageResponse::new(RESEND_ACTIVATION_MESSAGE))
    }

    fn subject_id(claims: &TokenClaims) -> AppResult<ObjectId> {
        parse_object_id(&claims.sub)
            .map_err(|_| AppError::TokenInvalid("유효하지 않은 토큰입니다".to_string()))
    }
}
