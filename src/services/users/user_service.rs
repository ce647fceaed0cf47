//! # 사용자 관리 서비스
//!
//! 인증된 사용자의 프로필 조회/수정, 비밀번호 변경, 소프트 삭제와
//! 관리자 전용 기능(사용자 수 조회, 잠금 해제)을 제공합니다.
//!
//! ## 권한 규칙
//!
//! | 작업 | 허용 대상 |
//! |------|-----------|
//! | 내 정보, 프로필 수정, 비밀번호 변경 | 본인 |
//! | 계정 삭제 | 본인 또는 관리자 |
//! | 사용자 수 조회, 잠금 해제 | 관리자 (admin, superAdmin) |

use std::sync::Arc;

use crate::core::errors::{AppError, AppResult};
use crate::domain::dto::users::request::{
    ChangePasswordRequest, CountUsersQuery, UpdateProfileRequest,
};
use crate::domain::dto::users::response::{
    MessageResponse, UserCountResponse, UserEnvelope, UserResponse,
};
use crate::domain::entities::users::user::User;
use crate::domain::models::auth::AuthenticatedUser;
use crate::repositories::users::{parse_object_id, ProfileUpdate, UserStore};
use crate::services::auth::password::PasswordHasher;
use crate::services::notifications::NotificationDispatcher;
use crate::utils::clock::Clock;
use crate::utils::string_utils::{clean_optional_string, normalize_email};

fn user_not_found() -> AppError {
    AppError::NotFound("사용자를 찾을 수 없습니다".to_string())
}

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    clock: Arc<dyn Clock>,
    hasher: PasswordHasher,
    notifier: NotificationDispatcher,
}

impl UserService {
    pub fn new(
        store: Arc<dyn UserStore>,
        clock: Arc<dyn Clock>,
        hasher: PasswordHasher,
        notifier: NotificationDispatcher,
    ) -> Self {
        Self {
            store,
            clock,
            hasher,
            notifier,
        }
    }

    async fn load(&self, user_id: &str) -> AppResult<User> {
        let id = parse_object_id(user_id)?;
        self.store.find_by_id(&id).await?.ok_or_else(user_not_found)
    }

    fn ensure_admin(auth: &AuthenticatedUser) -> AppResult<()> {
        if auth.is_admin() {
            Ok(())
        } else {
            log::warn!("⚠️ 관리자 권한 필요 (user={})", auth.user_id);
            Err(AppError::AuthorizationError(
                "관리자 권한이 필요합니다".to_string(),
            ))
        }
    }

    /// 로그인한 사용자 정보 (민감 정보 제외)
    pub async fn me(&self, auth: &AuthenticatedUser) -> AppResult<UserResponse> {
        self.load(&auth.user_id).await.map(UserResponse::from)
    }

    /// 이름/이메일 수정
    ///
    /// 이메일이 바뀌면 인증 상태가 초기화됩니다.
    ///
    /// # Errors
    ///
    /// * `ValidationError` - 변경할 항목 없음
    /// * `ConflictError` (409) - 다른 계정이 사용 중인 이메일
    pub async fn update_profile(
        &self,
        auth: &AuthenticatedUser,
        request: UpdateProfileRequest,
    ) -> AppResult<UserEnvelope> {
        if request.is_empty() {
            return Err(AppError::ValidationError(
                "변경할 항목이 없습니다".to_string(),
            ));
        }

        let current = self.load(&auth.user_id).await?;
        let email = request
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|email| *email != current.email);

        let update = ProfileUpdate {
            name: clean_optional_string(request.name),
            reset_email_verification: email.is_some(),
            email,
        };

        let user = self
            .store
            .update_profile(&current.id, update, self.clock.now())
            .await?
            .ok_or_else(user_not_found)?;

        log::info!("프로필 수정 (user={})", user.id_string());
        Ok(UserEnvelope::new("프로필이 수정되었습니다", user))
    }

    /// 현재 비밀번호 확인 후 변경
    ///
    /// # Errors
    ///
    /// * `ValidationError` - 현재 비밀번호 불일치, 비밀번호가 없는 소셜 계정
    pub async fn change_password(
        &self,
        auth: &AuthenticatedUser,
        request: ChangePasswordRequest,
    ) -> AppResult<MessageResponse> {
        let user = self.load(&auth.user_id).await?;

        let current_hash = user.password_hash.as_deref().ok_or_else(|| {
            AppError::ValidationError(
                "소셜 로그인 계정은 비밀번호를 변경할 수 없습니다".to_string(),
            )
        })?;

        if !self.hasher.verify(&request.current_password, current_hash) {
            log::warn!("⚠️ 비밀번호 변경 실패: 현재 비밀번호 불일치 (user={})", auth.user_id);
            return Err(AppError::ValidationError(
                "현재 비밀번호가 올바르지 않습니다".to_string(),
            ));
        }

        if request.current_password == request.new_password {
            return Err(AppError::ValidationError(
                "새 비밀번호는 현재 비밀번호와 달라야 합니다".to_string(),
            ));
        }

        let new_hash = self.hasher.hash(&request.new_password)?;
        let user = self
            .store
            .update_password(&user.id, &new_hash, self.clock.now())
            .await?
            .ok_or_else(user_not_found)?;

        self.notifier.dispatch_password_changed(&user);
        log::info!("🔑 비밀번호 변경 (user={})", user.id_string());

        Ok(MessageResponse::new("비밀번호가 변경되었습니다"))
    }

    /// 소프트 삭제 (`isActive=false`, `deletedAt=now`)
    pub async fn delete_user(
        &self,
        auth: &AuthenticatedUser,
        target_id: &str,
    ) -> AppResult<MessageResponse> {
        if !auth.can_manage(target_id) {
            return Err(AppError::AuthorizationError(
                "본인 또는 관리자만 계정을 삭제할 수 있습니다".to_string(),
            ));
        }

        let id = parse_object_id(target_id)?;
        let deleted = self
            .store
            .soft_delete(&id, self.clock.now())
            .await?
            .ok_or_else(user_not_found)?;

        log::info!(
            "🗑️ 계정 삭제 (user={}, by={})",
            deleted.id_string(),
            auth.user_id
        );
        Ok(MessageResponse::new("계정이 삭제되었습니다"))
    }

    pub async fn count(
        &self,
        auth: &AuthenticatedUser,
        query: CountUsersQuery,
    ) -> AppResult<UserCountResponse> {
        Self::ensure_admin(auth)?;
        let count = self.store.count(query.role).await?;
        Ok(UserCountResponse {
            count,
            role: query.role,
        })
    }

    /// 관리자 잠금 해제: 실패 횟수와 잠금 시각을 초기화합니다.
    pub async fn unlock(&self, auth: &AuthenticatedUser, target_id: &str) -> AppResult<UserEnvelope> {
        Self::ensure_admin(auth)?;

        let id = parse_object_id(target_id)?;
        let user = self
            .store
            .reset_login_state(&id, self.clock.now())
            .await?
            .ok_or_else(user_not_found)?;

        log::info!("🔓 관리자 잠금 해제 (user={}, by={})", user.id_string(), auth.user_id);
        Ok(UserEnvelope::new("계정 잠금이 해제되었습니다", user))
    }
}
