//! # 사용자 저장소
//!
//! `UserStore`는 사용자 문서에 대한 모든 읽기/쓰기를 정의하는 trait입니다.
//! 로그인 실패 카운트, 잠금 해제, 일회성 토큰 사용처럼 경쟁 조건이 생길 수 있는
//! 변경은 모두 단일 문서에 대한 원자적 조건부 업데이트 하나로 표현됩니다.
//!
//! ## 구현체
//!
//! | 구현체 | 용도 |
//! |--------|------|
//! | [`MongoUserRepository`] | 운영 (MongoDB `users` 컬렉션) |
//! | [`InMemoryUserStore`] | 개발/테스트 (`STORE_BACKEND=memory`) |
//!
//! ## 삭제된 계정
//!
//! `find_*`, `count`, `push_recipients`를 포함한 모든 조회는 `deletedAt`이 설정된
//! 계정을 제외합니다. 변경 연산도 삭제되지 않은 계정만 대상으로 합니다.

pub mod memory_store;
pub mod user_repo;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;

pub use memory_store::InMemoryUserStore;
pub use user_repo::MongoUserRepository;

use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::users::user::{PushSubscription, Role, User};

/// 프로필 변경 내용
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    /// 이메일이 바뀌어 인증 상태를 초기화해야 하는지 여부
    pub reset_email_verification: bool,
}

/// 사용자 문서 저장소
///
/// 변경 연산은 변경 후 문서를 반환하며, 조건에 맞는 문서가 없으면 `None`을 반환합니다.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 저장소 연결 상태 확인
    async fn ping(&self) -> AppResult<()>;

    /// 유니크/조회 인덱스 생성
    async fn ensure_indexes(&self) -> AppResult<()>;

    /// 새 사용자 저장
    ///
    /// # Errors
    ///
    /// * 삭제되지 않은 계정 중 같은 이메일이 있으면 `ConflictError`
    async fn insert(&self, user: User) -> AppResult<User>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<User>>;

    async fn find_by_google_id(&self, google_id: &str) -> AppResult<Option<User>>;

    /// 로그인 실패 횟수를 원자적으로 1 증가시키고, 증가 후 값이
    /// `max_attempts` 이상이면 `lock_until`까지 잠급니다.
    async fn record_failed_login(
        &self,
        id: &ObjectId,
        max_attempts: i32,
        lock_until: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>>;

    /// 로그인 성공: 실패 횟수 0, 잠금 해제, 마지막 로그인 시각 갱신
    async fn record_successful_login(
        &self,
        id: &ObjectId,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>>;

    /// `lockUntil <= now`인 경우에만 실패 횟수와 잠금을 초기화합니다.
    async fn clear_expired_lock(&self, id: &ObjectId, now: DateTime<Utc>)
        -> AppResult<Option<User>>;

    /// 관리자 잠금 해제: 조건 없이 실패 횟수와 잠금을 초기화합니다.
    async fn reset_login_state(&self, id: &ObjectId, now: DateTime<Utc>)
        -> AppResult<Option<User>>;

    /// 활성화 토큰 다이제스트 기록 (이전 토큰은 무효화)
    async fn set_activation_token(
        &self,
        id: &ObjectId,
        digest: &str,
        now: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// 다이제스트가 일치하는 경우에만 계정을 활성화하고 토큰을 제거합니다.
    ///
    /// 같은 토큰의 두 번째 사용은 `None`을 반환합니다.
    async fn activate(
        &self,
        id: &ObjectId,
        digest: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>>;

    /// 재설정 토큰 다이제스트와 만료 시각을 하나의 업데이트로 기록합니다.
    async fn set_reset_token(
        &self,
        id: &ObjectId,
        digest: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// 다이제스트가 일치하고 `resetPasswordExpires > now`인 사용자 조회
    async fn find_by_reset_token(
        &self,
        id: &ObjectId,
        digest: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>>;

    /// 재설정 토큰을 소비하면서 비밀번호를 교체합니다.
    ///
    /// 토큰과 만료 시각은 같은 업데이트에서 함께 제거됩니다.
    async fn consume_reset_token(
        &self,
        id: &ObjectId,
        digest: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>>;

    async fn update_password(
        &self,
        id: &ObjectId,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>>;

    /// # Errors
    ///
    /// * 변경하려는 이메일을 다른 계정이 사용 중이면 `ConflictError`
    async fn update_profile(
        &self,
        id: &ObjectId,
        update: ProfileUpdate,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>>;

    /// Google 계정 연동
    ///
    /// 공급자가 이메일을 검증한 경우(`email_verified`) 계정을 인증/활성 상태로 바꿉니다.
    async fn link_google_account(
        &self,
        id: &ObjectId,
        google_id: &str,
        picture: Option<String>,
        email_verified: bool,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>>;

    async fn unlink_google(&self, id: &ObjectId, now: DateTime<Utc>) -> AppResult<Option<User>>;

    /// 소프트 삭제: `isActive=false`와 `deletedAt`을 함께 설정합니다.
    async fn soft_delete(&self, id: &ObjectId, now: DateTime<Utc>) -> AppResult<Option<User>>;

    /// 삭제되지 않은 사용자 수
    async fn count(&self, role: Option<Role>) -> AppResult<u64>;

    /// endpoint가 이미 등록되어 있으면 추가하지 않습니다.
    async fn add_push_subscription(
        &self,
        id: &ObjectId,
        subscription: PushSubscription,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>>;

    async fn remove_push_subscription(
        &self,
        id: &ObjectId,
        endpoint: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>>;

    /// 푸시 구독이 있는 활성 사용자 (역할 필터 선택)
    async fn push_recipients(&self, role: Option<Role>) -> AppResult<Vec<User>>;
}

/// 경로/토큰의 사용자 ID 문자열을 ObjectId로 변환합니다.
///
/// # Errors
///
/// * 24자리 hex가 아니면 `ValidationError`
pub fn parse_object_id(id: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(id)
        .map_err(|_| AppError::ValidationError("유효하지 않은 ID 형식입니다".to_string()))
}
