//! User Entity Implementation
//!
//! 사용자 엔티티의 핵심 구현체입니다.
//! 로컬 인증(이메일/비밀번호)과 Google OAuth 계정을 하나의 문서로 표현하며,
//! 로그인 잠금 카운터와 일회성 토큰 다이제스트, 웹 푸시 구독을 함께 보관합니다.
//!
//! # 저장 형식
//!
//! MongoDB `users` 컬렉션에 camelCase 필드로 저장됩니다.
//! `deletedAt`은 삭제되지 않은 계정에서도 `null`로 명시 저장되어
//! 부분 유니크 인덱스(`deletedAt: null`)의 대상이 됩니다.

use chrono::{DateTime as ChronoDateTime, Utc};
use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::config::AuthProvider;
use crate::utils::clock::{from_bson, to_bson};

/// 사용자 역할
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    SuperAdmin,
    Admin,
    Teacher,
    #[default]
    Student,
    Tutor,
}

impl Role {
    /// 저장/직렬화 시 사용되는 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "superAdmin",
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
            Role::Tutor => "tutor",
        }
    }

    /// 관리 기능(사용자 수 조회, 잠금 해제, 푸시 브로드캐스트) 접근 가능 여부
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    /// 자가 회원가입으로 선택할 수 있는 역할인지 여부
    pub fn is_self_assignable(&self) -> bool {
        !self.is_admin()
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "superAdmin" => Some(Role::SuperAdmin),
            "admin" => Some(Role::Admin),
            "teacher" => Some(Role::Teacher),
            "student" => Some(Role::Student),
            "tutor" => Some(Role::Tutor),
            _ => None,
        }
    }
}

/// 웹 푸시 구독 키
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushKeys {
    pub p256dh: String,
    pub auth: String,
}

/// 웹 푸시 구독 정보 (브라우저 PushSubscription JSON과 동일한 형태)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushSubscription {
    pub endpoint: String,
    pub keys: PushKeys,
}

/// 사용자 엔티티
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// 정규화된 이메일 (삭제되지 않은 계정 사이에서 unique)
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    /// bcrypt 해시 (Google 전용 계정은 None)
    #[serde(default)]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub role: Role,
    pub is_active: bool,
    pub is_email_verified: bool,
    /// 발급된 활성화 토큰의 SHA-256 다이제스트
    #[serde(default)]
    pub activation_token: Option<String>,
    /// 발급된 재설정 토큰의 SHA-256 다이제스트
    #[serde(default)]
    pub reset_password_token: Option<String>,
    #[serde(default)]
    pub reset_password_expires: Option<DateTime>,
    /// 연속 로그인 실패 횟수
    #[serde(default)]
    pub login_attempts: i32,
    #[serde(default)]
    pub lock_until: Option<DateTime>,
    #[serde(default)]
    pub last_login_at: Option<DateTime>,
    #[serde(default)]
    pub deleted_at: Option<DateTime>,
    #[serde(default)]
    pub google_id: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub push_subscriptions: Vec<PushSubscription>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl User {
    /// 새 로컬 사용자 생성 (이메일/비밀번호)
    ///
    /// 이메일 인증 전까지 비활성 상태로 시작합니다.
    pub fn new_local(
        email: String,
        name: Option<String>,
        password_hash: String,
        role: Role,
        now: ChronoDateTime<Utc>,
    ) -> Self {
        let now = to_bson(now);

        Self {
            id: ObjectId::new(),
            email,
            name,
            password_hash: Some(password_hash),
            role,
            is_active: false,
            is_email_verified: false,
            activation_token: None,
            reset_password_token: None,
            reset_password_expires: None,
            login_attempts: 0,
            lock_until: None,
            last_login_at: None,
            deleted_at: None,
            google_id: None,
            picture: None,
            push_subscriptions: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 새 Google 사용자 생성
    ///
    /// 공급자가 이메일을 검증했으므로 활성/인증 완료 상태로 시작합니다.
    pub fn new_google(
        email: String,
        name: Option<String>,
        google_id: String,
        picture: Option<String>,
        now: ChronoDateTime<Utc>,
    ) -> Self {
        let now_bson = to_bson(now);

        Self {
            id: ObjectId::new(),
            email,
            name,
            password_hash: None,
            role: Role::Student,
            is_active: true,
            is_email_verified: true,
            activation_token: None,
            reset_password_token: None,
            reset_password_expires: None,
            login_attempts: 0,
            lock_until: None,
            last_login_at: Some(now_bson),
            deleted_at: None,
            google_id: Some(google_id),
            picture,
            push_subscriptions: Vec::new(),
            created_at: now_bson,
            updated_at: now_bson,
        }
    }

    pub fn id_string(&self) -> String {
        self.id.to_hex()
    }

    pub fn auth_provider(&self) -> AuthProvider {
        if self.google_id.is_some() && self.password_hash.is_none() {
            AuthProvider::Google
        } else {
            AuthProvider::Local
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// `now` 시점에 잠금이 유효한 경우 잠금 해제 시각을 반환합니다.
    pub fn active_lock(&self, now: ChronoDateTime<Utc>) -> Option<ChronoDateTime<Utc>> {
        self.lock_until.map(from_bson).filter(|until| *until > now)
    }

    /// 이미 지난 잠금 시각이 남아 있는지 여부 (지연 해제 대상)
    pub fn has_expired_lock(&self, now: ChronoDateTime<Utc>) -> bool {
        self.lock_until
            .map(from_bson)
            .is_some_and(|until| until <= now)
    }
}
