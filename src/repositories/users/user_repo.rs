//! # 사용자 리포지토리 구현 (MongoDB)
//!
//! `users` 컬렉션에 대한 `UserStore` 구현입니다.
//!
//! ## 특징
//!
//! - **원자적 카운터**: 로그인 실패 횟수 증가와 잠금 설정을 하나의 파이프라인 업데이트로 처리
//! - **조건부 소비**: 활성화/재설정 토큰은 필터에 다이제스트를 포함하여 한 번만 사용 가능
//! - **부분 유니크 인덱스**: 삭제되지 않은 계정 사이에서만 이메일 유일성 보장

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use super::{ProfileUpdate, UserStore};
use crate::core::errors::{AppError, AppResult};
use crate::db::Database;
use crate::domain::entities::users::user::{PushSubscription, Role, User};
use crate::utils::clock::to_bson;

const COLLECTION_NAME: &str = "users";
const DUPLICATE_KEY_CODE: i32 = 11000;

pub struct MongoUserRepository {
    db: mongodb::Database,
    users: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(database: &Database) -> Self {
        let db = database.get_database();
        Self {
            users: db.collection::<User>(COLLECTION_NAME),
            db,
        }
    }

    /// 삭제되지 않은 문서만 대상으로 하는 `_id` 필터
    fn live_id_filter(id: &ObjectId) -> Document {
        doc! { "_id": id, "deletedAt": null }
    }

    async fn update_and_fetch(
        &self,
        filter: Document,
        update: impl Into<mongodb::options::UpdateModifications>,
    ) -> AppResult<Option<User>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.users
            .find_one_and_update(filter, update)
            .with_options(options)
            .await
            .map_err(map_write_error)
    }
}

/// 중복 키 에러는 `ConflictError`, 그 외는 `DatabaseError`로 변환합니다.
fn map_write_error(e: MongoError) -> AppError {
    if is_duplicate_key(&e) {
        AppError::ConflictError("이미 사용 중인 이메일입니다".to_string())
    } else {
        AppError::DatabaseError(e.to_string())
    }
}

fn is_duplicate_key(e: &MongoError) -> bool {
    match e.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(we)) => we.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(ce) => ce.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

#[async_trait]
impl UserStore for MongoUserRepository {
    async fn ping(&self) -> AppResult<()> {
        self.db
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        // 삭제되지 않은 계정 사이에서만 이메일 유일
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .partial_filter_expression(doc! { "deletedAt": { "$type": "null" } })
                    .name("email_unique_live".to_string())
                    .build(),
            )
            .build();

        let google_index = IndexModel::builder()
            .keys(doc! { "googleId": 1 })
            .options(
                IndexOptions::builder()
                    .sparse(true)
                    .name("google_id".to_string())
                    .build(),
            )
            .build();

        let role_index = IndexModel::builder()
            .keys(doc! { "role": 1, "isActive": 1 })
            .options(IndexOptions::builder().name("role_active".to_string()).build())
            .build();

        let created_at_index = IndexModel::builder()
            .keys(doc! { "createdAt": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_desc".to_string())
                    .build(),
            )
            .build();

        self.users
            .create_indexes([email_index, google_index, role_index, created_at_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        log::info!("📇 users 컬렉션 인덱스 확인 완료");
        Ok(())
    }

    async fn insert(&self, user: User) -> AppResult<User> {
        self.users.insert_one(&user).await.map_err(map_write_error)?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.users
            .find_one(doc! { "email": email, "deletedAt": null })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<User>> {
        self.users
            .find_one(Self::live_id_filter(id))
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn find_by_google_id(&self, google_id: &str) -> AppResult<Option<User>> {
        self.users
            .find_one(doc! { "googleId": google_id, "deletedAt": null })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn record_failed_login(
        &self,
        id: &ObjectId,
        max_attempts: i32,
        lock_until: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        let pipeline = vec![
            doc! {
                "$set": {
                    "loginAttempts": { "$add": [ { "$ifNull": ["$loginAttempts", 0] }, 1 ] },
                    "updatedAt": to_bson(now),
                }
            },
            doc! {
                "$set": {
                    "lockUntil": {
                        "$cond": [
                            { "$gte": ["$loginAttempts", max_attempts] },
                            to_bson(lock_until),
                            { "$ifNull": ["$lockUntil", Bson::Null] },
                        ]
                    }
                }
            },
        ];

        self.update_and_fetch(Self::live_id_filter(id), pipeline).await
    }

    async fn record_successful_login(
        &self,
        id: &ObjectId,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        let now = to_bson(now);
        self.update_and_fetch(
            Self::live_id_filter(id),
            doc! {
                "$set": {
                    "loginAttempts": 0,
                    "lockUntil": Bson::Null,
                    "lastLoginAt": now,
                    "updatedAt": now,
                }
            },
        )
        .await
    }

    async fn clear_expired_lock(
        &self,
        id: &ObjectId,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        let now = to_bson(now);
        self.update_and_fetch(
            doc! { "_id": id, "deletedAt": null, "lockUntil": { "$lte": now } },
            doc! {
                "$set": { "loginAttempts": 0, "lockUntil": Bson::Null, "updatedAt": now }
            },
        )
        .await
    }

    async fn reset_login_state(
        &self,
        id: &ObjectId,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        self.update_and_fetch(
            Self::live_id_filter(id),
            doc! {
                "$set": { "loginAttempts": 0, "lockUntil": Bson::Null, "updatedAt": to_bson(now) }
            },
        )
        .await
    }

    async fn set_activation_token(
        &self,
        id: &ObjectId,
        digest: &str,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = self
            .users
            .update_one(
                Self::live_id_filter(id),
                doc! { "$set": { "activationToken": digest, "updatedAt": to_bson(now) } },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.matched_count > 0)
    }

    async fn activate(
        &self,
        id: &ObjectId,
        digest: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        self.update_and_fetch(
            doc! { "_id": id, "deletedAt": null, "activationToken": digest },
            doc! {
                "$set": {
                    "isActive": true,
                    "isEmailVerified": true,
                    "activationToken": Bson::Null,
                    "updatedAt": to_bson(now),
                }
            },
        )
        .await
    }

    async fn set_reset_token(
        &self,
        id: &ObjectId,
        digest: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = self
            .users
            .update_one(
                Self::live_id_filter(id),
                doc! {
                    "$set": {
                        "resetPasswordToken": digest,
                        "resetPasswordExpires": to_bson(expires_at),
                        "updatedAt": to_bson(now),
                    }
                },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.matched_count > 0)
    }

    async fn find_by_reset_token(
        &self,
        id: &ObjectId,
        digest: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        self.users
            .find_one(doc! {
                "_id": id,
                "deletedAt": null,
                "resetPasswordToken": digest,
                "resetPasswordExpires": { "$gt": to_bson(now) },
            })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn consume_reset_token(
        &self,
        id: &ObjectId,
        digest: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        let now = to_bson(now);
        self.update_and_fetch(
            doc! {
                "_id": id,
                "deletedAt": null,
                "resetPasswordToken": digest,
                "resetPasswordExpires": { "$gt": now },
            },
            doc! {
                "$set": {
                    "passwordHash": password_hash,
                    "resetPasswordToken": Bson::Null,
                    "resetPasswordExpires": Bson::Null,
                    "updatedAt": now,
                }
            },
        )
        .await
    }

    async fn update_password(
        &self,
        id: &ObjectId,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        self.update_and_fetch(
            Self::live_id_filter(id),
            doc! { "$set": { "passwordHash": password_hash, "updatedAt": to_bson(now) } },
        )
        .await
    }

    async fn update_profile(
        &self,
        id: &ObjectId,
        update: ProfileUpdate,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        let mut set = doc! { "updatedAt": to_bson(now) };
        if let Some(name) = update.name {
            set.insert("name", name);
        }
        if let Some(email) = update.email {
            set.insert("email", email);
        }
        if update.reset_email_verification {
            set.insert("isEmailVerified", false);
        }

        self.update_and_fetch(Self::live_id_filter(id), doc! { "$set": set })
            .await
    }

    async fn link_google_account(
        &self,
        id: &ObjectId,
        google_id: &str,
        picture: Option<String>,
        email_verified: bool,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        let now = to_bson(now);
        let mut set = doc! { "googleId": google_id, "lastLoginAt": now, "updatedAt": now };
        if let Some(picture) = picture {
            set.insert("picture", picture);
        }
        if email_verified {
            set.insert("isEmailVerified", true);
            set.insert("isActive", true);
        }

        self.update_and_fetch(Self::live_id_filter(id), doc! { "$set": set })
            .await
    }

    async fn unlink_google(&self, id: &ObjectId, now: DateTime<Utc>) -> AppResult<Option<User>> {
        self.update_and_fetch(
            Self::live_id_filter(id),
            doc! {
                "$unset": { "googleId": "" },
                "$set": { "updatedAt": to_bson(now) },
            },
        )
        .await
    }

    async fn soft_delete(&self, id: &ObjectId, now: DateTime<Utc>) -> AppResult<Option<User>> {
        let now = to_bson(now);
        self.update_and_fetch(
            Self::live_id_filter(id),
            doc! { "$set": { "isActive": false, "deletedAt": now, "updatedAt": now } },
        )
        .await
    }

    async fn count(&self, role: Option<Role>) -> AppResult<u64> {
        let mut filter = doc! { "deletedAt": null };
        if let Some(role) = role {
            filter.insert("role", role.as_str());
        }

        self.users
            .count_documents(filter)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn add_push_subscription(
        &self,
        id: &ObjectId,
        subscription: PushSubscription,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        let endpoint = subscription.endpoint.clone();
        let subscription = mongodb::bson::to_bson(&subscription)
            .map_err(|e| AppError::InternalError(format!("구독 직렬화 실패: {}", e)))?;

        let updated = self
            .update_and_fetch(
                doc! {
                    "_id": id,
                    "deletedAt": null,
                    "pushSubscriptions.endpoint": { "$ne": endpoint.as_str() },
                },
                doc! {
                    "$push": { "pushSubscriptions": subscription },
                    "$set": { "updatedAt": to_bson(now) },
                },
            )
            .await?;

        match updated {
            Some(user) => Ok(Some(user)),
            // 이미 등록된 endpoint
            None => self.find_by_id(id).await,
        }
    }

    async fn remove_push_subscription(
        &self,
        id: &ObjectId,
        endpoint: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        self.update_and_fetch(
            Self::live_id_filter(id),
            doc! {
                "$pull": { "pushSubscriptions": { "endpoint": endpoint } },
                "$set": { "updatedAt": to_bson(now) },
            },
        )
        .await
    }

    async fn push_recipients(&self, role: Option<Role>) -> AppResult<Vec<User>> {
        let mut filter = doc! {
            "deletedAt": null,
            "isActive": true,
            "pushSubscriptions.0": { "$exists": true },
        };
        if let Some(role) = role {
            filter.insert("role", role.as_str());
        }

        let cursor = self
            .users
            .find(filter)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        cursor
            .try_collect::<Vec<User>>()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }
}
