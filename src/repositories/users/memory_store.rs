//! # 인메모리 사용자 저장소
//!
//! `STORE_BACKEND=memory` 실행과 통합 테스트에서 사용하는 `UserStore` 구현입니다.
//! 모든 변경은 쓰기 잠금 안에서 조건 검사와 갱신을 함께 수행하므로
//! MongoDB 구현의 조건부 원자적 업데이트와 같은 결과를 보장합니다.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;

use super::{ProfileUpdate, UserStore};
use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::users::user::{PushSubscription, Role, User};
use crate::utils::clock::{from_bson, to_bson};

#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<ObjectId, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, HashMap<ObjectId, User>>> {
        self.users
            .read()
            .map_err(|_| AppError::InternalError("사용자 저장소 잠금 오염".to_string()))
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, HashMap<ObjectId, User>>> {
        self.users
            .write()
            .map_err(|_| AppError::InternalError("사용자 저장소 잠금 오염".to_string()))
    }

    /// 삭제되지 않은 문서가 `condition`을 만족하면 `mutate`를 적용하고 결과를 반환합니다.
    fn update_live<C, M>(
        &self,
        id: &ObjectId,
        now: DateTime<Utc>,
        condition: C,
        mutate: M,
    ) -> AppResult<Option<User>>
    where
        C: FnOnce(&User) -> bool,
        M: FnOnce(&mut User),
    {
        let mut users = self.write()?;
        match users.get_mut(id) {
            Some(user) if !user.is_deleted() && condition(user) => {
                mutate(user);
                user.updated_at = to_bson(now);
                Ok(Some(user.clone()))
            }
            _ => Ok(None),
        }
    }

    fn email_taken(
        users: &HashMap<ObjectId, User>,
        email: &str,
        except: Option<&ObjectId>,
    ) -> bool {
        users
            .values()
            .any(|u| !u.is_deleted() && u.email == email && Some(&u.id) != except)
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn ping(&self) -> AppResult<()> {
        self.read().map(|_| ())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }

    async fn insert(&self, user: User) -> AppResult<User> {
        let mut users = self.write()?;
        if Self::email_taken(&users, &user.email, None) {
            return Err(AppError::ConflictError(
                "이미 사용 중인 이메일입니다".to_string(),
            ));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .read()?
            .values()
            .find(|u| !u.is_deleted() && u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &ObjectId) -> AppResult<Option<User>> {
        Ok(self.read()?.get(id).filter(|u| !u.is_deleted()).cloned())
    }

    async fn find_by_google_id(&self, google_id: &str) -> AppResult<Option<User>> {
        Ok(self
            .read()?
            .values()
            .find(|u| !u.is_deleted() && u.google_id.as_deref() == Some(google_id))
            .cloned())
    }

    async fn record_failed_login(
        &self,
        id: &ObjectId,
        max_attempts: i32,
        lock_until: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        self.update_live(id, now, |_| true, |user| {
            user.login_attempts += 1;
            if user.login_attempts >= max_attempts {
                user.lock_until = Some(to_bson(lock_until));
            }
        })
    }

    async fn record_successful_login(
        &self,
        id: &ObjectId,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        self.update_live(id, now, |_| true, |user| {
            user.login_attempts = 0;
            user.lock_until = None;
            user.last_login_at = Some(to_bson(now));
        })
    }

    async fn clear_expired_lock(
        &self,
        id: &ObjectId,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        self.update_live(
            id,
            now,
            |user| user.lock_until.map(from_bson).is_some_and(|until| until <= now),
            |user| {
                user.login_attempts = 0;
                user.lock_until = None;
            },
        )
    }

    async fn reset_login_state(
        &self,
        id: &ObjectId,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        self.update_live(id, now, |_| true, |user| {
            user.login_attempts = 0;
            user.lock_until = None;
        })
    }

    async fn set_activation_token(
        &self,
        id: &ObjectId,
        digest: &str,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let updated = self.update_live(id, now, |_| true, |user| {
            user.activation_token = Some(digest.to_string());
        })?;
        Ok(updated.is_some())
    }

    async fn activate(
        &self,
        id: &ObjectId,
        digest: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        self.update_live(
            id,
            now,
            |user| user.activation_token.as_deref() == Some(digest),
            |user| {
                user.is_active = true;
                user.is_email_verified = true;
                user.activation_token = None;
            },
        )
    }

    async fn set_reset_token(
        &self,
        id: &ObjectId,
        digest: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let updated = self.update_live(id, now, |_| true, |user| {
            user.reset_password_token = Some(digest.to_string());
            user.reset_password_expires = Some(to_bson(expires_at));
        })?;
        Ok(updated.is_some())
    }

    async fn find_by_reset_token(
        &self,
        id: &ObjectId,
        digest: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        Ok(self
            .read()?
            .get(id)
            .filter(|u| !u.is_deleted() && reset_token_matches(u, digest, now))
            .cloned())
    }

    async fn consume_reset_token(
        &self,
        id: &ObjectId,
        digest: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        self.update_live(
            id,
            now,
            |user| reset_token_matches(user, digest, now),
            |user| {
                user.password_hash = Some(password_hash.to_string());
                user.reset_password_token = None;
                user.reset_password_expires = None;
            },
        )
    }

    async fn update_password(
        &self,
        id: &ObjectId,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        self.update_live(id, now, |_| true, |user| {
            user.password_hash = Some(password_hash.to_string());
        })
    }

    async fn update_profile(
        &self,
        id: &ObjectId,
        update: ProfileUpdate,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        let mut users = self.write()?;

        if let Some(email) = update.email.as_deref() {
            if Self::email_taken(&users, email, Some(id)) {
                return Err(AppError::ConflictError(
                    "이미 사용 중인 이메일입니다".to_string(),
                ));
            }
        }

        match users.get_mut(id) {
            Some(user) if !user.is_deleted() => {
                if let Some(name) = update.name {
                    user.name = Some(name);
                }
                if let Some(email) = update.email {
                    user.email = email;
                }
                if update.reset_email_verification {
                    user.is_email_verified = false;
                }
                user.updated_at = to_bson(now);
                Ok(Some(user.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn link_google_account(
        &self,
        id: &ObjectId,
        google_id: &str,
        picture: Option<String>,
        email_verified: bool,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        self.update_live(id, now, |_| true, |user| {
            user.google_id = Some(google_id.to_string());
            if picture.is_some() {
                user.picture = picture;
            }
            if email_verified {
                user.is_email_verified = true;
                user.is_active = true;
            }
            user.last_login_at = Some(to_bson(now));
        })
    }

    async fn unlink_google(&self, id: &ObjectId, now: DateTime<Utc>) -> AppResult<Option<User>> {
        self.update_live(id, now, |_| true, |user| {
            user.google_id = None;
        })
    }

    async fn soft_delete(&self, id: &ObjectId, now: DateTime<Utc>) -> AppResult<Option<User>> {
        self.update_live(id, now, |_| true, |user| {
            user.is_active = false;
            user.deleted_at = Some(to_bson(now));
        })
    }

    async fn count(&self, role: Option<Role>) -> AppResult<u64> {
        let count = self
            .read()?
            .values()
            .filter(|u| !u.is_deleted() && role.is_none_or(|r| u.role == r))
            .count();
        Ok(count as u64)
    }

    async fn add_push_subscription(
        &self,
        id: &ObjectId,
        subscription: PushSubscription,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        let mut users = self.write()?;
        match users.get_mut(id) {
            Some(user) if !user.is_deleted() => {
                let exists = user
                    .push_subscriptions
                    .iter()
                    .any(|s| s.endpoint == subscription.endpoint);
                if !exists {
                    user.push_subscriptions.push(subscription);
                    user.updated_at = to_bson(now);
                }
                Ok(Some(user.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn remove_push_subscription(
        &self,
        id: &ObjectId,
        endpoint: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<User>> {
        self.update_live(id, now, |_| true, |user| {
            user.push_subscriptions.retain(|s| s.endpoint != endpoint);
        })
    }

    async fn push_recipients(&self, role: Option<Role>) -> AppResult<Vec<User>> {
        Ok(self
            .read()?
            .values()
            .filter(|u| {
                !u.is_deleted()
                    && u.is_active
                    && !u.push_subscriptions.is_empty()
                    && role.is_none_or(|r| u.role == r)
            })
            .cloned()
            .collect())
    }
}

fn reset_token_matches(user: &User, digest: &str, now: DateTime<Utc>) -> bool {
    user.reset_password_token.as_deref() == Some(digest)
        && user
            .reset_password_expires
            .map(from_bson)
            .is_some_and(|expires| expires > now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::users::user::PushKeys;
    use chrono::Duration;

    fn user(email: &str) -> User {
        User::new_local(
            email.to_string(),
            None,
            "hash".to_string(),
            Role::Student,
            Utc::now(),
        )
    }

    #[actix_web::test]
    async fn test_insert_rejects_duplicate_live_email() {
        let store = InMemoryUserStore::new();
        store.insert(user("kim@example.com")).await.unwrap();
        let err = store.insert(user("kim@example.com")).await.unwrap_err();
        assert!(matches!(err, AppError::ConflictError(_)));
    }

    #[actix_web::test]
    async fn test_soft_deleted_user_is_hidden_and_email_reusable() {
        let store = InMemoryUserStore::new();
        let first = store.insert(user("kim@example.com")).await.unwrap();
        let now = Utc::now();

        let deleted = store.soft_delete(&first.id, now).await.unwrap().unwrap();
        assert!(!deleted.is_active);
        assert!(deleted.deleted_at.is_some());

        assert!(store.find_by_id(&first.id).await.unwrap().is_none());
        assert!(store.find_by_email("kim@example.com").await.unwrap().is_none());
        assert_eq!(store.count(None).await.unwrap(), 0);

        store.insert(user("kim@example.com")).await.unwrap();
        assert_eq!(store.count(None).await.unwrap(), 1);
    }

    #[actix_web::test]
    async fn test_failed_logins_lock_at_threshold() {
        let store = InMemoryUserStore::new();
        let u = store.insert(user("kim@example.com")).await.unwrap();
        let now = Utc::now();
        let lock_until = now + Duration::minutes(15);

        for attempt in 1..=4 {
            let updated = store
                .record_failed_login(&u.id, 5, lock_until, now)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(updated.login_attempts, attempt);
            assert!(updated.lock_until.is_none());
        }

        let locked = store
            .record_failed_login(&u.id, 5, lock_until, now)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(locked.login_attempts, 5);
        assert!(locked.active_lock(now).is_some());
    }

    #[actix_web::test]
    async fn test_clear_expired_lock_only_after_expiry() {
        let store = InMemoryUserStore::new();
        let u = store.insert(user("kim@example.com")).await.unwrap();
        let now = Utc::now();
        for _ in 0..5 {
            store
                .record_failed_login(&u.id, 5, now + Duration::minutes(15), now)
                .await
                .unwrap();
        }

        assert!(store.clear_expired_lock(&u.id, now).await.unwrap().is_none());

        let later = now + Duration::minutes(16);
        let cleared = store.clear_expired_lock(&u.id, later).await.unwrap().unwrap();
        assert_eq!(cleared.login_attempts, 0);
        assert!(cleared.lock_until.is_none());
    }

    #[actix_web::test]
    async fn test_activation_is_single_use() {
        let store = InMemoryUserStore::new();
        let u = store.insert(user("kim@example.com")).await.unwrap();
        let now = Utc::now();
        store.set_activation_token(&u.id, "digest", now).await.unwrap();

        let activated = store.activate(&u.id, "digest", now).await.unwrap().unwrap();
        assert!(activated.is_active);
        assert!(activated.is_email_verified);
        assert!(activated.activation_token.is_none());

        assert!(store.activate(&u.id, "digest", now).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_reset_token_respects_expiry() {
        let store = InMemoryUserStore::new();
        let u = store.insert(user("kim@example.com")).await.unwrap();
        let now = Utc::now();
        store
            .set_reset_token(&u.id, "digest", now + Duration::minutes(15), now)
            .await
            .unwrap();

        let late = now + Duration::minutes(16);
        assert!(store.find_by_reset_token(&u.id, "digest", late).await.unwrap().is_none());
        assert!(store
            .consume_reset_token(&u.id, "digest", "new-hash", late)
            .await
            .unwrap()
            .is_none());

        let consumed = store
            .consume_reset_token(&u.id, "digest", "new-hash", now)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(consumed.password_hash.as_deref(), Some("new-hash"));
        assert!(consumed.reset_password_token.is_none());
        assert!(consumed.reset_password_expires.is_none());
    }

    #[actix_web::test]
    async fn test_push_subscription_dedup_by_endpoint() {
        let store = InMemoryUserStore::new();
        let u = store.insert(user("kim@example.com")).await.unwrap();
        let now = Utc::now();
        let sub = PushSubscription {
            endpoint: "https://push.example.com/1".to_string(),
            keys: PushKeys {
                p256dh: "k".to_string(),
                auth: "a".to_string(),
            },
        };

        store.add_push_subscription(&u.id, sub.clone(), now).await.unwrap();
        let after = store
            .add_push_subscription(&u.id, sub, now)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.push_subscriptions.len(), 1);

        // 비활성 사용자는 수신 대상이 아님
        assert!(store.push_recipients(None).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_update_profile_conflict() {
        let store = InMemoryUserStore::new();
        let a = store.insert(user("a@example.com")).await.unwrap();
        store.insert(user("b@example.com")).await.unwrap();

        let err = store
            .update_profile(
                &a.id,
                ProfileUpdate {
                    name: None,
                    email: Some("b@example.com".to_string()),
                    reset_email_verification: true,
                },
                Utc::now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ConflictError(_)));
    }
}
