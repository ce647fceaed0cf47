//! 로그인 잠금 정책
//!
//! ```text
//! Unlocked(n < max) --실패--> Unlocked(n+1)
//! Unlocked(max-1)   --실패--> Locked(until = now + lockout)
//! Locked            --시도--> 423 (카운터 변화 없음)
//! Locked(until <= now) --시도--> 지연 해제 후 일반 검증
//! 성공 --> Unlocked(0)
//! ```

use chrono::{DateTime, Duration, Utc};

use crate::config::AuthConfig;
use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::users::user::User;

/// 로그인 시도 전 잠금 상태 판정 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// 잠금 없음
    Clear,
    /// 잠금 시각이 지났지만 아직 저장소에서 해제되지 않음
    Expired,
}

#[derive(Debug, Clone, Copy)]
pub struct LockoutGuard {
    max_attempts: i32,
    lockout: Duration,
}

impl LockoutGuard {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            max_attempts: config.max_login_attempts,
            lockout: Duration::minutes(config.lockout_minutes),
        }
    }

    pub fn max_attempts(&self) -> i32 {
        self.max_attempts
    }

    /// 이번 실패로 잠길 경우의 해제 시각
    pub fn lock_deadline(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + self.lockout
    }

    /// # Errors
    ///
    /// * `AppError::AccountLocked` - 잠금이 유효한 경우 (남은 시간은 분 단위 올림)
    pub fn check(&self, user: &User, now: DateTime<Utc>) -> AppResult<LockState> {
        if let Some(lock_until) = user.active_lock(now) {
            return Err(AppError::AccountLocked {
                remaining_minutes: remaining_minutes(lock_until, now),
                lock_until,
            });
        }

        if user.has_expired_lock(now) {
            Ok(LockState::Expired)
        } else {
            Ok(LockState::Clear)
        }
    }

    /// 실패 기록 직후 이 시도로 잠금이 걸렸는지 여부
    pub fn just_locked(&self, user: &User) -> bool {
        user.login_attempts == self.max_attempts
    }
}

fn remaining_minutes(lock_until: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (lock_until - now).num_milliseconds().max(0);
    ((millis + 59_999) / 60_000).max(1)
}
