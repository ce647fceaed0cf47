//! bcrypt 비밀번호 해싱

use crate::core::errors::{AppResult, ErrorContext};

/// 비밀번호 해시/검증기
///
/// cost는 환경별 `PasswordConfig`에서 주입됩니다 (테스트 4, 운영 12 권장).
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, password: &str) -> AppResult<String> {
        bcrypt::hash(password, self.cost).context("비밀번호 해싱 실패")
    }

    /// 해시 형식이 손상된 경우에도 에러 대신 `false`를 반환합니다.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or_else(|e| {
            log::error!("❌ 비밀번호 해시 검증 실패: {}", e);
            false
        })
    }
}
