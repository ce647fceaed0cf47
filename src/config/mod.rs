//! # Configuration Module
//!
//! 환경 변수 기반의 설정값을 한 번 읽어 불변 `AppConfig`로 보관합니다.
//! `main`에서 생성되어 `AppContext`를 통해 각 서비스에 전달되며,
//! 요청 처리 중에는 환경 변수를 다시 읽지 않습니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 실행 환경, 서버, 저장소, 비밀번호 해싱, 요청 속도 제한
//! - [`auth_config`] - 토큰 TTL, 로그인 잠금 정책, Google OAuth
//! - [`notification_config`] - 메일/푸시 전송
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use account_service_backend::config::AppConfig;
//!
//! let config = AppConfig::from_env()?;
//! println!("Server will bind to {}", config.server.bind_address());
//! ```

pub mod auth_config;
pub mod data_config;
pub mod notification_config;

use std::str::FromStr;

pub use auth_config::*;
pub use data_config::*;
pub use notification_config::*;

use crate::core::errors::AppResult;

/// 애플리케이션 전체 설정
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub password: PasswordConfig,
    pub google: Option<GoogleOAuthConfig>,
    pub mail: MailConfig,
    pub push: PushConfig,
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    /// 환경 변수에서 전체 설정을 읽습니다.
    ///
    /// # Errors
    ///
    /// * 프로덕션 환경에서 `JWT_SECRET` 누락
    /// * 알 수 없는 `STORE_BACKEND` 값
    pub fn from_env() -> AppResult<Self> {
        let environment = Environment::current();

        Ok(Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env(&environment)?,
            password: PasswordConfig::from_env(&environment),
            google: GoogleOAuthConfig::from_env(),
            mail: MailConfig::from_env(),
            push: PushConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            environment,
        })
    }

    /// 테스트용 고정 설정
    ///
    /// 메모리 저장소, bcrypt cost 4, 기본 잠금 정책(5회/15분)을 사용합니다.
    pub fn for_tests() -> Self {
        Self {
            environment: Environment::Test,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                workers: 1,
                api_url: "http://localhost:8080".to_string(),
                frontend_origin: "http://localhost:3000".to_string(),
            },
            database: DatabaseConfig {
                backend: StoreBackend::Memory,
                mongodb_uri: "mongodb://localhost:27017".to_string(),
                database_name: "account_service_test".to_string(),
            },
            auth: AuthConfig {
                jwt_secret: "test-jwt-secret".to_string(),
                session_ttl_hours: 168,
                activation_ttl_hours: 24,
                reset_ttl_minutes: 15,
                refresh_grace_seconds: 0,
                oauth_state_ttl_minutes: 10,
                max_login_attempts: 5,
                lockout_minutes: 15,
            },
            password: PasswordConfig { bcrypt_cost: 4 },
            google: None,
            mail: MailConfig {
                api_url: None,
                api_key: None,
                from_address: "no-reply@test.local".to_string(),
            },
            push: PushConfig {
                vapid_public_key: Some("test-vapid-public-key".to_string()),
                relay_url: None,
            },
            rate_limit: RateLimitConfig {
                per_second: 1000,
                burst_size: 1000,
                login_attempts: 5,
                login_window_minutes: 15,
            },
        }
    }
}

/// 환경 변수를 파싱하고, 없거나 형식이 잘못되면 기본값을 사용합니다.
pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or_else(|e| {
            log::error!("{} 파싱 실패: {}. 기본값 {} 사용", key, e, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_for_tests_uses_memory_store() {
        let config = AppConfig::for_tests();
        assert_eq!(config.database.backend, StoreBackend::Memory);
        assert_eq!(config.password.bcrypt_cost, 4);
        assert_eq!(config.auth.max_login_attempts, 5);
        assert_eq!(config.auth.lockout_minutes, 15);
        assert_eq!(config.auth.reset_ttl_minutes, 15);
        assert!(config.google.is_none());
    }

    #[test]
    fn test_env_parse_falls_back_on_missing_key() {
        let value: u16 = env_parse("ACCOUNT_SERVICE_SURELY_UNSET_KEY", 4242);
        assert_eq!(value, 4242);
    }
}
