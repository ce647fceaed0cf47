//! 데이터 및 서버 설정 관리 모듈
//!
//! 실행 환경, 서버 바인딩, 저장소, 비밀번호 해싱, 요청 속도 제한 설정을 관리합니다.

use std::env;

use super::env_parse;
use crate::core::errors::{AppError, AppResult};

/// 애플리케이션 실행 환경
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    /// 개발 환경 - 빠른 개발을 위한 설정
    Development,
    /// 테스트 환경 - 자동화된 테스트용 설정
    Test,
    /// 스테이징 환경 - 프로덕션 유사 환경
    Staging,
    /// 프로덕션 환경 - 최고 수준의 보안 및 성능
    Production,
}

impl Environment {
    /// 현재 실행 환경을 감지합니다.
    ///
    /// `ENVIRONMENT` 또는 `NODE_ENV` 환경 변수를 확인하며,
    /// 설정되지 않은 경우 `Production`을 기본값으로 사용합니다.
    pub fn current() -> Self {
        let raw = env::var("ENVIRONMENT")
            .or_else(|_| env::var("NODE_ENV"))
            .unwrap_or_else(|_| "production".to_string());
        Self::from_str(&raw)
    }

    /// 문자열에서 Environment를 생성합니다.
    ///
    /// 알 수 없는 값인 경우 `Production`을 반환합니다.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    /// 내부 오류 상세를 노출해도 되는 환경인지 여부
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development | Environment::Test)
    }
}

/// 패스워드 해싱 설정
#[derive(Debug, Clone)]
pub struct PasswordConfig {
    /// bcrypt cost (4-15)
    pub bcrypt_cost: u32,
}

impl PasswordConfig {
    /// `BCRYPT_COST`를 읽고, 없거나 범위를 벗어나면 환경별 기본값을 사용합니다.
    pub fn from_env(environment: &Environment) -> Self {
        let bcrypt_cost = env::var("BCRYPT_COST")
            .ok()
            .and_then(|raw| raw.parse::<u32>().ok())
            .filter(|cost| (4..=15).contains(cost))
            .unwrap_or_else(|| Self::bcrypt_cost_for_env(environment));

        Self { bcrypt_cost }
    }

    /// 특정 환경에 대한 bcrypt cost를 반환합니다.
    ///
    /// # Environment Defaults
    ///
    /// - Development/Test: 4 (빠른 처리)
    /// - Staging: 10 (중간 보안)
    /// - Production: 12 (고보안)
    pub fn bcrypt_cost_for_env(env: &Environment) -> u32 {
        match env {
            Environment::Development => 4,
            Environment::Test => 4,
            Environment::Staging => 10,
            Environment::Production => 12,
        }
    }
}

/// 서버 바인딩 및 외부 URL 설정
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 바인딩 호스트. 기본값: "0.0.0.0"
    pub host: String,
    /// 바인딩 포트. 기본값: 8080
    pub port: u16,
    /// 워커 스레드 수. 기본값: 4
    pub workers: usize,
    /// 메일 본문 링크에 사용되는 API 공개 주소
    pub api_url: String,
    /// OAuth 콜백 리다이렉트 대상이자 CORS 허용 Origin
    pub frontend_origin: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env_parse("PORT", 8080u16);

        Self {
            api_url: env::var("API_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}", port)),
            frontend_origin: env::var("FRONTEND_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            workers: env_parse("WORKERS", 4usize),
            host,
            port,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 사용자 저장소 백엔드 종류
#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    /// MongoDB `users` 컬렉션
    Mongo,
    /// 프로세스 메모리 (개발/테스트용)
    Memory,
}

/// 저장소 연결 설정
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    pub mongodb_uri: String,
    pub database_name: String,
}

impl DatabaseConfig {
    /// # Environment Variables
    ///
    /// - `STORE_BACKEND`: `mongo` (기본값) 또는 `memory`
    /// - `MONGODB_URI`: 기본값 `mongodb://localhost:27017`
    /// - `DATABASE_NAME`: 기본값 `account_service_dev`
    pub fn from_env() -> AppResult<Self> {
        let backend = match env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "mongo".to_string())
            .to_lowercase()
            .as_str()
        {
            "mongo" | "mongodb" => StoreBackend::Mongo,
            "memory" | "in-memory" => StoreBackend::Memory,
            other => {
                return Err(AppError::InternalError(format!(
                    "지원하지 않는 STORE_BACKEND 값입니다: {}",
                    other
                )));
            }
        };

        Ok(Self {
            backend,
            mongodb_uri: env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database_name: env::var("DATABASE_NAME")
                .unwrap_or_else(|_| "account_service_dev".to_string()),
        })
    }
}

/// IP 기반 요청 속도 제한 설정
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// 초당 허용 요청 수 (기본값: 100)
    pub per_second: u64,
    /// 버스트 허용량 (기본값: 200)
    pub burst_size: u32,
    /// IP당 로그인 허용 횟수 (기본값: 5)
    pub login_attempts: u32,
    /// 로그인 허용 횟수가 모두 회복되는 시간(분) (기본값: 15)
    pub login_window_minutes: u64,
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        Self {
            per_second: env_parse("RATE_LIMIT_PER_SECOND", 100u64),
            burst_size: env_parse("RATE_LIMIT_BURST_SIZE", 200u32),
            login_attempts: env_parse("LOGIN_RATE_LIMIT_ATTEMPTS", 5u32),
            login_window_minutes: env_parse("LOGIN_RATE_LIMIT_WINDOW_MINUTES", 15u64),
        }
    }

    /// 로그인 허용 횟수 1회가 회복되는 간격(초)
    pub fn login_replenish_seconds(&self) -> u64 {
        (self.login_window_minutes * 60 / u64::from(self.login_attempts.max(1))).max(1)
    }
}
