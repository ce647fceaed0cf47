//! # Application Error Handling System
//!
//! 계정 서비스 전역에서 사용하는 통합 에러 타입입니다.
//! 모든 계층(저장소, 서비스, 핸들러)은 `AppError`를 반환하고,
//! `actix_web::ResponseError` 구현을 통해 일관된 JSON 응답으로 변환됩니다.
//!
//! ## HTTP 응답 매핑
//!
//! | AppError | HTTP Status | 사용 시나리오 |
//! |----------|-------------|---------------|
//! | `ValidationError` | 400 Bad Request | 입력값 검증 실패, 일회성 토큰 사용 실패 |
//! | `NotFound` | 404 Not Found | 리소스 없음 |
//! | `ConflictError` | 409 Conflict | 이메일 중복 (프로필 수정) |
//! | `AuthenticationError` | 401 Unauthorized | 로그인 실패 |
//! | `TokenExpired` | 401 Unauthorized | 만료된 토큰 |
//! | `TokenInvalid` | 401 Unauthorized | 위조/형식 오류/용도 불일치 토큰 |
//! | `AuthorizationError` | 403 Forbidden | 비활성 계정, 권한 부족 |
//! | `AccountLocked` | 423 Locked | 로그인 실패 누적으로 잠긴 계정 |
//! | `ExternalServiceError` | 502 Bad Gateway | 메일/푸시/OAuth 공급자 오류 |
//! | `ServiceUnavailable` | 503 Service Unavailable | 설정되지 않은 기능 |
//! | `DatabaseError` | 500 Internal Server Error | 데이터베이스 오류 |
//! | `InternalError` | 500 Internal Server Error | 예상치 못한 오류 |
//!
//! ## 응답 형식
//!
//! ```json
//! { "error": "account_locked", "message": "...", "remainingMinutes": 12, "lockUntil": "..." }
//! ```
//!
//! 5xx 응답의 `message`는 정제된 문구이며, 개발/테스트 환경에서는
//! `internal_error_detail` 핸들러가 원문으로 바꿔 응답합니다.

use actix_web::http::StatusCode;
use chrono::{DateTime, Utc};
use serde_json::json;
use thiserror::Error;

/// 애플리케이션 전역 에러 타입
///
/// `thiserror`로 `Error`를 구현하고 `ResponseError`로 HTTP 응답에 매핑됩니다.
///
/// ```rust,ignore
/// collection.find_one(filter).await
///     .map_err(|e| AppError::DatabaseError(e.to_string()))?;
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// 데이터베이스 연산 실패
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// 입력값 검증 실패
    ///
    /// 요청 본문/쿼리의 형식 오류, 비밀번호 정책 위반, 그리고
    /// 활성화/재설정 같은 일회성 토큰의 사용 실패에 사용됩니다.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 리소스 없음
    #[error("Not found: {0}")]
    NotFound(String),

    /// 중복/충돌
    #[error("Conflict error: {0}")]
    ConflictError(String),

    /// 인증 실패 (잘못된 자격 증명, 알 수 없는 계정)
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// 만료된 토큰
    #[error("Token expired: {0}")]
    TokenExpired(String),

    /// 서명 불일치, 형식 오류, 또는 용도가 다른 토큰
    #[error("Token invalid: {0}")]
    TokenInvalid(String),

    /// 권한 부족 또는 비활성 계정
    #[error("Authorization error: {0}")]
    AuthorizationError(String),

    /// 로그인 실패 누적으로 잠긴 계정
    ///
    /// 남은 잠금 시간(분, 올림)과 잠금 해제 시각을 함께 전달합니다.
    #[error("Account locked for {remaining_minutes} more minute(s)")]
    AccountLocked {
        remaining_minutes: i64,
        lock_until: DateTime<Utc>,
    },

    /// 메일, 푸시, OAuth 공급자 등 외부 서비스 호출 실패
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 설정되지 않았거나 일시적으로 사용할 수 없는 기능
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// 예상하지 못한 내부 오류
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 응답 본문의 `error` 필드에 들어가는 기계 판독용 코드
    pub fn code(&self) -> &'static str {
        match self {
            AppError::DatabaseError(_) => "database_error",
            AppError::ValidationError(_) => "validation_error",
            AppError::NotFound(_) => "not_found",
            AppError::ConflictError(_) => "conflict",
            AppError::AuthenticationError(_) => "unauthorized",
            AppError::TokenExpired(_) => "token_expired",
            AppError::TokenInvalid(_) => "token_invalid",
            AppError::AuthorizationError(_) => "forbidden",
            AppError::AccountLocked { .. } => "account_locked",
            AppError::ExternalServiceError(_) => "external_service_error",
            AppError::ServiceUnavailable(_) => "service_unavailable",
            AppError::InternalError(_) => "internal_error",
        }
    }

    /// 클라이언트에게 노출할 메시지
    ///
    /// 500 계열 내부 오류는 항상 정제된 메시지로 응답합니다.
    /// 개발/테스트 환경의 원문 노출은 `middlewares::internal_error_detail`이 담당합니다.
    fn public_message(&self) -> String {
        match self {
            AppError::DatabaseError(_) | AppError::InternalError(_) => {
                "일시적인 서버 오류가 발생했습니다".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) => StatusCode::CONFLICT,
            AppError::AuthenticationError(_)
            | AppError::TokenExpired(_)
            | AppError::TokenInvalid(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            AppError::AccountLocked { .. } => StatusCode::LOCKED,
            AppError::ExternalServiceError(_) => StatusCode::BAD_GATEWAY,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::DatabaseError(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 표준 JSON 에러 응답을 생성합니다.
    ///
    /// 5xx 에러는 서버 로그에 원본을 남기고 클라이언트에는
    /// 정제된 메시지만 전달합니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        let status = self.status_code();

        if status.is_server_error() {
            log::error!("❌ 요청 처리 실패 ({}): {}", status.as_u16(), self);
        }

        let body = match self {
            AppError::AccountLocked {
                remaining_minutes,
                lock_until,
            } => json!({
                "error": self.code(),
                "message": format!(
                    "로그인 시도 횟수를 초과했습니다. {}분 후 다시 시도해주세요",
                    remaining_minutes
                ),
                "remainingMinutes": remaining_minutes,
                "lockUntil": lock_until.to_rfc3339(),
            }),
            _ => json!({
                "error": self.code(),
                "message": self.public_message(),
            }),
        };

        actix_web::HttpResponse::build(status).json(body)
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 `AppError::InternalError`로 변환하는 확장 trait
///
/// ```rust,ignore
/// let hash = bcrypt::hash(password, cost).context("비밀번호 해싱 실패")?;
/// ```
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;

    /// 클로저를 사용하여 지연 평가된 컨텍스트를 제공합니다.
    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn test_validation_error_response() {
        let error = AppError::ValidationError("Email is required".to_string());
        assert_eq!(error.error_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_error_response() {
        let error = AppError::NotFound("User not found".to_string());
        assert_eq!(error.error_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_token_errors_are_unauthorized() {
        assert_eq!(
            AppError::TokenExpired("expired".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::TokenInvalid("bad".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::AuthenticationError("bad".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_authorization_error_response() {
        let error = AppError::AuthorizationError("Insufficient permissions".to_string());
        assert_eq!(error.error_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_account_locked_response() {
        let error = AppError::AccountLocked {
            remaining_minutes: 15,
            lock_until: Utc::now(),
        };
        assert_eq!(error.error_response().status(), StatusCode::LOCKED);
        assert_eq!(error.code(), "account_locked");
    }

    #[test]
    fn test_gateway_and_unavailable_statuses() {
        assert_eq!(
            AppError::ExternalServiceError("smtp down".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::ServiceUnavailable("oauth".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_internal_error_response() {
        let error = AppError::InternalError("Something went wrong".to_string());
        assert_eq!(
            error.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(error.public_message(), "일시적인 서버 오류가 발생했습니다");
    }

    #[test]
    fn test_error_context_trait() {
        let result: Result<(), &str> = Err("original error");
        let app_result = result.context("Additional context");

        if let Err(AppError::InternalError(msg)) = app_result {
            assert!(msg.contains("Additional context"));
            assert!(msg.contains("original error"));
        } else {
            panic!("Expected InternalError");
        }
    }
}
