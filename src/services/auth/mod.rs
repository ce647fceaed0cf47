//! 인증 및 보안 서비스 모듈
//!
//! - [`auth_service`] - 회원가입, 로그인, 세션 갱신, 이메일 인증, 비밀번호 재설정
//! - [`token_service`] - 세션/활성화/재설정 토큰 발급과 검증 (HS256)
//! - [`lockout`] - 로그인 실패 잠금 정책
//! - [`password`] - bcrypt 해싱
//! - [`google_auth_service`] - Google OAuth 2.0 로그인

pub mod auth_service;
pub mod google_auth_service;
pub mod lockout;
pub mod password;
pub mod token_service;

pub use auth_service::AuthService;
pub use google_auth_service::GoogleAuthService;
pub use lockout::{LockState, LockoutGuard};
pub use password::PasswordHasher;
pub use token_service::TokenService;
