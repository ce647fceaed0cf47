//! 인증 관련 도메인 모델
//!
//! - [`authenticated_user`] - 요청에 첨부되는 인증 사용자
//! - [`authentication_request`] - 미들웨어 역할 요구사항
//! - [`password_policy`] - 비밀번호 강도 규칙

pub mod authenticated_user;
pub mod authentication_request;
pub mod password_policy;

pub use authenticated_user::AuthenticatedUser;
pub use authentication_request::RequiredRole;
pub use password_policy::validate_password_policy;
