//! 도메인 모델 및 값 객체
//!
//! - [`auth`] - 인증 사용자, 미들웨어 모드, 비밀번호 정책
//! - [`token`] - 토큰 용도와 클레임
//! - [`oauth`] - Google OAuth 응답
//! - [`notification`] - 메일/푸시 메시지와 전송 결과

pub mod auth;
pub mod notification;
pub mod oauth;
pub mod token;
