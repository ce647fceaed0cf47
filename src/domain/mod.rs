//! 도메인 계층
//!
//! - [`entities`] - MongoDB 문서와 매핑되는 엔티티
//! - [`dto`] - 라우트별 요청/응답 레코드
//! - [`models`] - 인증, 토큰, OAuth, 알림 값 객체

pub mod dto;
pub mod entities;
pub mod models;
