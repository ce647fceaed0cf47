//! # Data Transfer Objects
//!
//! 라우트별 요청/응답 레코드입니다. 핸들러는 이 타입들만 주고받으며
//! 엔티티를 직접 직렬화하지 않습니다.

pub mod oauth;
pub mod push;
pub mod users;
