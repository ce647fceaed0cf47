//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! 각 서비스는 생성 시 저장소, 시계, 전송기를 주입받으며
//! [`crate::core::context::AppContext`]가 한 번 조립해 핸들러에 전달합니다.

pub mod auth;
pub mod notifications;
pub mod push;
pub mod users;
