//! 사용자 관리 서비스 모듈
//!
//! 프로필 조회/수정, 비밀번호 변경, 소프트 삭제, 관리자 기능을 담당합니다.

pub mod user_service;

pub use user_service::UserService;
