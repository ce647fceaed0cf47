//! 웹 푸시 구독 관리 및 수동 발송 서비스

pub mod push_service;

pub use push_service::PushService;
