//! 메일/웹 푸시 알림
//!
//! - [`email`] - 메일 전송기 trait과 구현체
//! - [`push`] - 푸시 전송기 trait과 구현체
//! - [`templates`] - 알림 본문
//! - [`dispatcher`] - 이벤트별 전송 및 실패 처리 정책

pub mod dispatcher;
pub mod email;
pub mod push;
pub mod templates;

pub use dispatcher::NotificationDispatcher;
pub use email::{EmailSender, HttpEmailSender, LogEmailSender};
pub use push::{LogPushSender, PushSender, RelayPushSender};
