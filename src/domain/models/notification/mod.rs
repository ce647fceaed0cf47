pub mod notification;

pub use notification::{DeliveryReport, EmailMessage, NotificationKind, PushOutcome, PushPayload};
