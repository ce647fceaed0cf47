//! # Domain Entities Module
//!
//! MongoDB 컬렉션과 1:1로 대응되는 문서 구조입니다.
//!
//! ```text
//! entities/
//! └── users/
//!     └── user.rs   ← User, Role, PushSubscription
//! ```
//!
//! 필드는 camelCase로 저장되며, 새 필드는 `#[serde(default)]`로 추가하여
//! 기존 문서와의 호환성을 유지합니다.

pub mod users;
