//! Users Entity Module
//!
//! 로컬 계정과 Google 계정을 모두 표현하는 `User` 엔티티를 정의합니다.
//!
//! ```rust,ignore
//! use account_service_backend::domain::entities::users::{Role, User};
//!
//! let user = User::new_local(email, None, password_hash, Role::Student, clock.now());
//! ```

pub mod user;

pub use user::{PushKeys, PushSubscription, Role, User};
