//! 데이터 액세스 계층
//!
//! 서비스는 구체 타입 대신 `Arc<dyn UserStore>`에 의존하며, 어떤 구현체를 쓸지는
//! `main`이 `STORE_BACKEND` 설정에 따라 결정합니다.
//!
//! ```rust,ignore
//! use account_service_backend::repositories::users::{UserStore, InMemoryUserStore};
//!
//! let store: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
//! let user = store.find_by_email("user@example.com").await?;
//! ```

pub mod users;
