//! 미들웨어 모듈
//!
//! ### 인증 미들웨어 (AuthMiddleware)
//! - Bearer 세션 토큰 추출 및 검증 (`AppContext`의 `TokenService` 사용)
//! - 사용자 정보를 request extension에 저장
//! - 관리자 등 역할 요구사항 지원 (불충족 시 403)
//!
//! ### 5xx 상세 노출 (internal_error_detail)
//! - 개발/테스트 환경에서만 내부 오류 원문을 응답 본문에 포함
//!
//! ```rust,ignore
//! App::new()
//!     .service(
//!         web::scope("/users")
//!             .wrap(AuthMiddleware::required())
//!             .route("/me", web::get().to(me))
//!     )
//!     .service(
//!         web::resource("/push/send-to-all")
//!             .wrap(AuthMiddleware::admin())
//!             .route(web::post().to(send_to_all))
//!     )
//! ```

pub mod auth_middleware;
mod auth_inner;
mod error_detail;

pub use auth_middleware::AuthMiddleware;
pub use error_detail::internal_error_detail;
