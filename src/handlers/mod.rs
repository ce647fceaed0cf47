//! # HTTP Request Handlers Module
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 정의하는 모듈입니다.
//!
//! ## 아키텍처 위치
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//!   Client (Browser, Mobile App, API Client)
//! └─────────────────────┬───────────────────────┘
//!                       │ HTTP Request/Response
//! ┌─────────────────────▼───────────────────────┐
//!   Handlers (이 모듈) - DTO 검증, 응답 코드        ← Web Layer
//! ├─────────────────────────────────────────────┤
//!   Services - 비즈니스 로직                      ← Service Layer
//! ├─────────────────────────────────────────────┤
//!   UserStore - 데이터 접근                       ← Repository Layer
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## 공통 패턴
//!
//! 모든 핸들러는 같은 형태를 따릅니다.
//!
//! ```rust,ignore
//! #[post("/register")]
//! pub async fn register(
//!     ctx: web::Data<AppContext>,
//!     payload: web::Json<RegisterRequest>,
//! ) -> Result<HttpResponse, AppError> {
//!     payload.validate()
//!         .map_err(|e| AppError::ValidationError(e.to_string()))?;
//!     let response = ctx.auth.register(payload.into_inner()).await?;
//!     Ok(HttpResponse::Created().json(response))
//! }
//! ```
//!
//! 1. `validator`로 DTO 검증 (실패 시 400)
//! 2. `AppContext`의 서비스 호출
//! 3. 서비스 에러는 `AppError`의 `ResponseError` 구현이 상태 코드와 JSON으로 변환
//!
//! 인증이 필요한 핸들러는 [`AuthenticatedUser`](crate::domain::models::auth::AuthenticatedUser)
//! 추출자로 미들웨어가 넣어둔 사용자 정보를 받습니다.

pub mod auth;
pub mod health;
pub mod oauth;
pub mod push;
pub mod users;
