//! # Core Module
//!
//! 애플리케이션 전역에서 공유하는 기반 타입을 제공합니다.
//!
//! ### [`errors`] - 통합 에러 처리
//! - **AppError**: 애플리케이션 전역 에러 타입
//! - **HTTP 통합**: Actix-Web `ResponseError` 구현 (상태 코드 + JSON 본문)
//! - **ErrorContext**: 외부 라이브러리 에러에 컨텍스트를 붙여 변환
//!
//! ### [`context`] - 의존성 조립
//! - **AppContext**: 설정, 저장소, 시계, 서비스들을 한 번 조립해 핸들러에 전달

pub mod context;
pub mod errors;

pub use context::AppContext;
pub use errors::{AppError, AppResult, ErrorContext};
