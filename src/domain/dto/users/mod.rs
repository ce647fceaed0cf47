//! # User Data Transfer Objects Module
//!
//! 사용자/인증 API의 요청·응답 계약입니다.
//!
//! ```text
//! users/
//! ├── request/
//! │   ├── auth_request.rs      # 회원가입, 로그인, 토큰 갱신, 재설정
//! │   └── profile_request.rs   # 프로필 수정, 비밀번호 변경, 사용자 수 조회
//! └── response/
//!     └── user_response.rs     # UserResponse, AuthResponse 등
//! ```

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;
