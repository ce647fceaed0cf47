//! # 사용자 관련 응답 DTO 모듈
//!
//! 민감한 정보(비밀번호 해시, 토큰 다이제스트, 잠금 카운터)는 응답 타입에
//! 필드로 존재하지 않으므로 실수로 노출될 수 없습니다.

pub mod user_response;

pub use user_response::{
    AuthResponse, MessageResponse, ResetTokenInfoResponse, UserCountResponse, UserEnvelope,
    UserResponse,
};
