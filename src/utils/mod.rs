//! 공통 유틸리티 함수 모듈
//!
//! # Modules
//!
//! - [`string_utils`] - 이메일 정규화, 문자열 정리, 토큰 다이제스트
//! - [`clock`] - 주입 가능한 시간 공급자와 BSON 시각 변환

pub mod clock;
pub mod string_utils;

pub use clock::{Clock, ManualClock, SystemClock};
