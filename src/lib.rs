//! 계정 서비스 백엔드
//!
//! Rust 기반의 인증 및 사용자 관리 REST 서비스입니다.
//! 회원가입과 이메일 활성화, 로그인 잠금, JWT 세션 토큰, 비밀번호 재설정,
//! Google OAuth 2.0 로그인, 웹 푸시 알림을 제공합니다.
//!
//! # Features
//!
//! - **사용자 관리**: 로컬 계정 생성, 프로필 수정, 소프트 삭제
//! - **로그인 잠금**: 연속 5회 실패 시 15분 잠금, 만료 후 다음 로그인에서 자동 해제
//! - **JWT 인증**: 세션/활성화/재설정 용도별 토큰
//! - **OAuth 2.0**: Google 소셜 로그인 및 계정 연동
//! - **알림**: 메일과 웹 푸시 전송, 실패는 로그만 남김 (활성화 메일 제외)
//! - **명시적 DI**: `AppContext` 하나로 조립, 전역 상태 없음
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API 엔드포인트
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청 검증, 응답 코드
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← 비즈니스 로직, 알림 디스패처
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    UserStore    │ ← MongoDB 또는 인메모리 저장소
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use account_service_backend::config::AppConfig;
//! use account_service_backend::core::AppContext;
//! use account_service_backend::repositories::users::InMemoryUserStore;
//! use account_service_backend::services::notifications::{LogEmailSender, LogPushSender};
//! use account_service_backend::utils::clock::SystemClock;
//!
//! let ctx = AppContext::new(
//!     AppConfig::from_env()?,
//!     Arc::new(InMemoryUserStore::new()),
//!     Arc::new(LogEmailSender),
//!     Arc::new(LogPushSender),
//!     Arc::new(SystemClock),
//! );
//! ```

pub mod core;
pub mod config;
pub mod db;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod middlewares;
