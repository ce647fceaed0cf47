//! 세션 토큰 인증 미들웨어
//!
//! ActixWeb 요청 파이프라인에서 Bearer 세션 토큰을 검증하고 사용자 정보를 추출합니다.

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
};

use crate::domain::models::auth::RequiredRole;
use crate::middlewares::auth_inner::AuthMiddlewareService;

/// 세션 토큰 인증 미들웨어
///
/// 유효한 세션 토큰이 없으면 401, 역할 요구사항을 만족하지 못하면 403으로 응답합니다.
pub struct AuthMiddleware {
    /// 접근에 필요한 역할 (선택사항)
    required_role: Option<RequiredRole>,
}

impl AuthMiddleware {
    pub fn new(required_role: Option<RequiredRole>) -> Self {
        Self { required_role }
    }

    /// 로그인한 사용자면 통과
    pub fn required() -> Self {
        Self::new(None)
    }

    /// 관리자(admin, superAdmin) 요구
    pub fn admin() -> Self {
        Self::new(Some(RequiredRole::admin()))
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            required_role: self.required_role.clone(),
        }))
    }
}
