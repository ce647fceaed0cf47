//! AuthMiddleware 인증 로직의 핵심 기능
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::{web, Error, HttpMessage, HttpResponse};
use futures_util::future::LocalBoxFuture;

use crate::core::context::AppContext;
use crate::core::errors::AppError;
use crate::domain::models::auth::{AuthenticatedUser, RequiredRole};
use crate::domain::models::token::TokenPurpose;
use crate::services::auth::TokenService;

/// 실제 인증 로직을 수행하는 서비스
pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub required_role: Option<RequiredRole>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let required_role = self.required_role.clone();

        Box::pin(async move {
            let user = match authenticate(&req) {
                Ok(user) => user,
                Err(err) => {
                    log::warn!("인증 실패: {}", err);
                    let (error, message) = match err {
                        AppError::TokenExpired(_) => ("token_expired", "토큰이 만료되었습니다"),
                        _ => ("authentication_required", "유효한 인증 토큰이 필요합니다"),
                    };
                    let response = HttpResponse::Unauthorized().json(serde_json::json!({
                        "error": error,
                        "message": message
                    }));
                    let (req, _) = req.into_parts();
                    return Ok(ServiceResponse::new(req, response).map_into_right_body());
                }
            };

            if let Some(ref required) = required_role {
                if !required.is_satisfied(&user.role) {
                    log::warn!(
                        "권한 부족: 사용자 ID {} ({}), 필요 권한: {:?}",
                        user.user_id,
                        user.role.as_str(),
                        required
                    );
                    let response = HttpResponse::Forbidden().json(serde_json::json!({
                        "error": "insufficient_permissions",
                        "message": "접근 권한이 부족합니다"
                    }));
                    let (req, _) = req.into_parts();
                    return Ok(ServiceResponse::new(req, response).map_into_right_body());
                }
            }

            log::debug!("인증 성공: 사용자 ID {}", user.user_id);
            req.extensions_mut().insert(user);

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// 요청의 Bearer 세션 토큰을 검증하고 사용자 정보를 만듭니다.
fn authenticate(req: &ServiceRequest) -> Result<AuthenticatedUser, AppError> {
    let ctx = req
        .app_data::<web::Data<AppContext>>()
        .ok_or_else(|| AppError::InternalError("AppContext가 등록되지 않았습니다".to_string()))?;

    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::AuthenticationError("Authorization 헤더가 없습니다".to_string()))?;

    let token = TokenService::extract_bearer_token(auth_header)?;
    let claims = ctx
        .tokens
        .verify(token, TokenPurpose::Session, ctx.clock.now())?;

    Ok(AuthenticatedUser {
        user_id: claims.sub,
        email: claims.email,
        role: claims.role,
    })
}
