//! 5xx 응답 상세 노출
//!
//! `AppError`는 내부/DB 오류 메시지를 항상 정제해서 응답합니다.
//! `AppContext`에 설정된 실행 환경이 개발/테스트이면 이 핸들러가 원본 메시지로
//! 본문을 다시 작성합니다.

use actix_web::dev::ServiceResponse;
use actix_web::middleware::ErrorHandlerResponse;
use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::core::context::AppContext;
use crate::core::errors::AppError;

/// `ErrorHandlers::default_handler_server`에 등록하는 핸들러
pub fn internal_error_detail<B>(
    res: ServiceResponse<B>,
) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let exposes_detail = res
        .request()
        .app_data::<web::Data<AppContext>>()
        .is_some_and(|ctx| ctx.config.environment.is_development());

    let detail = res
        .response()
        .error()
        .and_then(|e| e.as_error::<AppError>())
        .filter(|err| matches!(err, AppError::DatabaseError(_) | AppError::InternalError(_)))
        .map(|err| (err.code(), err.to_string()));

    let (code, message) = match detail {
        Some(detail) if exposes_detail => detail,
        _ => return Ok(ErrorHandlerResponse::Response(res.map_into_left_body())),
    };

    let status = res.status();
    let (req, _) = res.into_parts();
    let response = HttpResponse::build(status).json(json!({
        "error": code,
        "message": message,
    }));

    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, response).map_into_right_body(),
    ))
}
