//! 인증 요청 DTO
//!
//! `/auth/*` 라우트의 요청 본문과 쿼리를 정의합니다. 모든 DTO는 핸들러 진입 시
//! `validate()`로 검증되며 실패 시 400 응답으로 변환됩니다.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::users::user::Role;
use crate::domain::models::auth::validate_password_policy;
use crate::utils::string_utils::deserialize_optional_string;

/// 회원가입 요청
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(custom(function = "validate_password_policy"))]
    pub password: String,

    /// 생략 시 `student`. 관리자 역할은 자가 가입으로 선택할 수 없습니다.
    #[serde(default)]
    pub role: Option<Role>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 50, message = "이름은 50자 이하여야 합니다"))]
    pub name: Option<String>,
}

/// 로그인 요청
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 1, message = "비밀번호를 입력해주세요"))]
    pub password: String,
}

/// 세션 토큰 갱신 요청
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "토큰이 필요합니다"))]
    pub token: String,
}

/// 비밀번호 재설정 메일 요청
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,
}

/// 활성화 메일 재발송 요청
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResendActivationRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,
}

/// 일회성 토큰 본문 (`/verify-token`, `/verify-reset-token`)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(length(min = 1, message = "토큰이 필요합니다"))]
    pub token: String,
}

/// `GET /auth/activate-account?token=`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ActivationQuery {
    #[validate(length(min = 1, message = "토큰이 필요합니다"))]
    pub token: String,
}

/// 비밀번호 재설정 요청
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "토큰이 필요합니다"))]
    pub token: String,

    #[validate(custom(function = "validate_password_policy"))]
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let ok: RegisterRequest = serde_json::from_str(
            r#"{"email":"kim@example.com","password":"Strong1!","role":"teacher"}"#,
        )
        .unwrap();
        assert!(ok.validate().is_ok());
        assert_eq!(ok.role, Some(Role::Teacher));

        let weak: RegisterRequest =
            serde_json::from_str(r#"{"email":"kim@example.com","password":"Weak1!"}"#).unwrap();
        assert!(weak.validate().is_err());

        let bad_email: RegisterRequest =
            serde_json::from_str(r#"{"email":"not-an-email","password":"Strong1!"}"#).unwrap();
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn test_reset_password_uses_camel_case() {
        let req: ResetPasswordRequest =
            serde_json::from_str(r#"{"token":"t","newPassword":"Strong1!"}"#).unwrap();
        assert!(req.validate().is_ok());
    }
}
