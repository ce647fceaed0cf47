//! 프로필 관련 요청 DTO

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::users::user::Role;
use crate::domain::models::auth::validate_password_policy;
use crate::utils::string_utils::deserialize_optional_string;

/// 프로필 수정 요청
///
/// 이메일을 변경하면 이메일 인증 상태가 초기화됩니다.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 50, message = "이름은 50자 이하여야 합니다"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: Option<String>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

/// 비밀번호 변경 요청
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "현재 비밀번호를 입력해주세요"))]
    pub current_password: String,

    #[validate(custom(function = "validate_password_policy"))]
    pub new_password: String,
}

/// `GET /users/count?role=`
#[derive(Debug, Clone, Deserialize)]
pub struct CountUsersQuery {
    #[serde(default)]
    pub role: Option<Role>,
}
