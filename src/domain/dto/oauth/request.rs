use serde::{Deserialize, Serialize};
use validator::Validate;

/// Google OAuth 콜백 쿼리
///
/// 사용자가 동의를 거부하면 `code` 대신 `error`가 전달됩니다.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// 클라이언트 측에서 받은 Google ID 토큰 검증 요청
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GoogleVerifyRequest {
    #[validate(length(min = 1, message = "idToken이 필요합니다"))]
    pub id_token: String,
}

/// Google 연동 해제 요청
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleRevokeRequest {
    /// 있으면 Google 측 토큰도 폐기합니다.
    #[serde(default)]
    pub access_token: Option<String>,
}
