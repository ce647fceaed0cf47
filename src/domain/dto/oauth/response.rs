use serde::{Deserialize, Serialize};

/// Google 로그인 URL 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthLoginUrlResponse {
    pub auth_url: String,

    /// 콜백에서 그대로 돌려받아야 하는 서명된 state
    pub state: String,
}
