use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::users::user::{PushKeys, PushSubscription, Role};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PushKeysDto {
    #[validate(length(min = 1, message = "p256dh 키가 필요합니다"))]
    pub p256dh: String,
    #[validate(length(min = 1, message = "auth 키가 필요합니다"))]
    pub auth: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PushSubscriptionDto {
    #[validate(url(message = "유효한 endpoint URL이 필요합니다"))]
    pub endpoint: String,
    #[validate(nested)]
    pub keys: PushKeysDto,
}

impl From<PushSubscriptionDto> for PushSubscription {
    fn from(dto: PushSubscriptionDto) -> Self {
        PushSubscription {
            endpoint: dto.endpoint,
            keys: PushKeys {
                p256dh: dto.keys.p256dh,
                auth: dto.keys.auth,
            },
        }
    }
}

/// `POST /push/subscribe`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubscribeRequest {
    #[validate(nested)]
    pub subscription: PushSubscriptionDto,
}

/// `DELETE /push/unsubscribe`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UnsubscribeRequest {
    #[validate(length(min = 1, message = "endpoint가 필요합니다"))]
    pub endpoint: String,
}

/// `POST /push/test`, `POST /push/send-to-all`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendPushRequest {
    #[validate(length(min = 1, max = 100, message = "제목은 1-100자여야 합니다"))]
    pub title: String,
    #[validate(length(min = 1, max = 500, message = "본문은 1-500자여야 합니다"))]
    pub body: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// `POST /push/send-to-role`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendPushToRoleRequest {
    pub role: Role,
    #[validate(length(min = 1, max = 100, message = "제목은 1-100자여야 합니다"))]
    pub title: String,
    #[validate(length(min = 1, max = 500, message = "본문은 1-500자여야 합니다"))]
    pub body: String,
    #[serde(default)]
    pub url: Option<String>,
}
