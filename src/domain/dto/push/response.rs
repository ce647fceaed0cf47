use serde::{Deserialize, Serialize};

use crate::domain::models::notification::DeliveryReport;

/// VAPID 공개 키 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VapidKeyResponse {
    pub public_key: String,
}

/// 다중 푸시 전송 결과 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryReportResponse {
    pub message: String,
    #[serde(flatten)]
    pub report: DeliveryReport,
}
