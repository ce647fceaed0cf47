//! # 문자열 유틸리티
//!
//! 이메일 정규화, 선택 문자열 정리, 일회성 토큰 다이제스트 계산을 제공합니다.

use serde::Deserialize;
use sha2::{Digest, Sha256};

/// 이메일을 저장소 키 형태로 정규화합니다 (앞뒤 공백 제거 + 소문자).
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// 선택 문자열을 정리합니다. 빈 문자열은 `None`으로 취급합니다.
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// serde 역직렬화 시 선택 문자열을 정리합니다.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}

/// 일회성 토큰의 SHA-256 hex 다이제스트
///
/// 활성화/재설정 토큰은 원문 대신 이 값만 저장소에 기록됩니다.
pub fn token_digest(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
        assert_eq!(normalize_email("bob@example.com"), "bob@example.com");
    }

    #[test]
    fn test_clean_optional_string() {
        assert_eq!(
            clean_optional_string(Some("  World  ".to_string())),
            Some("World".to_string())
        );
        assert_eq!(clean_optional_string(Some("   ".to_string())), None);
        assert_eq!(clean_optional_string(None), None);
    }

    #[test]
    fn test_deserialize_optional_string() {
        #[derive(Deserialize)]
        struct Named {
            #[serde(default, deserialize_with = "deserialize_optional_string")]
            name: Option<String>,
        }

        let named: Named = serde_json::from_str(r#"{"name":"   "}"#).unwrap();
        assert_eq!(named.name, None);
        let named: Named = serde_json::from_str(r#"{"name":" Kim "}"#).unwrap();
        assert_eq!(named.name.as_deref(), Some("Kim"));
    }

    #[test]
    fn test_token_digest_is_stable_hex() {
        let a = token_digest("abc");
        assert_eq!(a.len(), 64);
        assert_eq!(a, token_digest("abc"));
        assert_ne!(a, token_digest("abd"));
        assert_eq!(
            a,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
