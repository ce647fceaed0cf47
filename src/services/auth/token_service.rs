//! JWT 토큰 발급/검증 서비스
//!
//! 하나의 HS256 비밀키로 세션, 계정 활성화, 비밀번호 재설정 토큰을 발급합니다.
//! 만료 판단은 주입된 `Clock` 기준으로 수행하므로 `jsonwebtoken`의 자체 `exp`
//! 검사는 끄고 직접 비교합니다.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::core::errors::{AppError, AppResult, ErrorContext};
use crate::domain::entities::users::user::User;
use crate::domain::models::token::{IssuedToken, OAuthStateClaims, TokenClaims, TokenPurpose};

/// JWT 토큰 관리 서비스
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: AuthConfig,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            config: config.clone(),
        }
    }

    /// 지정한 용도와 유효 시간으로 사용자 토큰을 발급합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::InternalError` - 서명 실패
    pub fn issue(
        &self,
        user: &User,
        purpose: TokenPurpose,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> AppResult<IssuedToken> {
        let claims = TokenClaims {
            sub: user.id_string(),
            email: user.email.clone(),
            role: user.role,
            purpose,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .with_context(|| format!("{} 토큰 생성 실패", purpose.as_str()))?;

        Ok(IssuedToken {
            token,
            expires_in: ttl.num_seconds(),
        })
    }

    /// 로그인 세션 토큰
    pub fn issue_session(&self, user: &User, now: DateTime<Utc>) -> AppResult<IssuedToken> {
        self.issue(
            user,
            TokenPurpose::Session,
            Duration::hours(self.config.session_ttl_hours),
            now,
        )
    }

    /// 계정 활성화 토큰
    pub fn issue_activation(&self, user: &User, now: DateTime<Utc>) -> AppResult<IssuedToken> {
        self.issue(
            user,
            TokenPurpose::Activation,
            Duration::hours(self.config.activation_ttl_hours),
            now,
        )
    }

    /// 비밀번호 재설정 토큰
    pub fn issue_password_reset(
        &self,
        user: &User,
        now: DateTime<Utc>,
    ) -> AppResult<IssuedToken> {
        self.issue(
            user,
            TokenPurpose::PasswordReset,
            Duration::minutes(self.config.reset_ttl_minutes),
            now,
        )
    }

    pub fn reset_ttl(&self) -> Duration {
        Duration::minutes(self.config.reset_ttl_minutes)
    }

    /// 토큰 서명, 용도, 만료를 검증하고 클레임을 반환합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::TokenExpired` - `exp <= now`
    /// * `AppError::TokenInvalid` - 서명/형식 오류 또는 다른 용도의 토큰
    pub fn verify(
        &self,
        token: &str,
        purpose: TokenPurpose,
        now: DateTime<Utc>,
    ) -> AppResult<TokenClaims> {
        self.verify_with_leeway(token, purpose, now, 0)
    }

    /// 세션 갱신용 검증. 만료 후 `refresh_grace_seconds` 이내의 토큰도 허용합니다.
    pub fn verify_for_refresh(&self, token: &str, now: DateTime<Utc>) -> AppResult<TokenClaims> {
        self.verify_with_leeway(
            token,
            TokenPurpose::Session,
            now,
            self.config.refresh_grace_seconds.max(0),
        )
    }

    fn verify_with_leeway(
        &self,
        token: &str,
        purpose: TokenPurpose,
        now: DateTime<Utc>,
        leeway_seconds: i64,
    ) -> AppResult<TokenClaims> {
        let claims: TokenClaims = self.decode_claims(token)?;

        if claims.purpose != purpose {
            log::warn!(
                "⚠️ 토큰 용도 불일치: 기대값 {}, 실제값 {}",
                purpose.as_str(),
                claims.purpose.as_str()
            );
            return Err(AppError::TokenInvalid("유효하지 않은 토큰입니다".to_string()));
        }

        if claims.exp + leeway_seconds <= now.timestamp() {
            return Err(AppError::TokenExpired("토큰이 만료되었습니다".to_string()));
        }

        Ok(claims)
    }

    /// OAuth `state` 파라미터 발급
    pub fn issue_oauth_state(&self, now: DateTime<Utc>) -> AppResult<String> {
        let claims = OAuthStateClaims {
            nonce: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.config.oauth_state_ttl_minutes)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .context("OAuth state 생성 실패")
    }

    /// OAuth `state` 파라미터 검증
    pub fn verify_oauth_state(&self, state: &str, now: DateTime<Utc>) -> AppResult<()> {
        let claims: OAuthStateClaims = self.decode_claims(state)?;
        if claims.exp <= now.timestamp() {
            return Err(AppError::TokenExpired(
                "OAuth 요청이 만료되었습니다. 다시 시도해주세요".to_string(),
            ));
        }
        Ok(())
    }

    fn decode_claims<T: DeserializeOwned>(&self, token: &str) -> AppResult<T> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        decode::<T>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("토큰 디코딩 실패: {}", e);
                AppError::TokenInvalid("유효하지 않은 토큰입니다".to_string())
            })
    }

    /// `Authorization: Bearer {token}` 헤더에서 토큰 부분만 추출합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::AuthenticationError` - 잘못된 헤더 형식
    pub fn extract_bearer_token(auth_header: &str) -> AppResult<&str> {
        auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                AppError::AuthenticationError("유효하지 않은 인증 헤더 형식입니다".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::domain::entities::users::user::Role;

    fn service() -> TokenService {
        TokenService::new(&AppConfig::for_tests().auth)
    }

    fn user(now: DateTime<Utc>) -> User {
        User::new_local(
            "kim@example.com".to_string(),
            None,
            "hash".to_string(),
            Role::Teacher,
            now,
        )
    }

    #[test]
    fn test_session_token_round_trip() {
        let svc = service();
        let now = Utc::now();
        let u = user(now);

        let issued = svc.issue_session(&u, now).unwrap();
        assert_eq!(issued.expires_in, 168 * 3600);

        let claims = svc.verify(&issued.token, TokenPurpose::Session, now).unwrap();
        assert_eq!(claims.sub, u.id_string());
        assert_eq!(claims.role, Role::Teacher);
        assert_eq!(claims.email, "kim@example.com");
    }

    #[test]
    fn test_purpose_mismatch_is_invalid() {
        let svc = service();
        let now = Utc::now();
        let issued = svc.issue_activation(&user(now), now).unwrap();

        let err = svc
            .verify(&issued.token, TokenPurpose::Session, now)
            .unwrap_err();
        assert!(matches!(err, AppError::TokenInvalid(_)));
    }

    #[test]
    fn test_expiry_uses_given_clock() {
        let svc = service();
        let now = Utc::now();
        let issued = svc.issue_password_reset(&user(now), now).unwrap();

        assert!(svc
            .verify(&issued.token, TokenPurpose::PasswordReset, now + Duration::minutes(14))
            .is_ok());

        let err = svc
            .verify(&issued.token, TokenPurpose::PasswordReset, now + Duration::minutes(15))
            .unwrap_err();
        assert!(matches!(err, AppError::TokenExpired(_)));
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let svc = service();
        let now = Utc::now();
        let issued = svc.issue_session(&user(now), now).unwrap();
        let tampered = format!("{}x", issued.token);

        let err = svc.verify(&tampered, TokenPurpose::Session, now).unwrap_err();
        assert!(matches!(err, AppError::TokenInvalid(_)));
    }

    #[test]
    fn test_tokens_issued_in_same_second_differ() {
        let svc = service();
        let now = Utc::now();
        let u = user(now);
        let a = svc.issue_activation(&u, now).unwrap();
        let b = svc.issue_activation(&u, now).unwrap();
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn test_oauth_state() {
        let svc = service();
        let now = Utc::now();
        let state = svc.issue_oauth_state(now).unwrap();

        assert!(svc.verify_oauth_state(&state, now).is_ok());
        assert!(svc
            .verify_oauth_state(&state, now + Duration::minutes(11))
            .is_err());
        assert!(svc.verify_oauth_state("garbage", now).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(TokenService::extract_bearer_token("Bearer abc").unwrap(), "abc");
        assert!(TokenService::extract_bearer_token("Basic abc").is_err());
        assert!(TokenService::extract_bearer_token("Bearer ").is_err());
    }
}
