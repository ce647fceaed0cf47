//! 비밀번호 정책
//!
//! 회원가입, 비밀번호 변경, 비밀번호 재설정 요청 DTO의 `validator` 커스텀 함수로 사용됩니다.
//!
//! - 길이 8-128자
//! - 대문자, 소문자, 숫자, 특수문자 각각 1개 이상
//! - 공백 문자 불가

use validator::ValidationError;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

const SPECIAL_CHARACTERS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

/// 비밀번호가 정책을 만족하는지 검사합니다.
///
/// # Errors
///
/// 첫 번째로 위반한 규칙의 코드와 한국어 메시지를 담은 `ValidationError`
pub fn validate_password_policy(password: &str) -> Result<(), ValidationError> {
    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(violation("password_too_short", "비밀번호는 최소 8자 이상이어야 합니다"));
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(violation("password_too_long", "비밀번호는 128자를 초과할 수 없습니다"));
    }
    if password.chars().any(char::is_whitespace) {
        return Err(violation("password_whitespace", "비밀번호에 공백을 포함할 수 없습니다"));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(violation("password_uppercase", "비밀번호는 대문자를 포함해야 합니다"));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(violation("password_lowercase", "비밀번호는 소문자를 포함해야 합니다"));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(violation("password_digit", "비밀번호는 숫자를 포함해야 합니다"));
    }
    if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        return Err(violation("password_special", "비밀번호는 특수문자를 포함해야 합니다"));
    }
    Ok(())
}

fn violation(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}
