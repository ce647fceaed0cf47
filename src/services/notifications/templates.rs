//! 메일/푸시 본문 템플릿

use chrono::{DateTime, Utc};

use crate::domain::models::notification::{EmailMessage, NotificationKind, PushPayload};

const SERVICE_NAME: &str = "Account Service";

fn layout(title: &str, body_html: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"></head>
<body style="font-family: Helvetica, Arial, sans-serif; color: #333333;">
  <div style="max-width: 600px; margin: 0 auto; padding: 40px 20px;">
    <h2 style="font-weight: 400;">{title}</h2>
    {body_html}
    <p style="font-size: 12px; color: #888888;">{service}</p>
  </div>
</body>
</html>"#,
        title = title,
        body_html = body_html,
        service = SERVICE_NAME,
    )
}

fn button(link: &str, label: &str) -> String {
    format!(
        r#"<p><a href="{link}" style="display: inline-block; padding: 14px 24px; background: #4f5bf8; color: #ffffff; text-decoration: none;">{label}</a></p>"#,
        link = link,
        label = label,
    )
}

fn greeting(name: Option<&str>) -> String {
    match name {
        Some(name) => format!("{}님, 안녕하세요.", name),
        None => "안녕하세요.".to_string(),
    }
}

/// 계정 활성화 링크: 백엔드 `GET /auth/activate-account`로 바로 연결됩니다.
pub fn activation_link(api_url: &str, token: &str) -> String {
    format!(
        "{}/auth/activate-account?token={}",
        api_url.trim_end_matches('/'),
        urlencoding::encode(token)
    )
}

/// 비밀번호 재설정 링크: 프론트엔드 재설정 화면으로 연결됩니다.
pub fn reset_link(frontend_origin: &str, token: &str) -> String {
    format!(
        "{}/reset-password?token={}",
        frontend_origin.trim_end_matches('/'),
        urlencoding::encode(token)
    )
}

pub fn activation_email(to: &str, name: Option<&str>, link: &str, ttl_hours: i64) -> EmailMessage {
    let title = "이메일 인증을 완료해주세요";
    let html = layout(
        title,
        &format!(
            "<p>{}</p><p>가입해주셔서 감사합니다. 아래 버튼을 눌러 계정을 활성화해주세요. 링크는 {}시간 동안 유효합니다.</p>{}",
            greeting(name),
            ttl_hours,
            button(link, "계정 활성화")
        ),
    );
    let text = format!(
        "{}\n계정을 활성화하려면 다음 링크를 여세요 ({}시간 유효):\n{}\n",
        greeting(name),
        ttl_hours,
        link
    );

    EmailMessage {
        to: to.to_string(),
        subject: format!("[{}] {}", SERVICE_NAME, title),
        html,
        text,
        kind: Some(NotificationKind::Activation),
    }
}

pub fn password_reset_email(to: &str, link: &str, ttl_minutes: i64) -> EmailMessage {
    let title = "비밀번호 재설정";
    let html = layout(
        title,
        &format!(
            "<p>비밀번호 재설정 요청을 받았습니다. 링크는 {}분 동안 유효합니다.</p>{}<p>요청하지 않았다면 이 메일을 무시하세요.</p>",
            ttl_minutes,
            button(link, "비밀번호 재설정")
        ),
    );
    let text = format!(
        "비밀번호 재설정 링크 ({}분 유효):\n{}\n요청하지 않았다면 이 메일을 무시하세요.\n",
        ttl_minutes, link
    );

    EmailMessage {
        to: to.to_string(),
        subject: format!("[{}] {}", SERVICE_NAME, title),
        html,
        text,
        kind: Some(NotificationKind::PasswordReset),
    }
}

pub fn account_locked_email(to: &str, lockout_minutes: i64) -> EmailMessage {
    let title = "계정이 일시적으로 잠겼습니다";
    let body = format!(
        "로그인 실패가 반복되어 계정이 {}분 동안 잠겼습니다. 본인이 시도하지 않았다면 비밀번호를 변경해주세요.",
        lockout_minutes
    );

    EmailMessage {
        to: to.to_string(),
        subject: format!("[{}] {}", SERVICE_NAME, title),
        html: layout(title, &format!("<p>{}</p>", body)),
        text: format!("{}\n", body),
        kind: Some(NotificationKind::AccountLocked),
    }
}

pub fn security_alert_email(to: &str, at: DateTime<Utc>) -> EmailMessage {
    let title = "새 로그인 알림";
    let body = format!(
        "{} (UTC)에 계정에 새로운 로그인이 있었습니다. 본인이 아니라면 즉시 비밀번호를 변경해주세요.",
        at.format("%Y-%m-%d %H:%M")
    );

    EmailMessage {
        to: to.to_string(),
        subject: format!("[{}] {}", SERVICE_NAME, title),
        html: layout(title, &format!("<p>{}</p>", body)),
        text: format!("{}\n", body),
        kind: Some(NotificationKind::SecurityAlert),
    }
}

pub fn welcome_email(to: &str, name: Option<&str>) -> EmailMessage {
    let title = "가입을 환영합니다";
    let body = format!(
        "{} Google 계정으로 가입이 완료되었습니다.",
        greeting(name)
    );

    EmailMessage {
        to: to.to_string(),
        subject: format!("[{}] {}", SERVICE_NAME, title),
        html: layout(title, &format!("<p>{}</p>", body)),
        text: format!("{}\n", body),
        kind: Some(NotificationKind::Welcome),
    }
}

pub fn push(
    kind: NotificationKind,
    title: impl Into<String>,
    body: impl Into<String>,
    url: Option<String>,
    now: DateTime<Utc>,
) -> PushPayload {
    PushPayload {
        title: title.into(),
        body: body.into(),
        kind,
        url,
        timestamp: now.timestamp_millis(),
    }
}

pub fn account_locked_push(lockout_minutes: i64, now: DateTime<Utc>) -> PushPayload {
    push(
        NotificationKind::AccountLocked,
        "계정 잠금",
        format!("로그인 실패가 반복되어 {}분 동안 잠겼습니다", lockout_minutes),
        None,
        now,
    )
}

pub fn security_alert_push(now: DateTime<Utc>) -> PushPayload {
    push(
        NotificationKind::SecurityAlert,
        "새 로그인",
        "계정에 새로운 로그인이 감지되었습니다",
        None,
        now,
    )
}

pub fn password_changed_push(now: DateTime<Utc>) -> PushPayload {
    push(
        NotificationKind::PasswordChanged,
        "비밀번호 변경",
        "비밀번호가 변경되었습니다. 본인이 아니라면 관리자에게 문의하세요",
        None,
        now,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activation_link_points_to_backend() {
        let link = activation_link("http://localhost:8080/", "a.b.c");
        assert_eq!(link, "http://localhost:8080/auth/activate-account?token=a.b.c");
    }

    #[test]
    fn test_reset_link_points_to_frontend() {
        let link = reset_link("http://localhost:3000", "a.b.c");
        assert_eq!(link, "http://localhost:3000/reset-password?token=a.b.c");
    }

    #[test]
    fn test_activation_email_contains_link() {
        let link = activation_link("http://api", "tok");
        let message = activation_email("kim@example.com", Some("김철수"), &link, 24);

        assert_eq!(message.to, "kim@example.com");
        assert_eq!(message.kind, Some(NotificationKind::Activation));
        assert!(message.text.contains(&link));
        assert!(message.html.contains(&link));
        assert!(message.text.contains("김철수"));
    }

    #[test]
    fn test_push_payload_serializes_type() {
        let payload = security_alert_push(Utc::now());
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "security_alert");
        assert!(json.get("url").is_none());
    }
}
