//! 회원가입, 활성화, 로그인 잠금, 비밀번호 재설정 흐름 통합 테스트

#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use chrono::Duration;
use serde_json::json;

use account_service_backend::domain::models::notification::NotificationKind;
use account_service_backend::repositories::users::UserStore;
use account_service_backend::routes::{configure_routes, login_rate_limit};
use account_service_backend::utils::clock::Clock;
use account_service_backend::utils::string_utils::token_digest;

use common::{bearer, TestContext, PASSWORD};

#[actix_web::test]
async fn test_register_returns_created_and_sends_activation_mail() {
    let t = TestContext::new();
    let app = init_app!(t.ctx);

    let (status, body) = call!(
        app,
        test::TestRequest::post().uri("/auth/register").set_json(json!({
            "email": "Kim@Example.com",
            "password": PASSWORD,
            "name": "Kim",
            "role": "teacher"
        }))
    );

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["message"].as_str().unwrap().contains("이메일"));

    let user = t.user("kim@example.com").await;
    assert!(!user.is_active);
    assert!(user.activation_token.is_some());

    let mails = t.mail.sent_of(NotificationKind::Activation);
    assert_eq!(mails.len(), 1);
    assert_eq!(mails[0].to, "kim@example.com");
    assert!(mails[0].text.contains("/auth/activate-account?token="));
}

#[actix_web::test]
async fn test_register_rejects_weak_password_and_admin_role() {
    let t = TestContext::new();
    let app = init_app!(t.ctx);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({ "email": "kim@example.com", "password": "Weak1!" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, _) = call!(
        app,
        test::TestRequest::post().uri("/auth/register").set_json(json!({
            "email": "kim@example.com",
            "password": PASSWORD,
            "role": "admin"
        }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(t.mail.sent().is_empty());
}

#[actix_web::test]
async fn test_register_duplicate_email_is_bad_request() {
    let t = TestContext::new();
    t.register("kim@example.com", None).await;
    let app = init_app!(t.ctx);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({ "email": "KIM@example.com", "password": PASSWORD }))
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[actix_web::test]
async fn test_register_activation_mail_failure_is_bad_gateway() {
    let t = TestContext::with_failing_mail();
    let app = init_app!(t.ctx);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({ "email": "kim@example.com", "password": PASSWORD }))
    );

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "external_service_error");
    // 계정은 남아 있어 인증 메일 재발송이 가능
    assert!(t.store.find_by_email("kim@example.com").await.unwrap().is_some());
}

#[actix_web::test]
async fn test_malformed_body_is_bad_request_json() {
    let t = TestContext::new();
    let app = init_app!(t.ctx);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/login")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[actix_web::test]
async fn test_activation_link_is_single_use() {
    let t = TestContext::new();
    let token = t.register("kim@example.com", None).await;
    let app = init_app!(t.ctx);

    let uri = format!("/auth/activate-account?token={}", token);
    let (status, body) = call!(app, test::TestRequest::get().uri(&uri));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["isActive"], true);
    assert_eq!(body["user"]["isEmailVerified"], true);

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/verify-token")
            .set_json(json!({ "token": token }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_resend_activation_replaces_previous_token() {
    let t = TestContext::new();
    let first = t.register("kim@example.com", None).await;
    let app = init_app!(t.ctx);

    t.clock.advance(Duration::seconds(2));
    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/resend-activation")
            .set_json(json!({ "email": "kim@example.com" }))
    );
    assert_eq!(status, StatusCode::OK);
    t.settle().await;

    let second = t
        .mail
        .last_token(NotificationKind::Activation, "kim@example.com")
        .unwrap();
    assert_ne!(first, second);

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/verify-token")
            .set_json(json!({ "token": first }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/verify-token")
            .set_json(json!({ "token": second }))
    );
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn test_resend_activation_is_generic_for_unknown_email() {
    let t = TestContext::new();
    let app = init_app!(t.ctx);

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/resend-activation")
            .set_json(json!({ "email": "nobody@example.com" }))
    );
    t.settle().await;

    assert_eq!(status, StatusCode::OK);
    assert!(t.mail.sent().is_empty());
}

#[actix_web::test]
async fn test_login_success_never_exposes_password_hash() {
    let t = TestContext::new();
    let activation = t.register("kim@example.com", None).await;
    t.ctx.auth.verify_activation(&activation).await.unwrap();
    let app = init_app!(t.ctx);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": "kim@example.com", "password": PASSWORD }))
    );

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tokenType"], "Bearer");
    assert!(body["token"].as_str().is_some_and(|s| !s.is_empty()));
    assert!(body["user"].get("passwordHash").is_none());
    assert!(!body.to_string().contains("$2"));

    let user = t.user("kim@example.com").await;
    assert!(user.last_login_at.is_some());

    t.settle().await;
    assert_eq!(t.mail.sent_of(NotificationKind::SecurityAlert).len(), 1);
}

#[actix_web::test]
async fn test_login_inactive_account_is_forbidden() {
    let t = TestContext::new();
    t.register("kim@example.com", None).await;
    let app = init_app!(t.ctx);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": "kim@example.com", "password": PASSWORD }))
    );

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
}

#[actix_web::test]
async fn test_login_unknown_email_is_unauthorized() {
    let t = TestContext::new();
    let app = init_app!(t.ctx);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": "ghost@example.com", "password": PASSWORD }))
    );

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[actix_web::test]
async fn test_five_failures_lock_account_for_fifteen_minutes() {
    let t = TestContext::new();
    t.active_user("kim@example.com", None).await;
    let app = init_app!(t.ctx);

    for _ in 0..5 {
        let (status, _) = call!(
            app,
            test::TestRequest::post()
                .uri("/auth/login")
                .set_json(json!({ "email": "kim@example.com", "password": "Wrong123!" }))
        );
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let user = t.user("kim@example.com").await;
    assert_eq!(user.login_attempts, 5);
    assert!(user.lock_until.is_some());

    // 올바른 비밀번호도 잠금 중에는 거부
    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": "kim@example.com", "password": PASSWORD }))
    );
    assert_eq!(status, StatusCode::LOCKED);
    assert_eq!(body["error"], "account_locked");
    assert_eq!(body["remainingMinutes"], 15);
    assert!(body["lockUntil"].is_string());

    // 잠금 중 시도는 카운트를 늘리지 않음
    assert_eq!(t.user("kim@example.com").await.login_attempts, 5);

    t.settle().await;
    assert_eq!(t.mail.sent_of(NotificationKind::AccountLocked).len(), 1);

    t.clock.advance(Duration::minutes(10));
    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": "kim@example.com", "password": PASSWORD }))
    );
    assert_eq!(status, StatusCode::LOCKED);
    assert_eq!(body["remainingMinutes"], 5);
}

#[actix_web::test]
async fn test_expired_lock_clears_on_next_login() {
    let t = TestContext::new();
    t.active_user("kim@example.com", None).await;
    let app = init_app!(t.ctx);

    for _ in 0..5 {
        call!(
            app,
            test::TestRequest::post()
                .uri("/auth/login")
                .set_json(json!({ "email": "kim@example.com", "password": "Wrong123!" }))
        );
    }

    t.clock.advance(Duration::minutes(16));

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": "kim@example.com", "password": PASSWORD }))
    );
    assert_eq!(status, StatusCode::OK);

    let user = t.user("kim@example.com").await;
    assert_eq!(user.login_attempts, 0);
    assert!(user.lock_until.is_none());
}

#[actix_web::test]
async fn test_failure_after_lock_expiry_restarts_count() {
    let t = TestContext::new();
    t.active_user("kim@example.com", None).await;
    let app = init_app!(t.ctx);

    for _ in 0..5 {
        call!(
            app,
            test::TestRequest::post()
                .uri("/auth/login")
                .set_json(json!({ "email": "kim@example.com", "password": "Wrong123!" }))
        );
    }

    t.clock.advance(Duration::minutes(16));

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": "kim@example.com", "password": "Wrong123!" }))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let user = t.user("kim@example.com").await;
    assert_eq!(user.login_attempts, 1);
    assert!(user.lock_until.is_none());
}

#[actix_web::test]
async fn test_successful_login_resets_failure_count() {
    let t = TestContext::new();
    t.active_user("kim@example.com", None).await;
    let app = init_app!(t.ctx);

    for _ in 0..3 {
        call!(
            app,
            test::TestRequest::post()
                .uri("/auth/login")
                .set_json(json!({ "email": "kim@example.com", "password": "Wrong123!" }))
        );
    }
    assert_eq!(t.user("kim@example.com").await.login_attempts, 3);

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": "kim@example.com", "password": PASSWORD }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(t.user("kim@example.com").await.login_attempts, 0);
}

#[actix_web::test]
async fn test_login_is_rate_limited_per_ip() {
    let t = TestContext::new();
    t.active_user("kim@example.com", None).await;
    let limit = login_rate_limit(&t.ctx.config.rate_limit).unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(t.ctx.clone()))
            .configure(|cfg| configure_routes(cfg, Some(&limit))),
    )
    .await;

    let login = |peer: &str| {
        test::TestRequest::post()
            .uri("/auth/login")
            .peer_addr(peer.parse().unwrap())
            .set_json(json!({ "email": "kim@example.com", "password": PASSWORD }))
    };

    for _ in 0..5 {
        let (status, _) = call!(app, login("203.0.113.7:40000"));
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _) = call!(app, login("203.0.113.7:40001"));
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    // 다른 IP와 다른 인증 라우트는 영향을 받지 않음
    let (status, _) = call!(app, login("198.51.100.2:40000"));
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/forgot-password")
            .peer_addr("203.0.113.7:40000".parse().unwrap())
            .set_json(json!({ "email": "kim@example.com" }))
    );
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn test_refresh_token_issues_new_session() {
    let t = TestContext::new();
    let (user_id, token) = t.active_user("kim@example.com", None).await;
    let app = init_app!(t.ctx);

    t.clock.advance(Duration::hours(1));
    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/refresh-token")
            .set_json(json!({ "token": token }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], user_id.as_str());
    assert_ne!(body["token"].as_str().unwrap(), token);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/refresh-token")
            .set_json(json!({ "token": "garbage" }))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "token_invalid");
}

#[actix_web::test]
async fn test_refresh_rejects_deleted_account() {
    let t = TestContext::new();
    let (user_id, token) = t.active_user("kim@example.com", None).await;
    let app = init_app!(t.ctx);

    let (status, _) = call!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/users/{}", user_id))
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/refresh-token")
            .set_json(json!({ "token": token }))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_refresh_rejects_inactive_account() {
    let t = TestContext::new();
    t.register("kim@example.com", None).await;
    let user = t.user("kim@example.com").await;
    assert!(!user.is_active);
    let session = t.ctx.tokens.issue_session(&user, t.clock.now()).unwrap();
    let app = init_app!(t.ctx);

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/refresh-token")
            .set_json(json!({ "token": session.token }))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
}

#[actix_web::test]
async fn test_refresh_rejects_expired_session_without_grace() {
    let t = TestContext::new();
    let (_, token) = t.active_user("kim@example.com", None).await;
    let app = init_app!(t.ctx);

    t.clock.advance(Duration::hours(168) + Duration::seconds(1));
    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/refresh-token")
            .set_json(json!({ "token": token }))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "token_expired");
}

#[actix_web::test]
async fn test_expired_session_token_is_rejected() {
    let t = TestContext::new();
    let (_, token) = t.active_user("kim@example.com", None).await;
    let app = init_app!(t.ctx);

    t.clock.advance(Duration::hours(169));
    let (status, body) = call!(
        app,
        test::TestRequest::get().uri("/users/me").insert_header(bearer(&token))
    );

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "token_expired");
}

#[actix_web::test]
async fn test_forgot_password_response_is_generic() {
    let t = TestContext::new();
    t.active_user("kim@example.com", None).await;
    let app = init_app!(t.ctx);

    let (known_status, known) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/forgot-password")
            .set_json(json!({ "email": "kim@example.com" }))
    );
    let (unknown_status, unknown) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/forgot-password")
            .set_json(json!({ "email": "ghost@example.com" }))
    );

    assert_eq!(known_status, StatusCode::OK);
    assert_eq!(unknown_status, StatusCode::OK);
    assert_eq!(known, unknown);

    t.settle().await;
    let resets = t.mail.sent_of(NotificationKind::PasswordReset);
    assert_eq!(resets.len(), 1);
    assert_eq!(resets[0].to, "kim@example.com");
}

#[actix_web::test]
async fn test_password_reset_flow() {
    let t = TestContext::new();
    t.active_user("kim@example.com", None).await;
    let app = init_app!(t.ctx);

    call!(
        app,
        test::TestRequest::post()
            .uri("/auth/forgot-password")
            .set_json(json!({ "email": "kim@example.com" }))
    );
    t.settle().await;
    let token = t
        .mail
        .last_token(NotificationKind::PasswordReset, "kim@example.com")
        .unwrap();

    let (status, body) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/verify-reset-token")
            .set_json(json!({ "token": token }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
    assert_eq!(body["email"], "kim@example.com");

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/reset-password")
            .set_json(json!({ "token": token, "newPassword": "Newpass1!" }))
    );
    assert_eq!(status, StatusCode::OK);

    let user = t.user("kim@example.com").await;
    assert!(user.reset_password_token.is_none());
    assert!(user.reset_password_expires.is_none());

    // 재사용 불가
    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/reset-password")
            .set_json(json!({ "token": token, "newPassword": "Another1!" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": "kim@example.com", "password": "Newpass1!" }))
    );
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn test_reset_fails_once_stored_expiry_has_passed() {
    let t = TestContext::new();
    t.active_user("kim@example.com", None).await;
    let app = init_app!(t.ctx);

    call!(
        app,
        test::TestRequest::post()
            .uri("/auth/forgot-password")
            .set_json(json!({ "email": "kim@example.com" }))
    );
    t.settle().await;
    let token = t
        .mail
        .last_token(NotificationKind::PasswordReset, "kim@example.com")
        .unwrap();

    // 서명은 유효하지만 저장된 만료 시각만 지난 상태
    let user = t.user("kim@example.com").await;
    let now = t.clock.now();
    t.store
        .set_reset_token(&user.id, &token_digest(&token), now - Duration::seconds(1), now)
        .await
        .unwrap();

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/reset-password")
            .set_json(json!({ "token": token, "newPassword": "Newpass1!" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_reset_token_expires_after_ttl() {
    let t = TestContext::new();
    t.active_user("kim@example.com", None).await;
    let app = init_app!(t.ctx);

    call!(
        app,
        test::TestRequest::post()
            .uri("/auth/forgot-password")
            .set_json(json!({ "email": "kim@example.com" }))
    );
    t.settle().await;
    let token = t
        .mail
        .last_token(NotificationKind::PasswordReset, "kim@example.com")
        .unwrap();

    t.clock.advance(Duration::minutes(16));

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/verify-reset-token")
            .set_json(json!({ "token": token }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_session_token_cannot_be_used_as_reset_token() {
    let t = TestContext::new();
    let (_, session) = t.active_user("kim@example.com", None).await;
    let app = init_app!(t.ctx);

    let (status, _) = call!(
        app,
        test::TestRequest::post()
            .uri("/auth/reset-password")
            .set_json(json!({ "token": session, "newPassword": "Newpass1!" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
