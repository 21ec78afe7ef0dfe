//! End-to-end coverage of the authentication lifecycle over HTTP:
//! registration, email verification, login, session resolution, and the
//! password-reset flow, including the deliberately uninformative error
//! behavior around tokens and credentials.

mod common;

use actix_web::http::StatusCode;
use chrono::{Duration, Utc};
use common::{
    delete_json, get_json, init_app, post_json, register_verify_login, test_context, MailKind,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tasknest::store::Store;

const EMAIL: &str = "integration@example.com";
const PASSWORD: &str = "Password123";

#[actix_rt::test]
async fn test_register_verify_login_flow() {
    let ctx = test_context();
    let app = init_app(&ctx).await;

    // Register a new user
    let (status, body) = post_json(
        &app,
        "/api/auth/register",
        None,
        json!({ "email": EMAIL, "password": PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["user_id"].is_string());
    assert!(
        body.get("access_token").is_none(),
        "registration must not log the user in"
    );

    // Registering the same email again conflicts
    let (status, body) = post_json(
        &app,
        "/api/auth/register",
        None,
        json!({ "email": EMAIL, "password": PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "EMAIL_ALREADY_EXISTS");

    // Login is gated until the email is verified
    let (status, body) = post_json(
        &app,
        "/api/auth/login",
        None,
        json!({ "email": EMAIL, "password": PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "EMAIL_NOT_VERIFIED");

    // Verify with the emailed token
    let token = ctx
        .mailer
        .last_token_for(EMAIL, MailKind::Verification)
        .expect("verification email was sent");
    let (status, body) = post_json(
        &app,
        "/api/auth/verify-email",
        None,
        json!({ "token": token }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    let verify_token_grant = body["access_token"].as_str().unwrap().to_string();

    // The verification token is single-use
    let (status, body) = post_json(
        &app,
        "/api/auth/verify-email",
        None,
        json!({ "token": token }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");

    // Login now succeeds and the token resolves back to the same account
    let (status, body) = post_json(
        &app,
        "/api/auth/login",
        None,
        json!({ "email": EMAIL, "password": PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let access_token = body["access_token"].as_str().unwrap().to_string();

    let (status, profile) = get_json(&app, "/api/auth/me", Some(&access_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["email"], EMAIL);
    assert_eq!(profile["is_verified"], true);
    assert!(profile.get("password_hash").is_none());

    // The token issued at verification time works the same way
    let (status, profile) = get_json(&app, "/api/auth/me", Some(&verify_token_grant)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["email"], EMAIL);
}

#[actix_rt::test]
async fn test_register_rejects_weak_passwords() {
    let ctx = test_context();
    let app = init_app(&ctx).await;

    let cases = vec![
        ("weak", "Password must be at least 8 characters long"),
        ("abcd1234", "Password must contain at least one uppercase letter"),
        ("ABCD1234", "Password must contain at least one lowercase letter"),
        ("Abcdefgh", "Password must contain at least one digit"),
    ];

    for (password, message) in cases {
        let (status, body) = post_json(
            &app,
            "/api/auth/register",
            None,
            json!({ "email": EMAIL, "password": password }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "password {:?}", password);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], message);
    }

    // A conforming password is accepted
    let (status, _) = post_json(
        &app,
        "/api/auth/register",
        None,
        json!({ "email": EMAIL, "password": "Abcd1234" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[actix_rt::test]
async fn test_invalid_payloads() {
    let ctx = test_context();
    let app = init_app(&ctx).await;

    // Missing fields fail deserialization
    let (status, _) = post_json(
        &app,
        "/api/auth/register",
        None,
        json!({ "email": EMAIL }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A malformed email fails payload validation
    let (status, _) = post_json(
        &app,
        "/api/auth/register",
        None,
        json!({ "email": "not-an-email", "password": PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = post_json(
        &app,
        "/api/auth/login",
        None,
        json!({ "email": "not-an-email", "password": PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_rt::test]
async fn test_login_failures_are_indistinguishable() {
    let ctx = test_context();
    let app = init_app(&ctx).await;
    register_verify_login(&app, &ctx, EMAIL, PASSWORD).await;

    let (wrong_status, wrong_body) = post_json(
        &app,
        "/api/auth/login",
        None,
        json!({ "email": EMAIL, "password": "Wrong1234" }),
    )
    .await;
    let (ghost_status, ghost_body) = post_json(
        &app,
        "/api/auth/login",
        None,
        json!({ "email": "ghost@example.com", "password": PASSWORD }),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(ghost_status, StatusCode::UNAUTHORIZED);
    // Identical bodies: the response must not leak which part was wrong.
    assert_eq!(wrong_body, ghost_body);
}

#[actix_rt::test]
async fn test_protected_routes_require_bearer_token() {
    let ctx = test_context();
    let app = init_app(&ctx).await;

    let (status, body) = get_json(&app, "/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "MISSING_TOKEN");

    let (status, body) = get_json(&app, "/api/auth/me", Some("garbage-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");

    let (status, _) = get_json(&app, "/api/templates", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Health stays public
    let (status, body) = get_json(&app, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[actix_rt::test]
async fn test_forgot_password_does_not_reveal_accounts() {
    let ctx = test_context();
    let app = init_app(&ctx).await;
    register_verify_login(&app, &ctx, EMAIL, PASSWORD).await;

    let (known_status, known_body) = post_json(
        &app,
        "/api/auth/forgot-password",
        None,
        json!({ "email": EMAIL }),
    )
    .await;
    let (ghost_status, ghost_body) = post_json(
        &app,
        "/api/auth/forgot-password",
        None,
        json!({ "email": "ghost@example.com" }),
    )
    .await;

    assert_eq!(known_status, StatusCode::OK);
    assert_eq!(ghost_status, StatusCode::OK);
    // Byte-identical responses regardless of whether the account exists.
    assert_eq!(known_body, ghost_body);

    // But only the real account received a reset email.
    assert!(ctx
        .mailer
        .last_token_for(EMAIL, MailKind::PasswordReset)
        .is_some());
    assert!(ctx
        .mailer
        .last_token_for("ghost@example.com", MailKind::PasswordReset)
        .is_none());
}

#[actix_rt::test]
async fn test_password_reset_flow() {
    let ctx = test_context();
    let app = init_app(&ctx).await;
    register_verify_login(&app, &ctx, EMAIL, PASSWORD).await;

    post_json(
        &app,
        "/api/auth/forgot-password",
        None,
        json!({ "email": EMAIL }),
    )
    .await;
    let reset_token = ctx
        .mailer
        .last_token_for(EMAIL, MailKind::PasswordReset)
        .unwrap();

    // The replacement password still has to pass the strength rules
    let (status, body) = post_json(
        &app,
        "/api/auth/reset-password",
        None,
        json!({ "token": reset_token, "new_password": "weak" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, body) = post_json(
        &app,
        "/api/auth/reset-password",
        None,
        json!({ "token": reset_token, "new_password": "Fresh1234" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        body.get("access_token").is_none(),
        "reset must not log the user in"
    );

    // Old password is dead, new one works
    let (status, _) = post_json(
        &app,
        "/api/auth/login",
        None,
        json!({ "email": EMAIL, "password": PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = post_json(
        &app,
        "/api/auth/login",
        None,
        json!({ "email": EMAIL, "password": "Fresh1234" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The reset token was consumed
    let (status, body) = post_json(
        &app,
        "/api/auth/reset-password",
        None,
        json!({ "token": reset_token, "new_password": "Again1234" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[actix_rt::test]
async fn test_expired_reset_token_reads_like_unknown_token() {
    let ctx = test_context();
    let app = init_app(&ctx).await;
    register_verify_login(&app, &ctx, EMAIL, PASSWORD).await;

    post_json(
        &app,
        "/api/auth/forgot-password",
        None,
        json!({ "email": EMAIL }),
    )
    .await;

    // Age the token past its expiry directly in the store.
    let mut user = ctx.store.user_by_email(EMAIL).await.unwrap().unwrap();
    user.password_reset_expires = Some(Utc::now() - Duration::hours(2));
    ctx.store.save_user(&user).await.unwrap();
    let reset_token = user.password_reset_token.unwrap();

    let (expired_status, expired_body) = post_json(
        &app,
        "/api/auth/reset-password",
        None,
        json!({ "token": reset_token, "new_password": "Fresh1234" }),
    )
    .await;
    let (unknown_status, unknown_body) = post_json(
        &app,
        "/api/auth/reset-password",
        None,
        json!({ "token": "no-such-token", "new_password": "Fresh1234" }),
    )
    .await;

    assert_eq!(expired_status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown_status, StatusCode::BAD_REQUEST);
    assert_eq!(expired_body, unknown_body);
}

#[actix_rt::test]
async fn test_disabled_account_cannot_login_or_use_sessions() {
    let ctx = test_context();
    let app = init_app(&ctx).await;
    let access_token = register_verify_login(&app, &ctx, EMAIL, PASSWORD).await;

    let mut user = ctx.store.user_by_email(EMAIL).await.unwrap().unwrap();
    user.is_active = false;
    ctx.store.save_user(&user).await.unwrap();

    let (status, body) = post_json(
        &app,
        "/api/auth/login",
        None,
        json!({ "email": EMAIL, "password": PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "ACCOUNT_DISABLED");

    // An already-issued token stops resolving too.
    let (status, _) = get_json(&app, "/api/auth/me", Some(&access_token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Deactivated accounts are not eligible for password resets either.
    let (status, _) = post_json(
        &app,
        "/api/auth/forgot-password",
        None,
        json!({ "email": EMAIL }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let user = ctx.store.user_by_email(EMAIL).await.unwrap().unwrap();
    assert!(user.password_reset_token.is_none());
}

#[actix_rt::test]
async fn test_delete_endpoints_require_auth_too() {
    let ctx = test_context();
    let app = init_app(&ctx).await;
    let token = register_verify_login(&app, &ctx, EMAIL, PASSWORD).await;

    // Deleting an item that does not exist is a 404, not an auth failure.
    let (status, body) = delete_json(
        &app,
        "/api/items/00000000-0000-0000-0000-000000000000",
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "ITEM_NOT_FOUND");
}
