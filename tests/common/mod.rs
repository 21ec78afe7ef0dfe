//! Common test utilities for integration tests.
//!
//! Provides a [`TestContext`] wiring the real services against the in-memory
//! store and a recording mailer, plus small request helpers so each test
//! reads as the flow it exercises. Every test assembles the same app shape as
//! `main.rs`: public `/health`, everything else under `/api` behind
//! `AuthMiddleware`.

#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, App, Error};
use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex};

use tasknest::auth::AuthMiddleware;
use tasknest::config::Config;
use tasknest::email::Mailer;
use tasknest::routes;
use tasknest::services::{AuthService, ItemService, TemplateService};
use tasknest::store::MemStore;

pub const JWT_SECRET: &str = "integration-test-secret";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailKind {
    Verification,
    PasswordReset,
    Welcome,
}

#[derive(Debug, Clone)]
pub struct SentMail {
    pub kind: MailKind,
    pub to: String,
    pub token: Option<String>,
}

/// Mailer that records every send instead of talking SMTP, so tests can read
/// the verification and reset tokens the way a user would from their inbox.
pub struct RecordingMailer {
    pub sent: Mutex<Vec<SentMail>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn last_token_for(&self, to: &str, kind: MailKind) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|m| m.to == to && m.kind == kind)
            .and_then(|m| m.token.clone())
    }

    fn record(&self, kind: MailKind, to: &str, token: Option<&str>) -> bool {
        self.sent.lock().unwrap().push(SentMail {
            kind,
            to: to.to_string(),
            token: token.map(str::to_string),
        });
        true
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_verification(&self, to_email: &str, token: &str) -> bool {
        self.record(MailKind::Verification, to_email, Some(token))
    }

    async fn send_password_reset(&self, to_email: &str, token: &str) -> bool {
        self.record(MailKind::PasswordReset, to_email, Some(token))
    }

    async fn send_welcome(&self, to_email: &str) -> bool {
        self.record(MailKind::Welcome, to_email, None)
    }
}

fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".into(),
        server_port: 0,
        server_host: "127.0.0.1".into(),
        jwt_secret: JWT_SECRET.into(),
        access_token_expire_minutes: 60,
        bcrypt_cost: 4,
        password_reset_expire_hours: 1,
        smtp_host: "localhost".into(),
        smtp_port: 25,
        smtp_user: String::new(),
        smtp_password: String::new(),
        from_email: "noreply@example.com".into(),
        frontend_url: "http://localhost:3000".into(),
        app_name: "TaskNest API".into(),
    }
}

/// Everything a test needs: the shared services, the store, and the outbox.
pub struct TestContext {
    pub auth: web::Data<AuthService>,
    pub templates: web::Data<TemplateService>,
    pub items: web::Data<ItemService>,
    pub store: Arc<MemStore>,
    pub mailer: Arc<RecordingMailer>,
}

pub fn test_context() -> TestContext {
    let store = Arc::new(MemStore::new());
    let mailer = Arc::new(RecordingMailer::new());
    let config = test_config();

    let auth = web::Data::new(AuthService::new(store.clone(), mailer.clone(), &config));
    let templates = web::Data::new(TemplateService::new(store.clone()));
    let items = web::Data::new(ItemService::new(store.clone()));

    TestContext {
        auth,
        templates,
        items,
        store,
        mailer,
    }
}

/// Assembles the application exactly as `main.rs` does, minus the transport
/// middleware that plays no part in these tests.
pub async fn init_app(
    ctx: &TestContext,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error> {
    test::init_service(
        App::new()
            .app_data(ctx.auth.clone())
            .app_data(ctx.templates.clone())
            .app_data(ctx.items.clone())
            .service(routes::health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware::new(JWT_SECRET))
                    .configure(routes::config),
            ),
    )
    .await
}

/// POSTs a JSON payload, optionally with a bearer token, and returns the
/// status plus parsed body.
pub async fn post_json<S>(
    app: &S,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let mut req = test::TestRequest::post().uri(uri).set_json(&body);
    if let Some(token) = token {
        req = req.append_header(("Authorization", format!("Bearer {}", token)));
    }
    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status();
    let bytes = test::read_body(resp).await;
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

pub async fn put_json<S>(
    app: &S,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let req = test::TestRequest::put()
        .uri(uri)
        .append_header(("Authorization", format!("Bearer {}", token)))
        .set_json(&body)
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let bytes = test::read_body(resp).await;
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

pub async fn get_json<S>(app: &S, uri: &str, token: Option<&str>) -> (StatusCode, serde_json::Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let mut req = test::TestRequest::get().uri(uri);
    if let Some(token) = token {
        req = req.append_header(("Authorization", format!("Bearer {}", token)));
    }
    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status();
    let bytes = test::read_body(resp).await;
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

pub async fn delete_json<S>(app: &S, uri: &str, token: &str) -> (StatusCode, serde_json::Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let req = test::TestRequest::delete()
        .uri(uri)
        .append_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let bytes = test::read_body(resp).await;
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Registers and verifies an account over HTTP, then logs in and returns the
/// access token.
pub async fn register_verify_login<S>(
    app: &S,
    ctx: &TestContext,
    email: &str,
    password: &str,
) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let (status, _) = post_json(
        app,
        "/api/auth/register",
        None,
        json!({ "email": email, "password": password }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "registration failed for {}", email);

    let token = ctx
        .mailer
        .last_token_for(email, MailKind::Verification)
        .expect("verification email was sent");
    let (status, _) = post_json(
        app,
        "/api/auth/verify-email",
        None,
        json!({ "token": token }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "verification failed for {}", email);

    let (status, body) = post_json(
        app,
        "/api/auth/login",
        None,
        json!({ "email": email, "password": password }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed for {}", email);
    body["access_token"]
        .as_str()
        .expect("login returns an access token")
        .to_string()
}
