use crate::{
    auth::{
        AuthenticatedClaims, ForgotPasswordRequest, LoginRequest, RegisterRequest,
        ResetPasswordRequest, VerifyEmailRequest,
    },
    error::AppError,
    models::UserProfile,
    services::AuthService,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Creates a pending-verification account and emails a verification link.
/// Never returns an access token; the email has not been proven yet.
#[post("/register")]
pub async fn register(
    service: web::Data<AuthService>,
    payload: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;
    let response = service.register(&payload.email, &payload.password).await?;
    Ok(HttpResponse::Created().json(response))
}

/// Verify email address
///
/// Consumes the emailed token and returns an access token on success.
#[post("/verify-email")]
pub async fn verify_email(
    service: web::Data<AuthService>,
    payload: web::Json<VerifyEmailRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;
    let response = service.verify_email(&payload.token).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Login user
///
/// Authenticates a verified, active account and returns an access token.
#[post("/login")]
pub async fn login(
    service: web::Data<AuthService>,
    payload: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;
    let response = service.login(&payload.email, &payload.password).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Request a password reset email
///
/// Responds with the same generic message whether or not the email exists.
#[post("/forgot-password")]
pub async fn forgot_password(
    service: web::Data<AuthService>,
    payload: web::Json<ForgotPasswordRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;
    let response = service.forgot_password(&payload.email).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Reset password with an emailed token
#[post("/reset-password")]
pub async fn reset_password(
    service: web::Data<AuthService>,
    payload: web::Json<ResetPasswordRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;
    let response = service
        .reset_password(&payload.token, &payload.new_password)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Current user profile
///
/// Requires a valid bearer token for an active, verified account.
#[get("/me")]
pub async fn me(
    service: web::Data<AuthService>,
    claims: AuthenticatedClaims,
) -> Result<impl Responder, AppError> {
    let user = service.current_verified_user(&claims.0).await?;
    Ok(HttpResponse::Ok().json(UserProfile::from(&user)))
}
