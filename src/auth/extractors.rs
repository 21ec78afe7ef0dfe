use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::token::Claims;
use crate::error::AppError;

/// Extracts the verified token claims from request extensions.
///
/// Intended for routes protected by `AuthMiddleware`, which validates the JWT
/// and inserts the decoded claims. If the claims are absent the request never
/// went through the middleware, so the safe answer is an auth failure.
#[derive(Debug, Clone)]
pub struct AuthenticatedClaims(pub Claims);

impl FromRequest for AuthenticatedClaims {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>().cloned() {
            Some(claims) => ready(Ok(AuthenticatedClaims(claims))),
            None => ready(Err(AppError::TokenError.into())),
        }
    }
}
