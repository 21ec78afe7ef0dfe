use crate::{
    auth::AuthenticatedClaims,
    error::AppError,
    models::{CreateTemplateRequest, TemplatePageQuery, UpdateTemplateRequest},
    services::{AuthService, TemplateService},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use validator::Validate;

/// List the caller's templates with pagination metadata.
#[get("")]
pub async fn list_templates(
    auth: web::Data<AuthService>,
    service: web::Data<TemplateService>,
    claims: AuthenticatedClaims,
    query: web::Query<TemplatePageQuery>,
) -> Result<impl Responder, AppError> {
    query.validate()?;
    let user = auth.current_verified_user(&claims.0).await?;
    let response = service
        .list(&user.id.to_string(), query.skip, query.limit)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Create a template owned by the caller.
#[post("")]
pub async fn create_template(
    auth: web::Data<AuthService>,
    service: web::Data<TemplateService>,
    claims: AuthenticatedClaims,
    payload: web::Json<CreateTemplateRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;
    let user = auth.current_verified_user(&claims.0).await?;
    let response = service
        .create(&user.id.to_string(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(response))
}

/// Fetch one template; missing and foreign templates read identically as 404.
#[get("/{id}")]
pub async fn get_template(
    auth: web::Data<AuthService>,
    service: web::Data<TemplateService>,
    claims: AuthenticatedClaims,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let user = auth.current_verified_user(&claims.0).await?;
    let response = service.get(&user.id.to_string(), &id).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Rename a template. An empty payload returns the current row unchanged.
#[put("/{id}")]
pub async fn update_template(
    auth: web::Data<AuthService>,
    service: web::Data<TemplateService>,
    claims: AuthenticatedClaims,
    id: web::Path<String>,
    payload: web::Json<UpdateTemplateRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;
    let user = auth.current_verified_user(&claims.0).await?;
    let response = service
        .update(&user.id.to_string(), &id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Delete a template and every item of the caller that references it,
/// reporting how many items were removed.
#[delete("/{id}")]
pub async fn delete_template(
    auth: web::Data<AuthService>,
    service: web::Data<TemplateService>,
    claims: AuthenticatedClaims,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let user = auth.current_verified_user(&claims.0).await?;
    let response = service.delete(&user.id.to_string(), &id).await?;
    Ok(HttpResponse::Ok().json(response))
}
