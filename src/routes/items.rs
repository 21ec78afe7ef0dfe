use crate::{
    auth::AuthenticatedClaims,
    error::AppError,
    models::{CreateItemRequest, ItemPageQuery, UpdateItemRequest},
    services::{AuthService, ItemService},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// List the caller's items, optionally narrowed to one template.
#[get("")]
pub async fn list_items(
    auth: web::Data<AuthService>,
    service: web::Data<ItemService>,
    claims: AuthenticatedClaims,
    query: web::Query<ItemPageQuery>,
) -> Result<impl Responder, AppError> {
    query.validate()?;
    let user = auth.current_verified_user(&claims.0).await?;
    let response = service
        .list(
            &user.id.to_string(),
            query.template_id.as_deref(),
            query.skip,
            query.limit,
        )
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Create an item, optionally attached to one of the caller's templates.
#[post("")]
pub async fn create_item(
    auth: web::Data<AuthService>,
    service: web::Data<ItemService>,
    claims: AuthenticatedClaims,
    payload: web::Json<CreateItemRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;
    let user = auth.current_verified_user(&claims.0).await?;
    let response = service
        .create(&user.id.to_string(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(response))
}

/// Fetch one item; missing and foreign items read identically as 404.
#[get("/{id}")]
pub async fn get_item(
    auth: web::Data<AuthService>,
    service: web::Data<ItemService>,
    claims: AuthenticatedClaims,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let user = auth.current_verified_user(&claims.0).await?;
    let response = service.get(&user.id.to_string(), &id).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Update an item. The `template_id` field is tri-state: omitted leaves the
/// association unchanged, an empty string clears it, a value reassigns it.
#[put("/{id}")]
pub async fn update_item(
    auth: web::Data<AuthService>,
    service: web::Data<ItemService>,
    claims: AuthenticatedClaims,
    id: web::Path<String>,
    payload: web::Json<UpdateItemRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;
    let user = auth.current_verified_user(&claims.0).await?;
    let response = service
        .update(&user.id.to_string(), &id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Delete an item.
#[delete("/{id}")]
pub async fn delete_item(
    auth: web::Data<AuthService>,
    service: web::Data<ItemService>,
    claims: AuthenticatedClaims,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let user = auth.current_verified_user(&claims.0).await?;
    service.delete(&user.id.to_string(), &id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Task item deleted successfully"
    })))
}
