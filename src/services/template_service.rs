use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    CreateTemplateRequest, DeleteTemplateResponse, TaskTemplate, TemplateResponse,
    TemplatesListResponse, UpdateTemplateRequest,
};
use crate::store::Store;

const DEFAULT_PAGE_SIZE: i64 = 100;

/// CRUD over task templates, scoped to the calling user.
///
/// A template that is missing and a template owned by someone else are the
/// same thing as far as any caller can observe.
pub struct TemplateService {
    store: Arc<dyn Store>,
}

impl TemplateService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Resolves an id string to a template owned by `owner`.
    ///
    /// A malformed id cannot name any template, so the parse step classifies
    /// it as not-found directly.
    async fn owned_template(&self, owner: &str, id_raw: &str) -> Result<TaskTemplate, AppError> {
        let id = Uuid::parse_str(id_raw).map_err(|_| AppError::TemplateNotFound)?;
        match self.store.template_by_id(id).await? {
            Some(template) if template.user_id == owner => Ok(template),
            _ => Err(AppError::TemplateNotFound),
        }
    }

    pub async fn create(
        &self,
        owner: &str,
        request: CreateTemplateRequest,
    ) -> Result<TemplateResponse, AppError> {
        let template = TaskTemplate::new(request.name, owner.to_string());
        self.store.insert_template(&template).await?;
        Ok(TemplateResponse::from(&template))
    }

    pub async fn list(
        &self,
        owner: &str,
        skip: Option<i64>,
        limit: Option<i64>,
    ) -> Result<TemplatesListResponse, AppError> {
        let skip = skip.unwrap_or(0);
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE);
        let page = self.store.templates_by_owner(owner, skip, limit).await?;
        Ok(TemplatesListResponse {
            templates: page.rows.iter().map(TemplateResponse::from).collect(),
            total: page.total,
            skip,
            limit,
        })
    }

    pub async fn get(&self, owner: &str, id_raw: &str) -> Result<TemplateResponse, AppError> {
        let template = self.owned_template(owner, id_raw).await?;
        Ok(TemplateResponse::from(&template))
    }

    /// Renames a template. With no name provided the call is a no-op that
    /// returns the current row without touching `updated_at`.
    pub async fn update(
        &self,
        owner: &str,
        id_raw: &str,
        request: UpdateTemplateRequest,
    ) -> Result<TemplateResponse, AppError> {
        let mut template = self.owned_template(owner, id_raw).await?;

        if let Some(name) = request.name {
            template.name = name;
            template.updated_at = Utc::now();
            self.store.save_template(&template).await?;
        }

        Ok(TemplateResponse::from(&template))
    }

    /// Deletes a template and every item of the same owner referencing it,
    /// reporting how many items went with it.
    pub async fn delete(
        &self,
        owner: &str,
        id_raw: &str,
    ) -> Result<DeleteTemplateResponse, AppError> {
        let template = self.owned_template(owner, id_raw).await?;

        let deleted_items_count = self
            .store
            .delete_template_and_items(template.id, owner)
            .await?;

        log::info!(
            "Deleted template {} and {} associated items for user {}",
            template.id,
            deleted_items_count,
            owner
        );

        Ok(DeleteTemplateResponse {
            message: "Template deleted successfully".into(),
            deleted_items_count,
        })
    }
}
