use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    CreateItemRequest, ItemResponse, ItemsListResponse, TaskItem, TemplateRef, UpdateItemRequest,
};
use crate::store::Store;

const DEFAULT_PAGE_SIZE: i64 = 50;

/// CRUD over task items, scoped to the calling user.
///
/// An item may reference one template; the reference must resolve to a
/// template owned by the same user at the moment it is written. A bad
/// reference faults the input (400), unlike a missing item (404).
pub struct ItemService {
    store: Arc<dyn Store>,
}

impl ItemService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    async fn owned_item(&self, owner: &str, id_raw: &str) -> Result<TaskItem, AppError> {
        let id = Uuid::parse_str(id_raw).map_err(|_| AppError::ItemNotFound)?;
        match self.store.item_by_id(id).await? {
            Some(item) if item.user_id == owner => Ok(item),
            _ => Err(AppError::ItemNotFound),
        }
    }

    /// Write-time referential check: the template must exist and belong to
    /// the caller.
    async fn assert_owned_template(&self, owner: &str, id: Uuid) -> Result<(), AppError> {
        match self.store.template_by_id(id).await? {
            Some(template) if template.user_id == owner => Ok(()),
            _ => Err(AppError::TemplateRefNotFound),
        }
    }

    /// Parses an optional template filter from a query string, applying the
    /// same existence+ownership rule as writes. An empty value means "no
    /// filter", matching the payload convention that empty means absent.
    async fn parse_template_filter(
        &self,
        owner: &str,
        raw: Option<&str>,
    ) -> Result<Option<Uuid>, AppError> {
        match raw {
            None | Some("") => Ok(None),
            Some(s) => {
                let id = Uuid::parse_str(s).map_err(|_| AppError::TemplateRefNotFound)?;
                self.assert_owned_template(owner, id).await?;
                Ok(Some(id))
            }
        }
    }

    pub async fn create(
        &self,
        owner: &str,
        request: CreateItemRequest,
    ) -> Result<ItemResponse, AppError> {
        let template_id = match TemplateRef::from_field(request.template_id.as_deref())? {
            TemplateRef::Unchanged | TemplateRef::Clear => None,
            TemplateRef::Assign(id) => {
                self.assert_owned_template(owner, id).await?;
                Some(id)
            }
        };

        let item = TaskItem::new(request.name, owner.to_string(), template_id);
        self.store.insert_item(&item).await?;
        Ok(ItemResponse::from(&item))
    }

    pub async fn list(
        &self,
        owner: &str,
        template_id: Option<&str>,
        skip: Option<i64>,
        limit: Option<i64>,
    ) -> Result<ItemsListResponse, AppError> {
        let filter = self.parse_template_filter(owner, template_id).await?;
        let skip = skip.unwrap_or(0);
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE);

        let page = self.store.items_by_owner(owner, filter, skip, limit).await?;
        Ok(ItemsListResponse {
            items: page.rows.iter().map(ItemResponse::from).collect(),
            total: page.total,
            limit,
            skip,
        })
    }

    pub async fn get(&self, owner: &str, id_raw: &str) -> Result<ItemResponse, AppError> {
        let item = self.owned_item(owner, id_raw).await?;
        Ok(ItemResponse::from(&item))
    }

    /// Applies the provided fields. `template_id` is tri-state: absent leaves
    /// the association alone, empty clears it, a value reassigns it after
    /// validation. `updated_at` is bumped only when some field was provided.
    pub async fn update(
        &self,
        owner: &str,
        id_raw: &str,
        request: UpdateItemRequest,
    ) -> Result<ItemResponse, AppError> {
        let mut item = self.owned_item(owner, id_raw).await?;

        let template_ref = TemplateRef::from_field(request.template_id.as_deref())?;
        if let TemplateRef::Assign(id) = template_ref {
            self.assert_owned_template(owner, id).await?;
        }

        let mut changed = false;
        if let Some(name) = request.name {
            item.name = name;
            changed = true;
        }
        match template_ref {
            TemplateRef::Unchanged => {}
            TemplateRef::Clear => {
                item.template_id = None;
                changed = true;
            }
            TemplateRef::Assign(id) => {
                item.template_id = Some(id);
                changed = true;
            }
        }

        if changed {
            item.updated_at = Utc::now();
            self.store.save_item(&item).await?;
        }

        Ok(ItemResponse::from(&item))
    }

    pub async fn delete(&self, owner: &str, id_raw: &str) -> Result<(), AppError> {
        let item = self.owned_item(owner, id_raw).await?;
        self.store.delete_item(item.id).await?;
        log::info!("Deleted item {} for user {}", item.id, owner);
        Ok(())
    }
}
