use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

/// A unit of work owned by a user, optionally associated with one template.
///
/// If `template_id` is set it must reference a template owned by the same
/// user; the rule is enforced at create/update time, not by the store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TaskItem {
    pub id: Uuid,
    pub name: String,
    pub user_id: String,
    pub template_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskItem {
    pub fn new(name: String, user_id: String, template_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            user_id,
            template_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The three-way meaning of a `template_id` field in a request payload:
/// absent means leave unchanged, an empty string means clear the association,
/// anything else must parse as an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateRef {
    Unchanged,
    Clear,
    Assign(Uuid),
}

impl TemplateRef {
    /// Classifies a raw `template_id` field. A malformed id is reported as a
    /// missing template directly: no template can exist under a
    /// non-parseable id, and the parse step is where that is decided.
    pub fn from_field(raw: Option<&str>) -> Result<Self, AppError> {
        match raw {
            None => Ok(TemplateRef::Unchanged),
            Some("") => Ok(TemplateRef::Clear),
            Some(s) => Uuid::parse_str(s)
                .map(TemplateRef::Assign)
                .map_err(|_| AppError::TemplateRefNotFound),
        }
    }
}

/// Input for creating an item. The template reference is optional; both an
/// absent field and an empty string mean "no template".
#[derive(Debug, Deserialize, Validate)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub template_id: Option<String>,
}

/// Input for updating an item. `template_id` carries the full tri-state
/// semantics of [`TemplateRef`].
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateItemRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub template_id: Option<String>,
}

/// Client-facing view of an item.
#[derive(Debug, Serialize, Deserialize)]
pub struct ItemResponse {
    pub id: Uuid,
    pub name: String,
    pub template_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&TaskItem> for ItemResponse {
    fn from(item: &TaskItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            template_id: item.template_id,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

/// One page of items plus the total count for the owner (and template
/// filter, when one was given).
#[derive(Debug, Serialize, Deserialize)]
pub struct ItemsListResponse {
    pub items: Vec<ItemResponse>,
    pub total: i64,
    pub limit: i64,
    pub skip: i64,
}

/// Pagination and filter query for item listings.
#[derive(Debug, Deserialize, Validate)]
pub struct ItemPageQuery {
    pub template_id: Option<String>,
    #[validate(range(min = 0))]
    pub skip: Option<i64>,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<i64>,
}
