use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A named grouping entity owned by a user, to which items may belong.
///
/// The owner id is captured as a plain string at creation time; the service
/// layer is the sole enforcer of ownership isolation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TaskTemplate {
    pub id: Uuid,
    pub name: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskTemplate {
    pub fn new(name: String, user_id: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating a template. Names are 1-255 characters; there is no
/// uniqueness constraint on them.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTemplateRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// Input for updating a template. An omitted name means "leave unchanged";
/// the operation is then a no-op returning the current row.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTemplateRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
}

/// Client-facing view of a template; the owner id is implicit in the session.
#[derive(Debug, Serialize, Deserialize)]
pub struct TemplateResponse {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&TaskTemplate> for TemplateResponse {
    fn from(template: &TaskTemplate) -> Self {
        Self {
            id: template.id,
            name: template.name.clone(),
            created_at: template.created_at,
            updated_at: template.updated_at,
        }
    }
}

/// One page of templates plus the total count for the owner.
#[derive(Debug, Serialize, Deserialize)]
pub struct TemplatesListResponse {
    pub templates: Vec<TemplateResponse>,
    pub total: i64,
    pub skip: i64,
    pub limit: i64,
}

/// Outcome of a template deletion, reporting how many items went with it.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteTemplateResponse {
    pub message: String,
    pub deleted_items_count: u64,
}

/// Pagination query for template listings.
#[derive(Debug, Deserialize, Validate)]
pub struct TemplatePageQuery {
    #[validate(range(min = 0))]
    pub skip: Option<i64>,
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<i64>,
}
