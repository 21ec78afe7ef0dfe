//!
//! # Persistence Gateway
//!
//! The [`Store`] trait abstracts per-user lookup/create/update/delete for the
//! three entity kinds (users, task templates, task items). Services depend on
//! `Arc<dyn Store>` and never on a concrete database, which keeps the
//! ownership and cascade rules in the service layer where they belong.
//!
//! Two implementations exist: [`postgres::PgStore`] backed by sqlx/Postgres,
//! and [`memory::MemStore`], an in-process map used by the test suites and
//! handy for running the API without a database.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{TaskItem, TaskTemplate, User};

pub use memory::MemStore;
pub use postgres::PgStore;

/// Failures the gateway can report.
///
/// Only one is meaningful to callers: a duplicate email on user insert, the
/// storage-level backstop for concurrent registrations that both passed the
/// service's existence check. Everything else is an opaque database fault.
#[derive(Debug)]
pub enum StoreError {
    DuplicateEmail,
    Database(String),
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::DuplicateEmail => AppError::EmailAlreadyExists,
            StoreError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> StoreError {
        StoreError::Database(error.to_string())
    }
}

/// One page of rows together with the total matching count.
#[derive(Debug)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub total: i64,
}

/// Gateway contract consumed by the auth and task services.
///
/// Filters are fixed per method rather than passed as generic maps; each
/// method corresponds to one equality filter the services actually use.
/// `save_*` methods are whole-row saves keyed by id.
#[async_trait]
pub trait Store: Send + Sync {
    // -- users -----------------------------------------------------------

    /// Inserts a new user. Reports [`StoreError::DuplicateEmail`] when the
    /// unique email constraint rejects the row.
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;
    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn user_by_verification_token(&self, token: &str)
        -> Result<Option<User>, StoreError>;
    async fn user_by_reset_token(&self, token: &str) -> Result<Option<User>, StoreError>;
    async fn save_user(&self, user: &User) -> Result<(), StoreError>;

    // -- task templates --------------------------------------------------

    async fn insert_template(&self, template: &TaskTemplate) -> Result<(), StoreError>;
    async fn template_by_id(&self, id: Uuid) -> Result<Option<TaskTemplate>, StoreError>;
    /// Lists an owner's templates in creation order with the owner's total.
    async fn templates_by_owner(
        &self,
        owner: &str,
        skip: i64,
        limit: i64,
    ) -> Result<Page<TaskTemplate>, StoreError>;
    async fn save_template(&self, template: &TaskTemplate) -> Result<(), StoreError>;
    /// Deletes a template together with every item of the same owner that
    /// references it, in a single atomic unit. Returns the number of items
    /// deleted alongside the template.
    async fn delete_template_and_items(
        &self,
        template_id: Uuid,
        owner: &str,
    ) -> Result<u64, StoreError>;

    // -- task items ------------------------------------------------------

    async fn insert_item(&self, item: &TaskItem) -> Result<(), StoreError>;
    async fn item_by_id(&self, id: Uuid) -> Result<Option<TaskItem>, StoreError>;
    /// Lists an owner's items in creation order, optionally narrowed to one
    /// template, with the matching total.
    async fn items_by_owner(
        &self,
        owner: &str,
        template_id: Option<Uuid>,
        skip: i64,
        limit: i64,
    ) -> Result<Page<TaskItem>, StoreError>;
    async fn save_item(&self, item: &TaskItem) -> Result<(), StoreError>;
    async fn delete_item(&self, id: Uuid) -> Result<(), StoreError>;
}
