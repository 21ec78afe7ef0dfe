use async_trait::async_trait;
use sqlx::postgres::PgPool;
use uuid::Uuid;

use crate::models::{TaskItem, TaskTemplate, User};
use crate::store::{Page, Store, StoreError};

const USER_COLUMNS: &str = "id, email, password_hash, is_active, is_verified, created_at, \
     updated_at, email_verification_token, password_reset_token, password_reset_expires";
const TEMPLATE_COLUMNS: &str = "id, name, user_id, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, name, user_id, template_id, created_at, updated_at";

/// sqlx/Postgres implementation of the persistence gateway.
///
/// The unique index on `users.email` (see `migrations/`) is the storage-level
/// backstop for concurrent registrations; its violation is translated to
/// [`StoreError::DuplicateEmail`] here and nowhere else.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects to the database and applies any pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPool::connect(database_url).await?;
        sqlx::migrate!().run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let result = sqlx::query(
            "INSERT INTO users (id, email, password_hash, is_active, is_verified, created_at, \
             updated_at, email_verification_token, password_reset_token, password_reset_expires) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(user.is_verified)
        .bind(user.created_at)
        .bind(user.updated_at)
        .bind(&user.email_verification_token)
        .bind(&user.password_reset_token)
        .bind(user.password_reset_expires)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::DuplicateEmail)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn user_by_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email_verification_token = $1",
            USER_COLUMNS
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn user_by_reset_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE password_reset_token = $1",
            USER_COLUMNS
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn save_user(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE users SET email = $2, password_hash = $3, is_active = $4, is_verified = $5, \
             updated_at = $6, email_verification_token = $7, password_reset_token = $8, \
             password_reset_expires = $9 WHERE id = $1",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(user.is_verified)
        .bind(user.updated_at)
        .bind(&user.email_verification_token)
        .bind(&user.password_reset_token)
        .bind(user.password_reset_expires)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_template(&self, template: &TaskTemplate) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO task_templates (id, name, user_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(template.id)
        .bind(&template.name)
        .bind(&template.user_id)
        .bind(template.created_at)
        .bind(template.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn template_by_id(&self, id: Uuid) -> Result<Option<TaskTemplate>, StoreError> {
        let template = sqlx::query_as::<_, TaskTemplate>(&format!(
            "SELECT {} FROM task_templates WHERE id = $1",
            TEMPLATE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(template)
    }

    async fn templates_by_owner(
        &self,
        owner: &str,
        skip: i64,
        limit: i64,
    ) -> Result<Page<TaskTemplate>, StoreError> {
        let rows = sqlx::query_as::<_, TaskTemplate>(&format!(
            "SELECT {} FROM task_templates WHERE user_id = $1 \
             ORDER BY created_at ASC OFFSET $2 LIMIT $3",
            TEMPLATE_COLUMNS
        ))
        .bind(owner)
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM task_templates WHERE user_id = $1")
                .bind(owner)
                .fetch_one(&self.pool)
                .await?;

        Ok(Page { rows, total })
    }

    async fn save_template(&self, template: &TaskTemplate) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE task_templates SET name = $2, user_id = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(template.id)
        .bind(&template.name)
        .bind(&template.user_id)
        .bind(template.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_template_and_items(
        &self,
        template_id: Uuid,
        owner: &str,
    ) -> Result<u64, StoreError> {
        // Single transaction: a crash can never leave items dangling on a
        // deleted template.
        let mut tx = self.pool.begin().await?;

        let deleted_items =
            sqlx::query("DELETE FROM task_items WHERE template_id = $1 AND user_id = $2")
                .bind(template_id)
                .bind(owner)
                .execute(&mut *tx)
                .await?
                .rows_affected();

        sqlx::query("DELETE FROM task_templates WHERE id = $1")
            .bind(template_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(deleted_items)
    }

    async fn insert_item(&self, item: &TaskItem) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO task_items (id, name, user_id, template_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(item.id)
        .bind(&item.name)
        .bind(&item.user_id)
        .bind(item.template_id)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn item_by_id(&self, id: Uuid) -> Result<Option<TaskItem>, StoreError> {
        let item = sqlx::query_as::<_, TaskItem>(&format!(
            "SELECT {} FROM task_items WHERE id = $1",
            ITEM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    async fn items_by_owner(
        &self,
        owner: &str,
        template_id: Option<Uuid>,
        skip: i64,
        limit: i64,
    ) -> Result<Page<TaskItem>, StoreError> {
        let (rows, total) = match template_id {
            Some(template_id) => {
                let rows = sqlx::query_as::<_, TaskItem>(&format!(
                    "SELECT {} FROM task_items WHERE user_id = $1 AND template_id = $2 \
                     ORDER BY created_at ASC OFFSET $3 LIMIT $4",
                    ITEM_COLUMNS
                ))
                .bind(owner)
                .bind(template_id)
                .bind(skip)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?;
                let total = sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM task_items WHERE user_id = $1 AND template_id = $2",
                )
                .bind(owner)
                .bind(template_id)
                .fetch_one(&self.pool)
                .await?;
                (rows, total)
            }
            None => {
                let rows = sqlx::query_as::<_, TaskItem>(&format!(
                    "SELECT {} FROM task_items WHERE user_id = $1 \
                     ORDER BY created_at ASC OFFSET $2 LIMIT $3",
                    ITEM_COLUMNS
                ))
                .bind(owner)
                .bind(skip)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?;
                let total = sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM task_items WHERE user_id = $1",
                )
                .bind(owner)
                .fetch_one(&self.pool)
                .await?;
                (rows, total)
            }
        };

        Ok(Page { rows, total })
    }

    async fn save_item(&self, item: &TaskItem) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE task_items SET name = $2, user_id = $3, template_id = $4, updated_at = $5 \
             WHERE id = $1",
        )
        .bind(item.id)
        .bind(&item.name)
        .bind(&item.user_id)
        .bind(item.template_id)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_item(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM task_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
