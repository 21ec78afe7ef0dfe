use async_trait::async_trait;
use std::sync::Mutex;
use uuid::Uuid;

use crate::models::{TaskItem, TaskTemplate, User};
use crate::store::{Page, Store, StoreError};

#[derive(Default)]
struct MemInner {
    users: Vec<User>,
    templates: Vec<TaskTemplate>,
    items: Vec<TaskItem>,
}

/// In-process implementation of the persistence gateway.
///
/// Rows live in insertion-order vectors behind one mutex, which doubles as
/// the "natural store order" for listings and makes the cascade delete atomic
/// with respect to other operations. Used by the test suites; also usable for
/// running the API without a database.
#[derive(Default)]
pub struct MemStore {
    inner: Mutex<MemInner>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        // The unique-email backstop the real store gets from its index.
        if inner.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        inner.users.push(user.clone());
        Ok(())
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn user_by_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<User>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .users
            .iter()
            .find(|u| u.email_verification_token.as_deref() == Some(token))
            .cloned())
    }

    async fn user_by_reset_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .users
            .iter()
            .find(|u| u.password_reset_token.as_deref() == Some(token))
            .cloned())
    }

    async fn save_user(&self, user: &User) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(slot) = inner.users.iter_mut().find(|u| u.id == user.id) {
            *slot = user.clone();
        }
        Ok(())
    }

    async fn insert_template(&self, template: &TaskTemplate) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.templates.push(template.clone());
        Ok(())
    }

    async fn template_by_id(&self, id: Uuid) -> Result<Option<TaskTemplate>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.templates.iter().find(|t| t.id == id).cloned())
    }

    async fn templates_by_owner(
        &self,
        owner: &str,
        skip: i64,
        limit: i64,
    ) -> Result<Page<TaskTemplate>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let matching: Vec<&TaskTemplate> = inner
            .templates
            .iter()
            .filter(|t| t.user_id == owner)
            .collect();
        let total = matching.len() as i64;
        let rows = matching
            .into_iter()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();
        Ok(Page { rows, total })
    }

    async fn save_template(&self, template: &TaskTemplate) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(slot) = inner.templates.iter_mut().find(|t| t.id == template.id) {
            *slot = template.clone();
        }
        Ok(())
    }

    async fn delete_template_and_items(
        &self,
        template_id: Uuid,
        owner: &str,
    ) -> Result<u64, StoreError> {
        // One lock for both phases; no observer sees the template without
        // its items already gone.
        let mut inner = self.inner.lock().unwrap();
        let before = inner.items.len();
        inner
            .items
            .retain(|i| !(i.template_id == Some(template_id) && i.user_id == owner));
        let deleted_items = (before - inner.items.len()) as u64;
        inner.templates.retain(|t| t.id != template_id);
        Ok(deleted_items)
    }

    async fn insert_item(&self, item: &TaskItem) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.items.push(item.clone());
        Ok(())
    }

    async fn item_by_id(&self, id: Uuid) -> Result<Option<TaskItem>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.items.iter().find(|i| i.id == id).cloned())
    }

    async fn items_by_owner(
        &self,
        owner: &str,
        template_id: Option<Uuid>,
        skip: i64,
        limit: i64,
    ) -> Result<Page<TaskItem>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let matching: Vec<&TaskItem> = inner
            .items
            .iter()
            .filter(|i| i.user_id == owner)
            .filter(|i| template_id.map_or(true, |t| i.template_id == Some(t)))
            .collect();
        let total = matching.len() as i64;
        let rows = matching
            .into_iter()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();
        Ok(Page { rows, total })
    }

    async fn save_item(&self, item: &TaskItem) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(slot) = inner.items.iter_mut().find(|i| i.id == item.id) {
            *slot = item.clone();
        }
        Ok(())
    }

    async fn delete_item(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.items.retain(|i| i.id != id);
        Ok(())
    }
}
