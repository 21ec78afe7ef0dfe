pub mod item;
pub mod template;
pub mod user;

pub use item::{
    CreateItemRequest, ItemPageQuery, ItemResponse, ItemsListResponse, TaskItem, TemplateRef,
    UpdateItemRequest,
};
pub use template::{
    CreateTemplateRequest, DeleteTemplateResponse, TaskTemplate, TemplatePageQuery,
    TemplateResponse, TemplatesListResponse, UpdateTemplateRequest,
};
pub use user::{User, UserProfile};
