//!
//! # Service Layer
//!
//! The two orchestrating services of the application: the auth lifecycle
//! state machine and the template/item resource services. Each is constructed
//! once at startup with its collaborators injected and is shared with the
//! request handlers through `web::Data`.

pub mod auth_service;
pub mod item_service;
pub mod template_service;

pub use auth_service::AuthService;
pub use item_service::ItemService;
pub use template_service::TemplateService;
