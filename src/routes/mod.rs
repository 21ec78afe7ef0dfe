pub mod auth;
pub mod health;
pub mod items;
pub mod templates;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::register)
            .service(auth::verify_email)
            .service(auth::login)
            .service(auth::forgot_password)
            .service(auth::reset_password)
            .service(auth::me),
    )
    .service(
        web::scope("/templates")
            .service(templates::list_templates)
            .service(templates::create_template)
            .service(templates::get_template)
            .service(templates::update_template)
            .service(templates::delete_template),
    )
    .service(
        web::scope("/items")
            .service(items::list_items)
            .service(items::create_item)
            .service(items::get_item)
            .service(items::update_item)
            .service(items::delete_item),
    );
}
