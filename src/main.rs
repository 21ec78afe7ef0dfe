use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{http::header, web, App, HttpServer};
use std::sync::Arc;

use tasknest::auth::AuthMiddleware;
use tasknest::config::Config;
use tasknest::email::{Mailer, SmtpMailer};
use tasknest::routes;
use tasknest::services::{AuthService, ItemService, TemplateService};
use tasknest::store::{PgStore, Store};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    let store: Arc<dyn Store> = Arc::new(
        PgStore::connect(&config.database_url)
            .await
            .expect("Failed to connect to database"),
    );
    let mailer: Arc<dyn Mailer> =
        Arc::new(SmtpMailer::new(&config).expect("Failed to build SMTP transport"));

    let auth_service = web::Data::new(AuthService::new(store.clone(), mailer.clone(), &config));
    let template_service = web::Data::new(TemplateService::new(store.clone()));
    let item_service = web::Data::new(ItemService::new(store.clone()));

    let jwt_secret = config.jwt_secret.clone();
    let frontend_url = config.frontend_url.clone();
    let bind_addr = (config.server_host.clone(), config.server_port);

    log::info!("Starting {} at {}", config.app_name, config.server_url());

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_url)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(auth_service.clone())
            .app_data(template_service.clone())
            .app_data(item_service.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(routes::health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware::new(jwt_secret.clone()))
                    .configure(routes::config),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
