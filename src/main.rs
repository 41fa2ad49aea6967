mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;
mod utils;

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::services::mailer::{EmailQueue, SmtpMailer};
use crate::services::notification_service::NotificationService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Échoue bruyamment si un secret obligatoire manque (BD, JWT, SMTP)
    let config = AppConfig::from_env().expect("Invalid configuration");

    tracing::info!("🔌 Connecting to database...");
    let db = db::establish_connection(&config.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("✅ Database connected!");

    let mailer = SmtpMailer::new(&config).expect("Failed to build SMTP transport");
    let emails = EmailQueue::start(Arc::new(mailer));
    let notifications = NotificationService::new();

    let bind_addr = (config.host.clone(), config.port);
    tracing::info!("🚀 Starting server on http://{}:{}", config.host, config.port);

    let config = web::Data::new(config);
    let db = web::Data::new(db);
    let emails = web::Data::new(emails);
    let notifications = web::Data::new(notifications);

    HttpServer::new(move || {
        App::new()
            .app_data(config.clone())
            .app_data(db.clone())
            .app_data(emails.clone())
            .app_data(notifications.clone())
            .configure(routes::configure_routes)
    })
    .bind(bind_addr)?
    .run()
    .await
}
