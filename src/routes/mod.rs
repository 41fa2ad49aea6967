pub mod admin;
pub mod auth;
pub mod health;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod support;
pub mod updates;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health::health_check)
            .configure(auth::auth_routes)
            .configure(products::product_routes)
            .configure(orders::order_routes)
            .configure(notifications::notification_routes)
            .configure(updates::update_routes)
            .configure(support::support_routes)
            .configure(admin::admin_routes),
    );
}
