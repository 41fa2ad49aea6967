use actix_web::{HttpResponse, get, post, put, web};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Deserialize;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::middleware::AdminUser;
use crate::models::dto::{CreateOrderRequest, UpdateOrderStatusRequest};
use crate::models::orders::{self, Entity as Orders};
use crate::services::mailer::EmailQueue;
use crate::services::notification_service::NotificationService;
use crate::services::order_service::OrderService;

#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    pub email: Option<String>,
}

/// POST /api/orders - Passer une commande (PUBLIC)
/// Le total est calculé côté serveur; email et notification in-app sont
/// best-effort et ne bloquent jamais la réponse.
#[post("")]
pub async fn create_order(
    body: web::Json<CreateOrderRequest>,
    db: web::Data<DatabaseConnection>,
    notifications: web::Data<NotificationService>,
    emails: web::Data<EmailQueue>,
) -> ApiResult<HttpResponse> {
    body.validate()?;

    let order =
        OrderService::create_order(db.get_ref(), &notifications, &emails, body.into_inner())
            .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "message": "Order placed successfully",
        "order": order,
    })))
}

/// GET /api/orders?email= - Commandes d'un utilisateur, ou toutes (ADMIN)
/// Avec email: les commandes de cet utilisateur. Sans email: la liste
/// complète, réservée aux admins.
#[get("")]
pub async fn list_orders(
    query: web::Query<OrdersQuery>,
    admin: Option<AdminUser>,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let orders = match query.email.as_deref().filter(|e| !e.is_empty()) {
        Some(email) => {
            Orders::find()
                .filter(orders::Column::Email.eq(email))
                .order_by_desc(orders::Column::CreatedAt)
                .all(db.get_ref())
                .await?
        }
        None => {
            if admin.is_none() {
                return Err(ApiError::AdminOnly);
            }
            Orders::find()
                .order_by_desc(orders::Column::CreatedAt)
                .all(db.get_ref())
                .await?
        }
    };

    Ok(HttpResponse::Ok().json(orders))
}

/// PUT /api/orders/{id}/update - Changer le statut d'une commande (ADMIN)
/// La transition doit être autorisée par la machine à états; le message
/// admin accompagne la notification envoyée au client.
#[put("/{id}/update")]
pub async fn update_order_status(
    _admin: AdminUser,
    path: web::Path<i32>,
    body: web::Json<UpdateOrderStatusRequest>,
    db: web::Data<DatabaseConnection>,
    notifications: web::Data<NotificationService>,
    emails: web::Data<EmailQueue>,
) -> ApiResult<HttpResponse> {
    body.validate()?;

    let order = OrderService::update_status(
        db.get_ref(),
        &notifications,
        &emails,
        path.into_inner(),
        body.status,
        &body.message,
    )
    .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "order": order,
    })))
}

pub fn order_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .service(create_order)
            .service(list_orders)
            .service(update_order_status),
    );
}
