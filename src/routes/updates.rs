use actix_web::{HttpResponse, get, post, web};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use validator::Validate;

use crate::error::ApiResult;
use crate::middleware::AdminUser;
use crate::models::dto::CreateUpdateRequest;
use crate::models::updates::{self, Entity as Updates};
use crate::services::notification_service::NotificationService;

/// POST /api/updates - Diffuser une annonce à tous les utilisateurs (ADMIN)
#[post("")]
pub async fn create_update(
    _admin: AdminUser,
    body: web::Json<CreateUpdateRequest>,
    db: web::Data<DatabaseConnection>,
    notifications: web::Data<NotificationService>,
) -> ApiResult<HttpResponse> {
    body.validate()?;

    let update = notifications
        .broadcast_update(db.get_ref(), &body.message)
        .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "update": update,
    })))
}

/// GET /api/updates - Liste des annonces, la plus récente d'abord (PUBLIC)
#[get("")]
pub async fn list_updates(db: web::Data<DatabaseConnection>) -> ApiResult<HttpResponse> {
    let updates = Updates::find()
        .order_by_desc(updates::Column::CreatedAt)
        .all(db.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(updates))
}

pub fn update_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/updates")
            .service(create_update)
            .service(list_updates),
    );
}
