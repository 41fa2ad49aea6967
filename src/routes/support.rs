use actix_web::{HttpResponse, get, post, web};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::models::dto::SupportMessageRequest;
use crate::models::support_messages::{self, Entity as SupportMessages, SENDER_CUSTOMER};

#[derive(Debug, Deserialize)]
pub struct SupportQuery {
    pub email: Option<String>,
}

/// POST /api/support - Envoyer un message au support (PUBLIC)
#[post("")]
pub async fn send_message(
    body: web::Json<SupportMessageRequest>,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    body.validate()?;

    let entry = support_messages::ActiveModel {
        email: Set(body.email.clone()),
        sender: Set(SENDER_CUSTOMER.to_string()),
        message: Set(body.message.clone()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db.get_ref())
    .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "entry": entry,
    })))
}

/// GET /api/support?email= - Fil de support d'un utilisateur (PUBLIC)
/// Du plus ancien au plus récent, comme une conversation.
#[get("")]
pub async fn get_thread(
    query: web::Query<SupportQuery>,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let email = query
        .email
        .as_deref()
        .filter(|e| !e.is_empty())
        .ok_or(ApiError::EmailRequired)?;

    let thread = SupportMessages::find()
        .filter(support_messages::Column::Email.eq(email))
        .order_by_asc(support_messages::Column::CreatedAt)
        .all(db.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(thread))
}

pub fn support_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/support")
            .service(send_message)
            .service(get_thread),
    );
}
