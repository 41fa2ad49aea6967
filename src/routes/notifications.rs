use actix_web::{HttpResponse, delete, get, web};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use tokio::sync::broadcast;

use crate::error::{ApiError, ApiResult};
use crate::services::notification_service::NotificationService;

#[derive(Debug, Deserialize)]
pub struct NotificationsQuery {
    pub email: Option<String>,
}

fn required_email(query: &NotificationsQuery) -> ApiResult<&str> {
    query
        .email
        .as_deref()
        .filter(|e| !e.is_empty())
        .ok_or(ApiError::EmailRequired)
}

/// GET /api/notifications?email= - Flux d'un utilisateur (PUBLIC)
/// Notifications personnelles fusionnées avec les annonces globales,
/// triées par date décroissante, 100 entrées max.
#[get("")]
pub async fn get_feed(
    query: web::Query<NotificationsQuery>,
    db: web::Data<DatabaseConnection>,
    notifications: web::Data<NotificationService>,
) -> ApiResult<HttpResponse> {
    let email = required_email(&query)?;
    let feed = notifications.feed_for(db.get_ref(), email).await?;

    Ok(HttpResponse::Ok().json(feed))
}

/// DELETE /api/notifications?email= - Effacer les notifications d'un
/// utilisateur (PUBLIC, comme le GET: le flux est adressé par email)
#[delete("")]
pub async fn clear_notifications(
    query: web::Query<NotificationsQuery>,
    db: web::Data<DatabaseConnection>,
    notifications: web::Data<NotificationService>,
) -> ApiResult<HttpResponse> {
    let email = required_email(&query)?;
    notifications.clear_for(db.get_ref(), email).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "All notifications deleted.",
    })))
}

/// GET /api/notifications/stream?email= - Flux temps réel (SSE)
/// Pousse les événements suivants (personnels + annonces globales) au fur
/// et à mesure; remplace l'ancien polling du client, qui reste possible
/// via le GET simple.
#[get("/stream")]
pub async fn stream_notifications(
    query: web::Query<NotificationsQuery>,
    notifications: web::Data<NotificationService>,
) -> ApiResult<HttpResponse> {
    let email = required_email(&query)?.to_string();
    let receiver = notifications.subscribe();

    let stream = futures::stream::unfold((receiver, email), |(mut receiver, email)| async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    // on ne pousse que les événements de cet utilisateur
                    // et les annonces globales (email absent)
                    let relevant = event.email.as_deref().is_none_or(|e| e == email);
                    if !relevant {
                        continue;
                    }
                    let Ok(payload) = serde_json::to_string(&event) else {
                        continue;
                    };
                    let frame = web::Bytes::from(format!("data: {}\n\n", payload));
                    return Some((Ok::<_, actix_web::Error>(frame), (receiver, email)));
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "SSE subscriber lagged, events skipped");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    });

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(stream))
}

pub fn notification_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/notifications")
            .service(stream_notifications)
            .service(get_feed)
            .service(clear_notifications),
    );
}
