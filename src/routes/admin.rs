// Console admin: session, tableau de bord, analytique, gestion des
// utilisateurs, notifications manuelles et support.

use std::collections::HashMap;

use actix_web::{HttpResponse, delete, get, post, web};
use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use validator::Validate;

use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AdminUser;
use crate::models::dto::{
    AdminNotifyRequest, AnalyticsResponse, DashboardResponse, DeleteUserRequest, LoginRequest,
    RecentOrder, SupportMessageRequest, TopProduct, UserResponse,
};
use crate::models::orders::{self, Entity as Orders, OrderStatus};
use crate::models::products::Entity as Products;
use crate::models::support_messages::{self, Entity as SupportMessages, SENDER_ADMIN};
use crate::models::users::{self, Column as UserColumn, Entity as Users, ROLE_ADMIN};
use crate::services::mailer::{EmailQueue, OutboundEmail};
use crate::services::notification_service::NotificationService;
use crate::utils::{jwt, password};

/// POST /api/admin/login - Session admin (PUBLIC)
/// Ne matche que les comptes au rôle admin; tout le reste est un 401
/// indistinct.
#[post("/login")]
pub async fn admin_login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> ApiResult<HttpResponse> {
    body.validate()?;

    let user = Users::find()
        .filter(UserColumn::Email.eq(&body.email))
        .filter(UserColumn::Role.eq(ROLE_ADMIN))
        .one(db.get_ref())
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !password::verify_password(&body.password, &user.password_hash)? {
        return Err(ApiError::InvalidCredentials);
    }

    let token = jwt::generate_token(&config.jwt_secret, user.id, &user.email, &user.role)
        .map_err(ApiError::Internal)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "token": token,
        "user": UserResponse::from(user),
    })))
}

/// Chiffre d'affaires: somme des totaux hors commandes rejetées.
fn revenue_of(orders: &[orders::Model]) -> Decimal {
    orders
        .iter()
        .filter(|o| o.status != OrderStatus::Rejected)
        .map(|o| o.total_amount)
        .sum()
}

/// GET /api/admin/dashboard - Statistiques globales (ADMIN)
#[get("/dashboard")]
pub async fn dashboard(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let total_users = Users::find().count(db.get_ref()).await?;
    let total_products = Products::find().count(db.get_ref()).await?;

    let all_orders = Orders::find()
        .order_by_desc(orders::Column::CreatedAt)
        .all(db.get_ref())
        .await?;

    let recent_orders: Vec<RecentOrder> = all_orders.iter().take(5).map(RecentOrder::from).collect();

    Ok(HttpResponse::Ok().json(DashboardResponse {
        total_users,
        total_orders: all_orders.len() as u64,
        total_products,
        revenue: revenue_of(&all_orders),
        recent_orders,
    }))
}

/// GET /api/admin/analytics - Analytique des ventes (ADMIN)
#[get("/analytics")]
pub async fn analytics(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let all_orders = Orders::find().all(db.get_ref()).await?;
    let total_customers = Users::find()
        .filter(UserColumn::Role.eq(users::ROLE_CUSTOMER))
        .count(db.get_ref())
        .await?;

    let now = Utc::now();
    let this_month: Vec<&orders::Model> = all_orders
        .iter()
        .filter(|o| o.created_at.year() == now.year() && o.created_at.month() == now.month())
        .collect();

    let monthly_revenue: Decimal = this_month
        .iter()
        .filter(|o| o.status != OrderStatus::Rejected)
        .map(|o| o.total_amount)
        .sum();

    // ventes cumulées par produit, hors commandes rejetées
    let mut sales_by_product: HashMap<i32, Decimal> = HashMap::new();
    for order in all_orders
        .iter()
        .filter(|o| o.status != OrderStatus::Rejected)
    {
        *sales_by_product
            .entry(order.product_id)
            .or_insert(Decimal::ZERO) += order.total_amount;
    }

    let products = Products::find().all(db.get_ref()).await?;
    let names: HashMap<i32, &str> = products
        .iter()
        .map(|p| (p.id, p.name.as_str()))
        .collect();

    let mut top_products: Vec<TopProduct> = sales_by_product
        .into_iter()
        .map(|(product_id, total_sales)| TopProduct {
            // un produit supprimé peut encore apparaître via ses commandes
            name: names
                .get(&product_id)
                .map_or_else(|| format!("Product #{}", product_id), |n| (*n).to_string()),
            total_sales,
        })
        .collect();
    top_products.sort_by(|a, b| b.total_sales.cmp(&a.total_sales));
    top_products.truncate(5);

    Ok(HttpResponse::Ok().json(AnalyticsResponse {
        monthly_revenue,
        orders_this_month: this_month.len() as u64,
        total_customers,
        top_products,
    }))
}

/// GET /api/users - Liste des utilisateurs, sans hash ni code (ADMIN)
#[get("")]
pub async fn list_users(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let list: Vec<UserResponse> = Users::find()
        .order_by_desc(UserColumn::CreatedAt)
        .all(db.get_ref())
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(list))
}

/// DELETE /api/users - Supprimer un utilisateur par email (ADMIN)
/// Ses commandes et notifications sont conservées.
#[delete("")]
pub async fn delete_user(
    _admin: AdminUser,
    body: web::Json<DeleteUserRequest>,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    body.validate()?;

    let result = Users::delete_many()
        .filter(UserColumn::Email.eq(&body.email))
        .exec(db.get_ref())
        .await?;

    if result.rows_affected == 0 {
        return Err(ApiError::UserNotFound);
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": format!("User {} deleted.", body.email),
    })))
}

/// POST /api/admin/notify - Email manuel + notification in-app (ADMIN)
#[post("/notify")]
pub async fn notify_user(
    _admin: AdminUser,
    body: web::Json<AdminNotifyRequest>,
    db: web::Data<DatabaseConnection>,
    notifications: web::Data<NotificationService>,
    emails: web::Data<EmailQueue>,
) -> ApiResult<HttpResponse> {
    body.validate()?;

    notifications
        .notify_user(db.get_ref(), &body.email, &body.message)
        .await?;

    emails.enqueue(OutboundEmail {
        to: body.email.clone(),
        subject: body.subject.clone(),
        body: body.message.clone(),
    });

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Notification sent successfully",
    })))
}

/// GET /api/admin/support - Tous les messages de support (ADMIN)
#[get("/support")]
pub async fn list_support_messages(
    _admin: AdminUser,
    db: web::Data<DatabaseConnection>,
) -> ApiResult<HttpResponse> {
    let messages = SupportMessages::find()
        .order_by_desc(support_messages::Column::CreatedAt)
        .all(db.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(messages))
}

/// POST /api/admin/support/reply - Répondre dans un fil de support (ADMIN)
/// La réponse est ajoutée au fil et relayée en notification in-app.
#[post("/support/reply")]
pub async fn reply_support(
    _admin: AdminUser,
    body: web::Json<SupportMessageRequest>,
    db: web::Data<DatabaseConnection>,
    notifications: web::Data<NotificationService>,
) -> ApiResult<HttpResponse> {
    body.validate()?;

    let entry = support_messages::ActiveModel {
        email: Set(body.email.clone()),
        sender: Set(SENDER_ADMIN.to_string()),
        message: Set(body.message.clone()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db.get_ref())
    .await?;

    notifications
        .notify_user(db.get_ref(), &body.email, "Support replied to your message")
        .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "entry": entry,
    })))
}

pub fn admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(admin_login)
            .service(dashboard)
            .service(analytics)
            .service(notify_user)
            .service(list_support_messages)
            .service(reply_support),
    )
    .service(
        web::scope("/users")
            .service(list_users)
            .service(delete_user),
    );
}
