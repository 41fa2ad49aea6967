// DTOs des requêtes et réponses API. Les champs suivent le format
// camelCase attendu par les deux frontends (vitrine et console admin).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::orders::{DeliveryMethod, OrderStatus};
use super::{orders, users};

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,

    #[validate(email(message = "Valid email is required"))]
    pub email: String,

    pub password: String,

    pub confirm_password: String,

    #[validate(length(min = 7, message = "Valid phone number is required"))]
    pub phone: String,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub state: Option<String>,

    #[serde(default)]
    pub region: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Valid email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyRequest {
    #[validate(email(message = "Valid email is required"))]
    pub email: String,

    #[validate(length(equal = 6, message = "Verification code must be 6 digits"))]
    pub code: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: Option<String>,

    pub phone: Option<String>,
    pub address: Option<String>,
    pub state: Option<String>,
    pub region: Option<String>,
}

/// Utilisateur tel qu'exposé par l'API: jamais de hash ni de code en clair.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub verified: bool,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub state: Option<String>,
    pub region: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for UserResponse {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            verified: user.verified,
            phone: user.phone,
            address: user.address,
            state: user.state,
            region: user.region,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    pub price: Decimal,

    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,

    pub stock: i32,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(length(min = 1, message = "Brand is required"))]
    pub brand: String,

    #[serde(default)]
    pub position: i32,

    #[validate(length(min = 1, message = "At least one image is required"))]
    pub images: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub stock: Option<i32>,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub position: Option<i32>,
    pub images: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Commandes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub product_id: i32,

    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,

    pub delivery_method: DeliveryMethod,

    #[validate(length(min = 1, message = "Payment method is required"))]
    pub payment_method: String,

    #[validate(length(min = 7, message = "Valid phone number is required"))]
    pub phone: String,

    #[validate(email(message = "Valid email is required"))]
    pub email: String,

    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,

    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

// ---------------------------------------------------------------------------
// Notifications, annonces, support
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUpdateRequest {
    #[validate(length(min = 1, message = "Message required"))]
    pub message: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AdminNotifyRequest {
    #[validate(email(message = "Valid email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,

    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SupportMessageRequest {
    #[validate(email(message = "Valid email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

/// Événement poussé sur le canal SSE: soit une notification personnelle,
/// soit une annonce globale (email absent).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    pub email: Option<String>,
    pub message: String,
    pub date: DateTime<Utc>,
}

/// Entrée du flux fusionné notifications personnelles + annonces globales,
/// triée du plus récent au plus ancien.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    pub message: String,
    pub date: DateTime<Utc>,
    pub source: FeedSource,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedSource {
    Personal,
    Broadcast,
}

// ---------------------------------------------------------------------------
// Console admin
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentOrder {
    pub id: i32,
    pub user: String,
    pub amount: Decimal,
    pub status: OrderStatus,
}

impl From<&orders::Model> for RecentOrder {
    fn from(order: &orders::Model) -> Self {
        Self {
            id: order.id,
            user: order.email.clone(),
            amount: order.total_amount,
            status: order.status,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub total_users: u64,
    pub total_orders: u64,
    pub total_products: u64,
    pub revenue: Decimal,
    pub recent_orders: Vec<RecentOrder>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub name: String,
    pub total_sales: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub monthly_revenue: Decimal,
    pub orders_this_month: u64,
    pub total_customers: u64,
    pub top_products: Vec<TopProduct>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DeleteUserRequest {
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
}
