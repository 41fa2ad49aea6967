use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set};

use crate::error::{ApiError, ApiResult};
use crate::models::dto::CreateOrderRequest;
use crate::models::orders::{self, DeliveryMethod, OrderStatus};
use crate::models::products;
use crate::services::mailer::{EmailQueue, OutboundEmail};
use crate::services::notification_service::NotificationService;

pub struct OrderService;

impl OrderService {
    /// Montant total d'une commande: prix x quantité, majoré du taux fixe
    /// de la méthode de livraison. Arithmétique décimale exacte.
    pub fn compute_total(price: Decimal, quantity: i32, method: DeliveryMethod) -> Decimal {
        let base = price * Decimal::from(quantity);
        base + base * method.surcharge_rate()
    }

    /// Crée une commande au statut pending. Le total est calculé côté
    /// serveur à partir du prix courant du produit. La notification in-app
    /// et l'email de confirmation sont best-effort: leurs échecs sont
    /// loggés, la commande reste créée.
    pub async fn create_order(
        db: &DatabaseConnection,
        notifications: &NotificationService,
        emails: &EmailQueue,
        request: CreateOrderRequest,
    ) -> ApiResult<orders::Model> {
        // adresse exigée uniquement en livraison, vide en retrait magasin
        let address = match request.delivery_method {
            DeliveryMethod::Deliver => {
                let address = request.address.as_deref().unwrap_or("").trim().to_string();
                if address.is_empty() {
                    return Err(ApiError::AddressRequired);
                }
                address
            }
            DeliveryMethod::PickUp => String::new(),
        };

        let product = products::Entity::find_by_id(request.product_id)
            .one(db)
            .await?
            .ok_or(ApiError::ProductNotFound)?;

        let total = Self::compute_total(product.price, request.quantity, request.delivery_method);
        let now = Utc::now();

        let order = orders::ActiveModel {
            email: Set(request.email.clone()),
            phone: Set(request.phone.clone()),
            product_id: Set(product.id),
            quantity: Set(request.quantity),
            delivery_method: Set(request.delivery_method),
            payment_method: Set(request.payment_method.clone()),
            address: Set(address),
            total_amount: Set(total),
            status: Set(OrderStatus::Pending),
            admin_message: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;

        if let Err(e) = notifications
            .notify_user(db, &order.email, "Your order has been placed successfully!")
            .await
        {
            tracing::warn!(error = %e, order_id = order.id, "failed to store order notification");
        }

        emails.enqueue(OutboundEmail {
            to: order.email.clone(),
            subject: format!("Order #{} received", order.id),
            body: format!(
                "Your order for {} x{} has been received. Total: {}. We will keep you posted.",
                product.name, order.quantity, order.total_amount
            ),
        });

        Ok(order)
    }

    /// Changement de statut par un admin. La transition doit être autorisée
    /// par la machine à états; ré-appliquer le statut courant est accepté.
    /// Une transition illégale laisse la ligne intacte.
    pub async fn update_status(
        db: &DatabaseConnection,
        notifications: &NotificationService,
        emails: &EmailQueue,
        order_id: i32,
        next: OrderStatus,
        message: &str,
    ) -> ApiResult<orders::Model> {
        let order = orders::Entity::find_by_id(order_id)
            .one(db)
            .await?
            .ok_or(ApiError::OrderNotFound)?;

        let current = order.status;
        if !current.can_transition_to(next) {
            return Err(ApiError::IllegalTransition {
                from: current.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }

        let mut active = order.into_active_model();
        active.status = Set(next);
        active.admin_message = Set(Some(message.to_string()));
        active.updated_at = Set(Utc::now());
        let updated = active.update(db).await?;

        let text = format!("Your order status was updated to: {}", next.as_str());
        if let Err(e) = notifications.notify_user(db, &updated.email, &text).await {
            tracing::warn!(error = %e, order_id = updated.id, "failed to store status notification");
        }

        emails.enqueue(OutboundEmail {
            to: updated.email.clone(),
            subject: format!("Order #{} update", updated.id),
            body: format!("{}\n\n{}", text, message),
        });

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::products::ImageList;
    use crate::services::mailer::{EmailError, Mailer, OutboundEmail};
    use async_trait::async_trait;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::str::FromStr;
    use std::sync::Arc;

    struct NoopMailer;

    #[async_trait]
    impl Mailer for NoopMailer {
        async fn send(&self, _email: &OutboundEmail) -> Result<(), EmailError> {
            Ok(())
        }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_compute_total_delivery() {
        // 1000 x 2 majoré de 5% = 2100
        let total = OrderService::compute_total(dec("1000"), 2, DeliveryMethod::Deliver);
        assert_eq!(total, dec("2100"));
    }

    #[test]
    fn test_compute_total_pick_up() {
        // 1000 x 1 majoré de 2% = 1020
        let total = OrderService::compute_total(dec("1000"), 1, DeliveryMethod::PickUp);
        assert_eq!(total, dec("1020"));
    }

    #[test]
    fn test_compute_total_exact_decimals() {
        // pas de dérive flottante sur les prix non ronds
        let total = OrderService::compute_total(dec("999.99"), 3, DeliveryMethod::Deliver);
        assert_eq!(total, dec("3149.9685"));

        let total = OrderService::compute_total(dec("0.01"), 1, DeliveryMethod::PickUp);
        assert_eq!(total, dec("0.0102"));
    }

    #[test]
    fn test_compute_total_scales_with_quantity() {
        let one = OrderService::compute_total(dec("250"), 1, DeliveryMethod::Deliver);
        let five = OrderService::compute_total(dec("250"), 5, DeliveryMethod::Deliver);
        assert_eq!(five, one * Decimal::from(5));
    }

    fn sample_request(method: DeliveryMethod, address: Option<&str>) -> CreateOrderRequest {
        CreateOrderRequest {
            product_id: 1,
            quantity: 2,
            delivery_method: method,
            payment_method: "Card".to_string(),
            phone: "08012345678".to_string(),
            email: "ada@example.com".to_string(),
            address: address.map(str::to_string),
        }
    }

    fn sample_product() -> products::Model {
        products::Model {
            id: 1,
            name: "Pixel 9".to_string(),
            price: dec("1000"),
            category: "Phones".to_string(),
            stock: 10,
            description: "A phone".to_string(),
            brand: "Google".to_string(),
            position: 1,
            images: ImageList(vec!["https://example.com/pixel.png".to_string()]),
            created_at: Utc::now(),
        }
    }

    fn delivered_order() -> orders::Model {
        orders::Model {
            id: 7,
            email: "ada@example.com".to_string(),
            phone: "08012345678".to_string(),
            product_id: 1,
            quantity: 2,
            delivery_method: DeliveryMethod::Deliver,
            payment_method: "Card".to_string(),
            address: "12 Marina Road, Lagos".to_string(),
            total_amount: dec("2100"),
            status: OrderStatus::Delivered,
            admin_message: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_order_requires_address_for_delivery() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let notifications = NotificationService::new();
        let emails = EmailQueue::start(Arc::new(NoopMailer));

        let result = OrderService::create_order(
            &db,
            &notifications,
            &emails,
            sample_request(DeliveryMethod::Deliver, Some("   ")),
        )
        .await;

        assert!(matches!(result, Err(ApiError::AddressRequired)));
    }

    #[tokio::test]
    async fn test_create_order_unknown_product() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<products::Model>::new()])
            .into_connection();
        let notifications = NotificationService::new();
        let emails = EmailQueue::start(Arc::new(NoopMailer));

        let result = OrderService::create_order(
            &db,
            &notifications,
            &emails,
            sample_request(DeliveryMethod::PickUp, None),
        )
        .await;

        assert!(matches!(result, Err(ApiError::ProductNotFound)));
    }

    #[tokio::test]
    async fn test_update_status_unknown_order() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<orders::Model>::new()])
            .into_connection();
        let notifications = NotificationService::new();
        let emails = EmailQueue::start(Arc::new(NoopMailer));

        let result = OrderService::update_status(
            &db,
            &notifications,
            &emails,
            999,
            OrderStatus::Confirmed,
            "on the way",
        )
        .await;

        assert!(matches!(result, Err(ApiError::OrderNotFound)));
    }

    #[tokio::test]
    async fn test_update_status_refuses_regression() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![delivered_order()]])
            .into_connection();
        let notifications = NotificationService::new();
        let emails = EmailQueue::start(Arc::new(NoopMailer));

        let result = OrderService::update_status(
            &db,
            &notifications,
            &emails,
            7,
            OrderStatus::Pending,
            "rollback attempt",
        )
        .await;

        match result {
            Err(ApiError::IllegalTransition { from, to }) => {
                assert_eq!(from, "delivered");
                assert_eq!(to, "pending");
            }
            other => panic!("expected IllegalTransition, got {:?}", other.map(|o| o.id)),
        }
    }

    #[test]
    fn test_seeded_product_delivery_total() {
        let product = sample_product();
        let total = OrderService::compute_total(product.price, 2, DeliveryMethod::Deliver);
        assert_eq!(total, dec("2100"));
    }
}
