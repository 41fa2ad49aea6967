// ============================================================================
// MODÈLE : ORDERS
// ============================================================================
//
// Description:
//   Commandes clients. Une commande référence un produit par id simple
//   (pas de clé étrangère): supprimer un produit ne touche pas aux
//   commandes existantes, la référence reste lisible telle quelle.
//
// Cycle de vie du statut (machine à états, voir OrderStatus):
//   pending    -> confirmed | processing | rejected
//   confirmed  -> processing | rejected
//   processing -> delivered | rejected
//   delivered, rejected : états terminaux
//   La ré-application du statut courant est acceptée (idempotente).
//
// Points d'attention:
//   - total_amount est calculé côté serveur: prix x quantité x (1 + taux)
//   - address est vide pour un retrait en magasin, obligatoire en livraison
//   - une commande n'est jamais supprimée
//
// ============================================================================

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "delivered")]
    Delivered,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::Delivered => "delivered",
            Self::Rejected => "rejected",
        }
    }

    /// Table des transitions autorisées. Le cycle de vie ne va que vers
    /// l'avant; delivered et rejected sont terminaux.
    pub fn can_transition_to(self, next: Self) -> bool {
        use OrderStatus::{Confirmed, Delivered, Pending, Processing, Rejected};

        // ré-application idempotente du statut courant
        if self == next {
            return true;
        }

        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Processing)
                | (Pending, Rejected)
                | (Confirmed, Processing)
                | (Confirmed, Rejected)
                | (Processing, Delivered)
                | (Processing, Rejected)
        )
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum DeliveryMethod {
    #[sea_orm(string_value = "pick_up")]
    #[serde(rename = "Pick Up")]
    PickUp,
    #[sea_orm(string_value = "deliver")]
    #[serde(rename = "Deliver")]
    Deliver,
}

impl DeliveryMethod {
    /// Taux de majoration fixe appliqué au montant de base:
    /// 5% en livraison, 2% en retrait magasin.
    pub fn surcharge_rate(self) -> Decimal {
        match self {
            Self::Deliver => Decimal::new(5, 2),
            Self::PickUp => Decimal::new(2, 2),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub email: String,

    pub phone: String,

    pub product_id: i32,

    pub quantity: i32,

    pub delivery_method: DeliveryMethod,

    pub payment_method: String,

    pub address: String,

    pub total_amount: Decimal,

    pub status: OrderStatus,

    pub admin_message: Option<String>,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions_allowed() {
        use OrderStatus::*;

        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Processing));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Confirmed.can_transition_to(Processing));
        assert!(Confirmed.can_transition_to(Rejected));
        assert!(Processing.can_transition_to(Delivered));
        assert!(Processing.can_transition_to(Rejected));
    }

    #[test]
    fn test_regressions_refused() {
        use OrderStatus::*;

        assert!(!Delivered.can_transition_to(Pending));
        assert!(!Delivered.can_transition_to(Processing));
        assert!(!Rejected.can_transition_to(Confirmed));
        assert!(!Processing.can_transition_to(Pending));
        assert!(!Confirmed.can_transition_to(Pending));
        // pas de saut direct pending -> delivered
        assert!(!Pending.can_transition_to(Delivered));
    }

    #[test]
    fn test_self_transition_is_idempotent() {
        use OrderStatus::*;

        for status in [Pending, Confirmed, Processing, Delivered, Rejected] {
            assert!(status.can_transition_to(status));
        }
    }

    #[test]
    fn test_surcharge_rates() {
        assert_eq!(
            DeliveryMethod::Deliver.surcharge_rate(),
            Decimal::new(5, 2)
        );
        assert_eq!(DeliveryMethod::PickUp.surcharge_rate(), Decimal::new(2, 2));
    }
}
