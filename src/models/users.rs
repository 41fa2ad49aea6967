// ============================================================================
// MODÈLE : USERS
// ============================================================================
//
// Description:
//   Comptes clients et administrateurs. L'email est la clé d'unicité.
//
// Cycle de vie:
//   1. Créé non vérifié à l'inscription, avec un code à 6 chiffres
//   2. verified passe à true quand le code est confirmé, le code est effacé
//   3. Une ré-inscription non vérifiée régénère le code (pas d'expiration)
//
// Points d'attention:
//   - password_hash et verification_code ne sortent JAMAIS de l'API
//     (réponses construites via dto::UserResponse)
//   - role: "customer" ou "admin"
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    #[sea_orm(unique)]
    pub email: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    pub role: String,

    pub verified: bool,

    #[serde(skip_serializing)]
    pub verification_code: Option<String>,

    pub phone: Option<String>,

    pub address: Option<String>,

    pub state: Option<String>,

    pub region: Option<String>,

    pub created_at: DateTimeUtc,
}

pub const ROLE_CUSTOMER: &str = "customer";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
