use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Annonce diffusée par un admin à tous les utilisateurs. Fusionnée dans
/// le flux de notifications de chaque utilisateur.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "updates")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub message: String,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
