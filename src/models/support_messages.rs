use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Message du fil de support client. Un fil par email, à plat;
/// sender vaut "customer" ou "admin".
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "support_messages")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub email: String,

    pub sender: String,

    pub message: String,

    pub created_at: DateTimeUtc,
}

pub const SENDER_CUSTOMER: &str = "customer";
pub const SENDER_ADMIN: &str = "admin";

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
