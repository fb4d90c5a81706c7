use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::status::Status;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    #[sea_orm(string_value = "city")]
    City,
    #[sea_orm(string_value = "intercity")]
    Intercity,
}

impl TransportKind {
    pub fn label(&self) -> &'static str {
        match self {
            TransportKind::Intercity => "Межгород",
            TransportKind::City => "Городской",
        }
    }

    /// The dashboard submits either the raw value or the display label.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("intercity") | Some("Межгород") => TransportKind::Intercity,
            _ => TransportKind::City,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "transport")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub kind: TransportKind,
    pub description: Option<String>,
    pub status: Status,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transport_photo::Entity")]
    Photos,
}

impl Related<super::transport_photo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Photos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
