use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Record state shared by every administered entity. Stored as a plain
/// string column; the create/update payloads carry a boolean flag instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

impl Status {
    /// Falsy flag collapses to inactive.
    pub fn from_flag(active: bool) -> Self {
        if active {
            Status::Active
        } else {
            Status::Inactive
        }
    }

    /// Display label shown in dashboard tables.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Active => "Активный",
            Status::Inactive => "Неактивный",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_round_trip() {
        assert_eq!(Status::from_flag(true), Status::Active);
        assert_eq!(Status::from_flag(false), Status::Inactive);
        assert_eq!(Status::from_flag(true).label(), "Активный");
        assert_eq!(Status::from_flag(false).label(), "Неактивный");
    }
}
