//! Shared building blocks for the per-entity CRUD controllers: response
//! envelopes and storage helpers generic over any sea-orm entity. Keeps the
//! ten resource modules down to request shapes, formatters and messages.

use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, PrimaryKeyTrait, QueryFilter,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub data: Vec<T>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ItemResponse<T: Serialize> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct MutationResponse<T: Serialize> {
    pub data: T,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct BatchDeleteRequest {
    pub ids: Vec<i32>,
}

#[derive(Debug, Serialize)]
pub struct BatchDeleteOutcome {
    pub id: i32,
    pub deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchDeleteResponse {
    pub data: Vec<BatchDeleteOutcome>,
}

/// A required text field: present and non-blank after trimming.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub async fn find_by_id<E>(db: &DatabaseConnection, id: i32, not_found: &str) -> AppResult<E::Model>
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    E::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(not_found.to_string()))
}

/// Reject the mutation when another record already holds `value` in the
/// unique column. On update the record being changed is excluded by id.
pub async fn ensure_unique<E>(
    db: &DatabaseConnection,
    column: E::Column,
    value: &str,
    id_column: E::Column,
    exclude_id: Option<i32>,
    conflict: &str,
) -> AppResult<()>
where
    E: EntityTrait,
    E::Model: Send + Sync,
{
    let mut query = E::find().filter(column.eq(value));
    if let Some(id) = exclude_id {
        query = query.filter(id_column.ne(id));
    }

    if query.count(db).await? > 0 {
        return Err(AppError::Conflict(conflict.to_string()));
    }

    Ok(())
}

pub async fn delete_by_id<E>(db: &DatabaseConnection, id: i32, not_found: &str) -> AppResult<()>
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    let result = E::delete_by_id(id).exec(db).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound(not_found.to_string()));
    }

    Ok(())
}

/// Delete a selection one id at a time, reporting the outcome per id so the
/// caller can tell partial failure from full success.
pub async fn batch_delete<E>(
    db: &DatabaseConnection,
    ids: &[i32],
    not_found: &str,
) -> Vec<BatchDeleteOutcome>
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    let mut outcomes = Vec::with_capacity(ids.len());

    for &id in ids {
        match delete_by_id::<E>(db, id, not_found).await {
            Ok(()) => outcomes.push(BatchDeleteOutcome {
                id,
                deleted: true,
                message: None,
            }),
            Err(err) => outcomes.push(BatchDeleteOutcome {
                id,
                deleted: false,
                message: Some(err.to_string()),
            }),
        }
    }

    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_trims_and_filters() {
        assert_eq!(non_empty(Some(" Kaspi ".into())), Some("Kaspi".to_string()));
        assert_eq!(non_empty(Some("   ".into())), None);
        assert_eq!(non_empty(None), None);
    }
}
