use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::entities::food;
use crate::entities::status::Status;
use crate::error::{AppError, AppResult};
use crate::handlers::resource::{
    self, BatchDeleteRequest, BatchDeleteResponse, ItemResponse, ListResponse, MessageResponse,
    MutationResponse,
};
use crate::AppState;

const NOT_FOUND: &str = "Питание не найдено";

#[derive(Debug, Deserialize)]
pub struct FoodPayload {
    pub name: Option<String>,
    #[serde(default)]
    pub status: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRow {
    pub key: String,
    pub id: i32,
    pub name: String,
    pub status: &'static str,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

fn format(food: food::Model) -> FoodRow {
    FoodRow {
        key: food.id.to_string(),
        id: food.id,
        name: food.name,
        status: food.status.label(),
        created_at: food.created_at,
        updated_at: food.updated_at,
    }
}

/// GET /api/food
pub async fn list(State(state): State<AppState>) -> AppResult<Json<ListResponse<FoodRow>>> {
    let records = food::Entity::find()
        .order_by_asc(food::Column::Name)
        .all(&state.db)
        .await?;

    let total = records.len();
    Ok(Json(ListResponse {
        data: records.into_iter().map(format).collect(),
        total,
    }))
}

/// GET /api/food/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ItemResponse<food::Model>>> {
    let record = resource::find_by_id::<food::Entity>(&state.db, id, NOT_FOUND).await?;
    Ok(Json(ItemResponse { data: record }))
}

/// POST /api/food
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<FoodPayload>,
) -> AppResult<(StatusCode, Json<MutationResponse<food::Model>>)> {
    let Some(name) = resource::non_empty(payload.name) else {
        return Err(AppError::BadRequest("Наименование обязательно".to_string()));
    };

    let new_food = food::ActiveModel {
        name: Set(name),
        status: Set(Status::from_flag(payload.status)),
        ..Default::default()
    };

    let created = new_food.insert(&state.db).await?;
    Ok((
        StatusCode::CREATED,
        Json(MutationResponse {
            data: created,
            message: "Питание успешно создано",
        }),
    ))
}

/// PUT /api/food/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<FoodPayload>,
) -> AppResult<Json<MutationResponse<food::Model>>> {
    let existing = resource::find_by_id::<food::Entity>(&state.db, id, NOT_FOUND).await?;
    let mut active: food::ActiveModel = existing.into();

    if let Some(name) = resource::non_empty(payload.name) {
        active.name = Set(name);
    }
    active.status = Set(Status::from_flag(payload.status));
    active.updated_at = Set(chrono::Utc::now().into());

    let updated = active.update(&state.db).await?;
    Ok(Json(MutationResponse {
        data: updated,
        message: "Питание успешно обновлено",
    }))
}

/// DELETE /api/food/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    resource::delete_by_id::<food::Entity>(&state.db, id, NOT_FOUND).await?;
    Ok(Json(MessageResponse {
        message: "Питание успешно удалено",
    }))
}

/// POST /api/food/batch-delete
pub async fn batch_remove(
    State(state): State<AppState>,
    Json(payload): Json<BatchDeleteRequest>,
) -> AppResult<Json<BatchDeleteResponse>> {
    let outcomes = resource::batch_delete::<food::Entity>(&state.db, &payload.ids, NOT_FOUND).await;
    Ok(Json(BatchDeleteResponse { data: outcomes }))
}
