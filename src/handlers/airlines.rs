use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::entities::airline;
use crate::entities::status::Status;
use crate::error::{AppError, AppResult};
use crate::handlers::resource::{
    self, BatchDeleteRequest, BatchDeleteResponse, ItemResponse, ListResponse, MessageResponse,
    MutationResponse,
};
use crate::AppState;

const NOT_FOUND: &str = "Авиакомпания не найдена";

#[derive(Debug, Deserialize)]
pub struct AirlinePayload {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub status: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AirlineRow {
    pub key: String,
    pub id: i32,
    pub name: String,
    pub description: String,
    pub status: &'static str,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

fn format(airline: airline::Model) -> AirlineRow {
    AirlineRow {
        key: airline.id.to_string(),
        id: airline.id,
        name: airline.name,
        description: airline.description.unwrap_or_default(),
        status: airline.status.label(),
        created_at: airline.created_at,
        updated_at: airline.updated_at,
    }
}

/// GET /api/airlines
pub async fn list(State(state): State<AppState>) -> AppResult<Json<ListResponse<AirlineRow>>> {
    let airlines = airline::Entity::find()
        .order_by_asc(airline::Column::Name)
        .all(&state.db)
        .await?;

    let total = airlines.len();
    Ok(Json(ListResponse {
        data: airlines.into_iter().map(format).collect(),
        total,
    }))
}

/// GET /api/airlines/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ItemResponse<airline::Model>>> {
    let airline = resource::find_by_id::<airline::Entity>(&state.db, id, NOT_FOUND).await?;
    Ok(Json(ItemResponse { data: airline }))
}

/// POST /api/airlines
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<AirlinePayload>,
) -> AppResult<(StatusCode, Json<MutationResponse<airline::Model>>)> {
    let Some(name) = resource::non_empty(payload.name) else {
        return Err(AppError::BadRequest("Наименование обязательно".to_string()));
    };

    let new_airline = airline::ActiveModel {
        name: Set(name),
        description: Set(resource::non_empty(payload.description)),
        status: Set(Status::from_flag(payload.status)),
        ..Default::default()
    };

    let created = new_airline.insert(&state.db).await?;
    Ok((
        StatusCode::CREATED,
        Json(MutationResponse {
            data: created,
            message: "Авиакомпания успешно создана",
        }),
    ))
}

/// PUT /api/airlines/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<AirlinePayload>,
) -> AppResult<Json<MutationResponse<airline::Model>>> {
    let existing = resource::find_by_id::<airline::Entity>(&state.db, id, NOT_FOUND).await?;
    let mut active: airline::ActiveModel = existing.into();

    if let Some(name) = resource::non_empty(payload.name) {
        active.name = Set(name);
    }
    active.description = Set(resource::non_empty(payload.description));
    active.status = Set(Status::from_flag(payload.status));
    active.updated_at = Set(chrono::Utc::now().into());

    let updated = active.update(&state.db).await?;
    Ok(Json(MutationResponse {
        data: updated,
        message: "Авиакомпания успешно обновлена",
    }))
}

/// DELETE /api/airlines/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    resource::delete_by_id::<airline::Entity>(&state.db, id, NOT_FOUND).await?;
    Ok(Json(MessageResponse {
        message: "Авиакомпания успешно удалена",
    }))
}

/// POST /api/airlines/batch-delete
pub async fn batch_remove(
    State(state): State<AppState>,
    Json(payload): Json<BatchDeleteRequest>,
) -> AppResult<Json<BatchDeleteResponse>> {
    let outcomes =
        resource::batch_delete::<airline::Entity>(&state.db, &payload.ids, NOT_FOUND).await;
    Ok(Json(BatchDeleteResponse { data: outcomes }))
}
