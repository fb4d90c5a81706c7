use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::entities::room;
use crate::entities::status::Status;
use crate::error::{AppError, AppResult};
use crate::handlers::resource::{
    self, BatchDeleteRequest, BatchDeleteResponse, ItemResponse, ListResponse, MessageResponse,
    MutationResponse,
};
use crate::AppState;

const NOT_FOUND: &str = "Комната не найдена";

#[derive(Debug, Deserialize)]
pub struct RoomPayload {
    pub name: Option<String>,
    #[serde(default)]
    pub status: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRow {
    pub key: String,
    pub id: i32,
    pub name: String,
    pub status: &'static str,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

fn format(room: room::Model) -> RoomRow {
    RoomRow {
        key: room.id.to_string(),
        id: room.id,
        name: room.name,
        status: room.status.label(),
        created_at: room.created_at,
        updated_at: room.updated_at,
    }
}

/// GET /api/rooms
pub async fn list(State(state): State<AppState>) -> AppResult<Json<ListResponse<RoomRow>>> {
    let rooms = room::Entity::find()
        .order_by_asc(room::Column::Name)
        .all(&state.db)
        .await?;

    let total = rooms.len();
    Ok(Json(ListResponse {
        data: rooms.into_iter().map(format).collect(),
        total,
    }))
}

/// GET /api/rooms/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ItemResponse<room::Model>>> {
    let room = resource::find_by_id::<room::Entity>(&state.db, id, NOT_FOUND).await?;
    Ok(Json(ItemResponse { data: room }))
}

/// POST /api/rooms
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<RoomPayload>,
) -> AppResult<(StatusCode, Json<MutationResponse<room::Model>>)> {
    let Some(name) = resource::non_empty(payload.name) else {
        return Err(AppError::BadRequest("Наименование обязательно".to_string()));
    };

    let new_room = room::ActiveModel {
        name: Set(name),
        status: Set(Status::from_flag(payload.status)),
        ..Default::default()
    };

    let created = new_room.insert(&state.db).await?;
    Ok((
        StatusCode::CREATED,
        Json(MutationResponse {
            data: created,
            message: "Комната успешно создана",
        }),
    ))
}

/// PUT /api/rooms/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<RoomPayload>,
) -> AppResult<Json<MutationResponse<room::Model>>> {
    let existing = resource::find_by_id::<room::Entity>(&state.db, id, NOT_FOUND).await?;
    let mut active: room::ActiveModel = existing.into();

    if let Some(name) = resource::non_empty(payload.name) {
        active.name = Set(name);
    }
    active.status = Set(Status::from_flag(payload.status));
    active.updated_at = Set(chrono::Utc::now().into());

    let updated = active.update(&state.db).await?;
    Ok(Json(MutationResponse {
        data: updated,
        message: "Комната успешно обновлена",
    }))
}

/// DELETE /api/rooms/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    resource::delete_by_id::<room::Entity>(&state.db, id, NOT_FOUND).await?;
    Ok(Json(MessageResponse {
        message: "Комната успешно удалена",
    }))
}

/// POST /api/rooms/batch-delete
pub async fn batch_remove(
    State(state): State<AppState>,
    Json(payload): Json<BatchDeleteRequest>,
) -> AppResult<Json<BatchDeleteResponse>> {
    let outcomes = resource::batch_delete::<room::Entity>(&state.db, &payload.ids, NOT_FOUND).await;
    Ok(Json(BatchDeleteResponse { data: outcomes }))
}
