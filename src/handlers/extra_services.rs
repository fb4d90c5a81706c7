use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::entities::extra_service;
use crate::entities::status::Status;
use crate::error::{AppError, AppResult};
use crate::handlers::resource::{
    self, BatchDeleteRequest, BatchDeleteResponse, ItemResponse, ListResponse, MessageResponse,
    MutationResponse,
};
use crate::AppState;

const NOT_FOUND: &str = "Доп. услуга не найдена";
const CODE_TAKEN: &str = "Код уже используется";

#[derive(Debug, Deserialize)]
pub struct ExtraServicePayload {
    pub name: Option<String>,
    pub code: Option<String>,
    #[serde(default)]
    pub status: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraServiceRow {
    pub key: String,
    pub id: i32,
    pub name: String,
    pub code: String,
    pub status: &'static str,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

fn format(service: extra_service::Model) -> ExtraServiceRow {
    ExtraServiceRow {
        key: service.id.to_string(),
        id: service.id,
        name: service.name,
        code: service.code,
        status: service.status.label(),
        created_at: service.created_at,
        updated_at: service.updated_at,
    }
}

/// GET /api/extra-services
pub async fn list(
    State(state): State<AppState>,
) -> AppResult<Json<ListResponse<ExtraServiceRow>>> {
    let services = extra_service::Entity::find()
        .order_by_asc(extra_service::Column::Name)
        .all(&state.db)
        .await?;

    let total = services.len();
    Ok(Json(ListResponse {
        data: services.into_iter().map(format).collect(),
        total,
    }))
}

/// GET /api/extra-services/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ItemResponse<extra_service::Model>>> {
    let service = resource::find_by_id::<extra_service::Entity>(&state.db, id, NOT_FOUND).await?;
    Ok(Json(ItemResponse { data: service }))
}

/// POST /api/extra-services
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ExtraServicePayload>,
) -> AppResult<(StatusCode, Json<MutationResponse<extra_service::Model>>)> {
    let (Some(name), Some(code)) = (
        resource::non_empty(payload.name),
        resource::non_empty(payload.code),
    ) else {
        return Err(AppError::BadRequest(
            "Наименование и код обязательны".to_string(),
        ));
    };

    resource::ensure_unique::<extra_service::Entity>(
        &state.db,
        extra_service::Column::Code,
        &code,
        extra_service::Column::Id,
        None,
        CODE_TAKEN,
    )
    .await?;

    let new_service = extra_service::ActiveModel {
        name: Set(name),
        code: Set(code),
        status: Set(Status::from_flag(payload.status)),
        ..Default::default()
    };

    let created = new_service.insert(&state.db).await?;
    Ok((
        StatusCode::CREATED,
        Json(MutationResponse {
            data: created,
            message: "Доп. услуга успешно создана",
        }),
    ))
}

/// PUT /api/extra-services/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<ExtraServicePayload>,
) -> AppResult<Json<MutationResponse<extra_service::Model>>> {
    let existing = resource::find_by_id::<extra_service::Entity>(&state.db, id, NOT_FOUND).await?;
    let mut active: extra_service::ActiveModel = existing.into();

    if let Some(name) = resource::non_empty(payload.name) {
        active.name = Set(name);
    }
    if let Some(code) = resource::non_empty(payload.code) {
        resource::ensure_unique::<extra_service::Entity>(
            &state.db,
            extra_service::Column::Code,
            &code,
            extra_service::Column::Id,
            Some(id),
            CODE_TAKEN,
        )
        .await?;
        active.code = Set(code);
    }
    active.status = Set(Status::from_flag(payload.status));
    active.updated_at = Set(chrono::Utc::now().into());

    let updated = active.update(&state.db).await?;
    Ok(Json(MutationResponse {
        data: updated,
        message: "Доп. услуга успешно обновлена",
    }))
}

/// DELETE /api/extra-services/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    resource::delete_by_id::<extra_service::Entity>(&state.db, id, NOT_FOUND).await?;
    Ok(Json(MessageResponse {
        message: "Доп. услуга успешно удалена",
    }))
}

/// POST /api/extra-services/batch-delete
pub async fn batch_remove(
    State(state): State<AppState>,
    Json(payload): Json<BatchDeleteRequest>,
) -> AppResult<Json<BatchDeleteResponse>> {
    let outcomes =
        resource::batch_delete::<extra_service::Entity>(&state.db, &payload.ids, NOT_FOUND).await;
    Ok(Json(BatchDeleteResponse { data: outcomes }))
}
