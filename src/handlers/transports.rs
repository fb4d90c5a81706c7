use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use crate::entities::status::Status;
use crate::entities::transport::{self, TransportKind};
use crate::entities::transport_photo;
use crate::error::{AppError, AppResult};
use crate::handlers::resource::{
    self, BatchDeleteRequest, BatchDeleteResponse, ItemResponse, ListResponse, MessageResponse,
    MutationResponse,
};
use crate::AppState;

const NOT_FOUND: &str = "Транспорт не найден";

#[derive(Debug, Deserialize)]
pub struct TransportPayload {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub status: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportRow {
    pub key: String,
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub description: String,
    pub photos: Vec<String>,
    pub status: &'static str,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

/// Detail shape: the stored record with the photo set flattened to URLs and
/// the kind localized, as the drawer form expects.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportDetail {
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub description: Option<String>,
    pub photos: Vec<String>,
    pub status: Status,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

fn photo_urls(photos: Vec<transport_photo::Model>) -> Vec<String> {
    photos.into_iter().map(|photo| photo.url).collect()
}

fn format_row(transport: transport::Model, photos: Vec<transport_photo::Model>) -> TransportRow {
    TransportRow {
        key: transport.id.to_string(),
        id: transport.id,
        name: transport.name,
        kind: transport.kind.label(),
        description: transport.description.unwrap_or_default(),
        photos: photo_urls(photos),
        status: transport.status.label(),
        created_at: transport.created_at,
        updated_at: transport.updated_at,
    }
}

fn format_detail(
    transport: transport::Model,
    photos: Vec<transport_photo::Model>,
) -> TransportDetail {
    TransportDetail {
        id: transport.id,
        name: transport.name,
        kind: transport.kind.label(),
        description: transport.description,
        photos: photo_urls(photos),
        status: transport.status,
        created_at: transport.created_at,
        updated_at: transport.updated_at,
    }
}

async fn load_photos(
    db: &sea_orm::DatabaseConnection,
    transport_id: i32,
) -> AppResult<Vec<transport_photo::Model>> {
    Ok(transport_photo::Entity::find()
        .filter(transport_photo::Column::TransportId.eq(transport_id))
        .all(db)
        .await?)
}

/// GET /api/transports
pub async fn list(State(state): State<AppState>) -> AppResult<Json<ListResponse<TransportRow>>> {
    let transports = transport::Entity::find()
        .order_by_asc(transport::Column::Name)
        .find_with_related(transport_photo::Entity)
        .all(&state.db)
        .await?;

    let total = transports.len();
    Ok(Json(ListResponse {
        data: transports
            .into_iter()
            .map(|(transport, photos)| format_row(transport, photos))
            .collect(),
        total,
    }))
}

/// GET /api/transports/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ItemResponse<TransportDetail>>> {
    let transport = resource::find_by_id::<transport::Entity>(&state.db, id, NOT_FOUND).await?;
    let photos = load_photos(&state.db, id).await?;
    Ok(Json(ItemResponse {
        data: format_detail(transport, photos),
    }))
}

/// POST /api/transports
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<TransportPayload>,
) -> AppResult<(StatusCode, Json<MutationResponse<TransportDetail>>)> {
    let Some(name) = resource::non_empty(payload.name) else {
        return Err(AppError::BadRequest("Наименование обязательно".to_string()));
    };

    let txn = state.db.begin().await?;

    let new_transport = transport::ActiveModel {
        name: Set(name),
        kind: Set(TransportKind::parse(payload.kind.as_deref())),
        description: Set(resource::non_empty(payload.description)),
        status: Set(Status::from_flag(payload.status)),
        ..Default::default()
    };
    let created = new_transport.insert(&txn).await?;

    if !payload.photos.is_empty() {
        let photos = payload.photos.iter().map(|url| transport_photo::ActiveModel {
            transport_id: Set(created.id),
            url: Set(url.clone()),
            ..Default::default()
        });
        transport_photo::Entity::insert_many(photos).exec(&txn).await?;
    }

    txn.commit().await?;

    let photos = load_photos(&state.db, created.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(MutationResponse {
            data: format_detail(created, photos),
            message: "Транспорт успешно создан",
        }),
    ))
}

/// PUT /api/transports/{id}
///
/// The photo set is a full replace: prior photos are deleted and the
/// submitted set inserted, atomically with the field update.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<TransportPayload>,
) -> AppResult<Json<MutationResponse<TransportDetail>>> {
    let existing = resource::find_by_id::<transport::Entity>(&state.db, id, NOT_FOUND).await?;

    let txn = state.db.begin().await?;

    let mut active: transport::ActiveModel = existing.into();
    if let Some(name) = resource::non_empty(payload.name) {
        active.name = Set(name);
    }
    active.kind = Set(TransportKind::parse(payload.kind.as_deref()));
    active.description = Set(resource::non_empty(payload.description));
    active.status = Set(Status::from_flag(payload.status));
    active.updated_at = Set(chrono::Utc::now().into());
    let updated = active.update(&txn).await?;

    transport_photo::Entity::delete_many()
        .filter(transport_photo::Column::TransportId.eq(id))
        .exec(&txn)
        .await?;

    if !payload.photos.is_empty() {
        let photos = payload.photos.iter().map(|url| transport_photo::ActiveModel {
            transport_id: Set(id),
            url: Set(url.clone()),
            ..Default::default()
        });
        transport_photo::Entity::insert_many(photos).exec(&txn).await?;
    }

    txn.commit().await?;

    let photos = load_photos(&state.db, id).await?;
    Ok(Json(MutationResponse {
        data: format_detail(updated, photos),
        message: "Транспорт успешно обновлен",
    }))
}

/// DELETE /api/transports/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    resource::delete_by_id::<transport::Entity>(&state.db, id, NOT_FOUND).await?;
    Ok(Json(MessageResponse {
        message: "Транспорт успешно удален",
    }))
}

/// POST /api/transports/batch-delete
pub async fn batch_remove(
    State(state): State<AppState>,
    Json(payload): Json<BatchDeleteRequest>,
) -> AppResult<Json<BatchDeleteResponse>> {
    let outcomes =
        resource::batch_delete::<transport::Entity>(&state.db, &payload.ids, NOT_FOUND).await;
    Ok(Json(BatchDeleteResponse { data: outcomes }))
}
