use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::entities::city;
use crate::entities::status::Status;
use crate::error::{AppError, AppResult};
use crate::handlers::resource::{
    self, BatchDeleteRequest, BatchDeleteResponse, ItemResponse, ListResponse, MessageResponse,
    MutationResponse,
};
use crate::AppState;

const NOT_FOUND: &str = "Город не найден";
const SHORT_TAKEN: &str = "Город с таким сокращением уже существует";

#[derive(Debug, Deserialize)]
pub struct CityPayload {
    pub name: Option<String>,
    pub short: Option<String>,
    #[serde(default)]
    pub status: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityRow {
    pub key: String,
    pub id: i32,
    pub name: String,
    pub short: String,
    pub status: &'static str,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

fn format(city: city::Model) -> CityRow {
    CityRow {
        key: city.id.to_string(),
        id: city.id,
        name: city.name,
        short: city.short,
        status: city.status.label(),
        created_at: city.created_at,
        updated_at: city.updated_at,
    }
}

/// GET /api/cities
pub async fn list(State(state): State<AppState>) -> AppResult<Json<ListResponse<CityRow>>> {
    let cities = city::Entity::find()
        .order_by_asc(city::Column::Name)
        .all(&state.db)
        .await?;

    let total = cities.len();
    Ok(Json(ListResponse {
        data: cities.into_iter().map(format).collect(),
        total,
    }))
}

/// GET /api/cities/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ItemResponse<city::Model>>> {
    let city = resource::find_by_id::<city::Entity>(&state.db, id, NOT_FOUND).await?;
    Ok(Json(ItemResponse { data: city }))
}

/// POST /api/cities
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CityPayload>,
) -> AppResult<(StatusCode, Json<MutationResponse<city::Model>>)> {
    let (Some(name), Some(short)) = (
        resource::non_empty(payload.name),
        resource::non_empty(payload.short),
    ) else {
        return Err(AppError::BadRequest(
            "Наименование и краткое обязательны".to_string(),
        ));
    };

    resource::ensure_unique::<city::Entity>(
        &state.db,
        city::Column::Short,
        &short,
        city::Column::Id,
        None,
        SHORT_TAKEN,
    )
    .await?;

    let new_city = city::ActiveModel {
        name: Set(name),
        short: Set(short),
        status: Set(Status::from_flag(payload.status)),
        ..Default::default()
    };

    let created = new_city.insert(&state.db).await?;
    Ok((
        StatusCode::CREATED,
        Json(MutationResponse {
            data: created,
            message: "Город успешно создан",
        }),
    ))
}

/// PUT /api/cities/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<CityPayload>,
) -> AppResult<Json<MutationResponse<city::Model>>> {
    let existing = resource::find_by_id::<city::Entity>(&state.db, id, NOT_FOUND).await?;
    let mut active: city::ActiveModel = existing.into();

    if let Some(name) = resource::non_empty(payload.name) {
        active.name = Set(name);
    }
    if let Some(short) = resource::non_empty(payload.short) {
        resource::ensure_unique::<city::Entity>(
            &state.db,
            city::Column::Short,
            &short,
            city::Column::Id,
            Some(id),
            SHORT_TAKEN,
        )
        .await?;
        active.short = Set(short);
    }
    active.status = Set(Status::from_flag(payload.status));
    active.updated_at = Set(chrono::Utc::now().into());

    let updated = active.update(&state.db).await?;
    Ok(Json(MutationResponse {
        data: updated,
        message: "Город успешно обновлен",
    }))
}

/// DELETE /api/cities/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    resource::delete_by_id::<city::Entity>(&state.db, id, NOT_FOUND).await?;
    Ok(Json(MessageResponse {
        message: "Город успешно удален",
    }))
}

/// POST /api/cities/batch-delete
pub async fn batch_remove(
    State(state): State<AppState>,
    Json(payload): Json<BatchDeleteRequest>,
) -> AppResult<Json<BatchDeleteResponse>> {
    let outcomes = resource::batch_delete::<city::Entity>(&state.db, &payload.ids, NOT_FOUND).await;
    Ok(Json(BatchDeleteResponse { data: outcomes }))
}
