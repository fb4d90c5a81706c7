use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::entities::role;
use crate::entities::status::Status;
use crate::error::{AppError, AppResult};
use crate::handlers::resource::{
    self, BatchDeleteRequest, BatchDeleteResponse, ItemResponse, ListResponse, MessageResponse,
    MutationResponse,
};
use crate::AppState;

const NOT_FOUND: &str = "Роль не найдена";
const CODE_TAKEN: &str = "Роль с таким кодом уже существует";

#[derive(Debug, Deserialize)]
pub struct RolePayload {
    pub name: Option<String>,
    pub code: Option<String>,
    pub permissions: Option<Vec<String>>,
    #[serde(default)]
    pub status: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRow {
    pub key: String,
    pub id: i32,
    pub name: String,
    pub code: String,
    pub permissions: serde_json::Value,
    pub status: &'static str,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

fn format(role: role::Model) -> RoleRow {
    RoleRow {
        key: role.id.to_string(),
        id: role.id,
        name: role.name,
        code: role.code,
        permissions: role.permissions,
        status: role.status.label(),
        created_at: role.created_at,
        updated_at: role.updated_at,
    }
}

/// GET /api/roles
pub async fn list(State(state): State<AppState>) -> AppResult<Json<ListResponse<RoleRow>>> {
    let roles = role::Entity::find()
        .order_by_asc(role::Column::Name)
        .all(&state.db)
        .await?;

    let total = roles.len();
    Ok(Json(ListResponse {
        data: roles.into_iter().map(format).collect(),
        total,
    }))
}

/// GET /api/roles/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ItemResponse<role::Model>>> {
    let role = resource::find_by_id::<role::Entity>(&state.db, id, NOT_FOUND).await?;
    Ok(Json(ItemResponse { data: role }))
}

/// POST /api/roles
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<RolePayload>,
) -> AppResult<(StatusCode, Json<MutationResponse<role::Model>>)> {
    let (Some(name), Some(code)) = (
        resource::non_empty(payload.name),
        resource::non_empty(payload.code),
    ) else {
        return Err(AppError::BadRequest(
            "Наименование и код обязательны".to_string(),
        ));
    };

    resource::ensure_unique::<role::Entity>(
        &state.db,
        role::Column::Code,
        &code,
        role::Column::Id,
        None,
        CODE_TAKEN,
    )
    .await?;

    let permissions = payload.permissions.unwrap_or_default();
    let new_role = role::ActiveModel {
        name: Set(name),
        code: Set(code),
        permissions: Set(serde_json::json!(permissions)),
        status: Set(Status::from_flag(payload.status)),
        ..Default::default()
    };

    let created = new_role.insert(&state.db).await?;
    Ok((
        StatusCode::CREATED,
        Json(MutationResponse {
            data: created,
            message: "Роль успешно создана",
        }),
    ))
}

/// PUT /api/roles/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<RolePayload>,
) -> AppResult<Json<MutationResponse<role::Model>>> {
    let existing = resource::find_by_id::<role::Entity>(&state.db, id, NOT_FOUND).await?;
    let mut active: role::ActiveModel = existing.into();

    if let Some(name) = resource::non_empty(payload.name) {
        active.name = Set(name);
    }
    if let Some(code) = resource::non_empty(payload.code) {
        resource::ensure_unique::<role::Entity>(
            &state.db,
            role::Column::Code,
            &code,
            role::Column::Id,
            Some(id),
            CODE_TAKEN,
        )
        .await?;
        active.code = Set(code);
    }
    if let Some(permissions) = payload.permissions {
        active.permissions = Set(serde_json::json!(permissions));
    }
    active.status = Set(Status::from_flag(payload.status));
    active.updated_at = Set(chrono::Utc::now().into());

    let updated = active.update(&state.db).await?;
    Ok(Json(MutationResponse {
        data: updated,
        message: "Роль успешно обновлена",
    }))
}

/// DELETE /api/roles/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    resource::delete_by_id::<role::Entity>(&state.db, id, NOT_FOUND).await?;
    Ok(Json(MessageResponse {
        message: "Роль успешно удалена",
    }))
}

/// POST /api/roles/batch-delete
pub async fn batch_remove(
    State(state): State<AppState>,
    Json(payload): Json<BatchDeleteRequest>,
) -> AppResult<Json<BatchDeleteResponse>> {
    let outcomes = resource::batch_delete::<role::Entity>(&state.db, &payload.ids, NOT_FOUND).await;
    Ok(Json(BatchDeleteResponse { data: outcomes }))
}
