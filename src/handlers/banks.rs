use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::entities::bank;
use crate::entities::status::Status;
use crate::error::{AppError, AppResult};
use crate::handlers::resource::{
    self, BatchDeleteRequest, BatchDeleteResponse, ItemResponse, ListResponse, MessageResponse,
    MutationResponse,
};
use crate::AppState;

const NOT_FOUND: &str = "Банк не найден";
const BIC_TAKEN: &str = "Банк с таким БИК уже существует";

#[derive(Debug, Deserialize)]
pub struct BankPayload {
    pub name: Option<String>,
    pub bic: Option<String>,
    #[serde(default)]
    pub status: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BankRow {
    pub key: String,
    pub id: i32,
    pub name: String,
    pub bic: String,
    pub status: &'static str,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

fn format(bank: bank::Model) -> BankRow {
    BankRow {
        key: bank.id.to_string(),
        id: bank.id,
        name: bank.name,
        bic: bank.bic,
        status: bank.status.label(),
        created_at: bank.created_at,
        updated_at: bank.updated_at,
    }
}

/// GET /api/banks
pub async fn list(State(state): State<AppState>) -> AppResult<Json<ListResponse<BankRow>>> {
    let banks = bank::Entity::find()
        .order_by_asc(bank::Column::Name)
        .all(&state.db)
        .await?;

    let total = banks.len();
    Ok(Json(ListResponse {
        data: banks.into_iter().map(format).collect(),
        total,
    }))
}

/// GET /api/banks/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ItemResponse<bank::Model>>> {
    let bank = resource::find_by_id::<bank::Entity>(&state.db, id, NOT_FOUND).await?;
    Ok(Json(ItemResponse { data: bank }))
}

/// POST /api/banks
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<BankPayload>,
) -> AppResult<(StatusCode, Json<MutationResponse<bank::Model>>)> {
    let (Some(name), Some(bic)) = (
        resource::non_empty(payload.name),
        resource::non_empty(payload.bic),
    ) else {
        return Err(AppError::BadRequest(
            "Наименование и БИК обязательны".to_string(),
        ));
    };

    resource::ensure_unique::<bank::Entity>(
        &state.db,
        bank::Column::Bic,
        &bic,
        bank::Column::Id,
        None,
        BIC_TAKEN,
    )
    .await?;

    let new_bank = bank::ActiveModel {
        name: Set(name),
        bic: Set(bic),
        status: Set(Status::from_flag(payload.status)),
        ..Default::default()
    };

    let created = new_bank.insert(&state.db).await?;
    Ok((
        StatusCode::CREATED,
        Json(MutationResponse {
            data: created,
            message: "Банк успешно создан",
        }),
    ))
}

/// PUT /api/banks/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<BankPayload>,
) -> AppResult<Json<MutationResponse<bank::Model>>> {
    let existing = resource::find_by_id::<bank::Entity>(&state.db, id, NOT_FOUND).await?;
    let mut active: bank::ActiveModel = existing.into();

    if let Some(name) = resource::non_empty(payload.name) {
        active.name = Set(name);
    }
    if let Some(bic) = resource::non_empty(payload.bic) {
        resource::ensure_unique::<bank::Entity>(
            &state.db,
            bank::Column::Bic,
            &bic,
            bank::Column::Id,
            Some(id),
            BIC_TAKEN,
        )
        .await?;
        active.bic = Set(bic);
    }
    active.status = Set(Status::from_flag(payload.status));
    active.updated_at = Set(chrono::Utc::now().into());

    let updated = active.update(&state.db).await?;
    Ok(Json(MutationResponse {
        data: updated,
        message: "Банк успешно обновлен",
    }))
}

/// DELETE /api/banks/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    resource::delete_by_id::<bank::Entity>(&state.db, id, NOT_FOUND).await?;
    Ok(Json(MessageResponse {
        message: "Банк успешно удален",
    }))
}

/// POST /api/banks/batch-delete
pub async fn batch_remove(
    State(state): State<AppState>,
    Json(payload): Json<BatchDeleteRequest>,
) -> AppResult<Json<BatchDeleteResponse>> {
    let outcomes = resource::batch_delete::<bank::Entity>(&state.db, &payload.ids, NOT_FOUND).await;
    Ok(Json(BatchDeleteResponse { data: outcomes }))
}
