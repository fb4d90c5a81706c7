use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::entities::company;
use crate::entities::status::Status;
use crate::error::{AppError, AppResult};
use crate::handlers::resource::{
    self, BatchDeleteRequest, BatchDeleteResponse, ItemResponse, ListResponse, MessageResponse,
    MutationResponse,
};
use crate::AppState;

const NOT_FOUND: &str = "Компания не найдена";
const INN_TAKEN: &str = "Компания с таким ИНН уже существует";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPayload {
    pub name: Option<String>,
    pub inn: Option<String>,
    pub form: Option<String>,
    pub address: Option<String>,
    pub tariff: Option<String>,
    pub tour_code: Option<String>,
    #[serde(default)]
    pub status: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRow {
    pub key: String,
    pub id: i32,
    pub name: String,
    pub inn: String,
    pub form: String,
    pub address: String,
    pub tariff: String,
    pub tour_code: String,
    pub status: &'static str,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

fn format(company: company::Model) -> CompanyRow {
    CompanyRow {
        key: company.id.to_string(),
        id: company.id,
        name: company.name,
        inn: company.inn,
        form: company.form.unwrap_or_default(),
        address: company.address.unwrap_or_default(),
        tariff: company.tariff.unwrap_or_default(),
        tour_code: company.tour_code.unwrap_or_default(),
        status: company.status.label(),
        created_at: company.created_at,
        updated_at: company.updated_at,
    }
}

/// GET /api/companies
pub async fn list(State(state): State<AppState>) -> AppResult<Json<ListResponse<CompanyRow>>> {
    let companies = company::Entity::find()
        .order_by_asc(company::Column::Name)
        .all(&state.db)
        .await?;

    let total = companies.len();
    Ok(Json(ListResponse {
        data: companies.into_iter().map(format).collect(),
        total,
    }))
}

/// GET /api/companies/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ItemResponse<company::Model>>> {
    let company = resource::find_by_id::<company::Entity>(&state.db, id, NOT_FOUND).await?;
    Ok(Json(ItemResponse { data: company }))
}

/// POST /api/companies
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CompanyPayload>,
) -> AppResult<(StatusCode, Json<MutationResponse<company::Model>>)> {
    let (Some(name), Some(inn)) = (
        resource::non_empty(payload.name),
        resource::non_empty(payload.inn),
    ) else {
        return Err(AppError::BadRequest(
            "Наименование и ИНН обязательны".to_string(),
        ));
    };

    resource::ensure_unique::<company::Entity>(
        &state.db,
        company::Column::Inn,
        &inn,
        company::Column::Id,
        None,
        INN_TAKEN,
    )
    .await?;

    let new_company = company::ActiveModel {
        name: Set(name),
        inn: Set(inn),
        form: Set(resource::non_empty(payload.form)),
        address: Set(resource::non_empty(payload.address)),
        tariff: Set(resource::non_empty(payload.tariff)),
        tour_code: Set(resource::non_empty(payload.tour_code)),
        status: Set(Status::from_flag(payload.status)),
        ..Default::default()
    };

    let created = new_company.insert(&state.db).await?;
    Ok((
        StatusCode::CREATED,
        Json(MutationResponse {
            data: created,
            message: "Компания успешно создана",
        }),
    ))
}

/// PUT /api/companies/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<CompanyPayload>,
) -> AppResult<Json<MutationResponse<company::Model>>> {
    let existing = resource::find_by_id::<company::Entity>(&state.db, id, NOT_FOUND).await?;
    let mut active: company::ActiveModel = existing.into();

    if let Some(name) = resource::non_empty(payload.name) {
        active.name = Set(name);
    }
    if let Some(inn) = resource::non_empty(payload.inn) {
        resource::ensure_unique::<company::Entity>(
            &state.db,
            company::Column::Inn,
            &inn,
            company::Column::Id,
            Some(id),
            INN_TAKEN,
        )
        .await?;
        active.inn = Set(inn);
    }
    active.form = Set(resource::non_empty(payload.form));
    active.address = Set(resource::non_empty(payload.address));
    active.tariff = Set(resource::non_empty(payload.tariff));
    active.tour_code = Set(resource::non_empty(payload.tour_code));
    active.status = Set(Status::from_flag(payload.status));
    active.updated_at = Set(chrono::Utc::now().into());

    let updated = active.update(&state.db).await?;
    Ok(Json(MutationResponse {
        data: updated,
        message: "Компания успешно обновлена",
    }))
}

/// DELETE /api/companies/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    resource::delete_by_id::<company::Entity>(&state.db, id, NOT_FOUND).await?;
    Ok(Json(MessageResponse {
        message: "Компания успешно удалена",
    }))
}

/// POST /api/companies/batch-delete
pub async fn batch_remove(
    State(state): State<AppState>,
    Json(payload): Json<BatchDeleteRequest>,
) -> AppResult<Json<BatchDeleteResponse>> {
    let outcomes =
        resource::batch_delete::<company::Entity>(&state.db, &payload.ids, NOT_FOUND).await;
    Ok(Json(BatchDeleteResponse { data: outcomes }))
}
