use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::entities::status::Status;
use crate::entities::{company, role, user};
use crate::error::{AppError, AppResult};
use crate::handlers::resource::{
    self, BatchDeleteOutcome, BatchDeleteRequest, BatchDeleteResponse, ItemResponse, ListResponse,
    MessageResponse, MutationResponse,
};
use crate::AppState;

const NOT_FOUND: &str = "Пользователь не найден";
const ACCOUNT_TAKEN: &str = "Пользователь с таким аккаунтом уже существует";
const SUPER_ADMIN_PROTECTED: &str = "Суперадмина нельзя удалить";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub full_name: Option<String>,
    pub account: Option<String>,
    pub password: Option<String>,
    pub company_id: Option<i32>,
    pub role_id: Option<i32>,
    #[serde(default)]
    pub status: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    pub key: String,
    pub id: i32,
    pub full_name: String,
    pub account: String,
    /// Related company name, "-" when unassigned.
    pub company: String,
    /// Related role name, "-" when unassigned.
    pub role: String,
    pub is_super_admin: bool,
    pub status: &'static str,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

async fn validate_relations(
    state: &AppState,
    company_id: Option<i32>,
    role_id: Option<i32>,
) -> AppResult<()> {
    if let Some(company_id) = company_id {
        company::Entity::find_by_id(company_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::BadRequest("Указанная компания не найдена".to_string()))?;
    }
    if let Some(role_id) = role_id {
        role::Entity::find_by_id(role_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::BadRequest("Указанная роль не найдена".to_string()))?;
    }
    Ok(())
}

/// GET /api/users
pub async fn list(State(state): State<AppState>) -> AppResult<Json<ListResponse<UserRow>>> {
    let users = user::Entity::find()
        .order_by_asc(user::Column::FullName)
        .all(&state.db)
        .await?;
    let companies = company::Entity::find().all(&state.db).await?;
    let roles = role::Entity::find().all(&state.db).await?;

    let rows: Vec<UserRow> = users
        .into_iter()
        .map(|u| {
            let company = u
                .company_id
                .and_then(|id| companies.iter().find(|c| c.id == id))
                .map(|c| c.name.clone())
                .unwrap_or_else(|| "-".to_string());
            let role = u
                .role_id
                .and_then(|id| roles.iter().find(|r| r.id == id))
                .map(|r| r.name.clone())
                .unwrap_or_else(|| "-".to_string());

            UserRow {
                key: u.id.to_string(),
                id: u.id,
                full_name: u.full_name,
                account: u.account,
                company,
                role,
                is_super_admin: u.is_super_admin,
                status: u.status.label(),
                created_at: u.created_at,
                updated_at: u.updated_at,
            }
        })
        .collect();

    let total = rows.len();
    Ok(Json(ListResponse { data: rows, total }))
}

/// GET /api/users/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ItemResponse<user::Model>>> {
    let user = resource::find_by_id::<user::Entity>(&state.db, id, NOT_FOUND).await?;
    Ok(Json(ItemResponse { data: user }))
}

/// POST /api/users
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<UserPayload>,
) -> AppResult<(StatusCode, Json<MutationResponse<user::Model>>)> {
    let (Some(full_name), Some(account), Some(password)) = (
        resource::non_empty(payload.full_name),
        resource::non_empty(payload.account),
        resource::non_empty(payload.password),
    ) else {
        return Err(AppError::BadRequest(
            "ФИО, аккаунт и пароль обязательны".to_string(),
        ));
    };

    resource::ensure_unique::<user::Entity>(
        &state.db,
        user::Column::Account,
        &account,
        user::Column::Id,
        None,
        ACCOUNT_TAKEN,
    )
    .await?;

    validate_relations(&state, payload.company_id, payload.role_id).await?;

    let new_user = user::ActiveModel {
        full_name: Set(full_name),
        account: Set(account),
        password_hash: Set(hash_password(&password)?),
        is_super_admin: Set(false),
        company_id: Set(payload.company_id),
        role_id: Set(payload.role_id),
        status: Set(Status::from_flag(payload.status)),
        ..Default::default()
    };

    let created = new_user.insert(&state.db).await?;
    Ok((
        StatusCode::CREATED,
        Json(MutationResponse {
            data: created,
            message: "Пользователь успешно создан",
        }),
    ))
}

/// PUT /api/users/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UserPayload>,
) -> AppResult<Json<MutationResponse<user::Model>>> {
    let existing = resource::find_by_id::<user::Entity>(&state.db, id, NOT_FOUND).await?;
    let mut active: user::ActiveModel = existing.into();

    if let Some(full_name) = resource::non_empty(payload.full_name) {
        active.full_name = Set(full_name);
    }
    if let Some(account) = resource::non_empty(payload.account) {
        resource::ensure_unique::<user::Entity>(
            &state.db,
            user::Column::Account,
            &account,
            user::Column::Id,
            Some(id),
            ACCOUNT_TAKEN,
        )
        .await?;
        active.account = Set(account);
    }
    if let Some(password) = resource::non_empty(payload.password) {
        active.password_hash = Set(hash_password(&password)?);
    }

    validate_relations(&state, payload.company_id, payload.role_id).await?;
    if payload.company_id.is_some() {
        active.company_id = Set(payload.company_id);
    }
    if payload.role_id.is_some() {
        active.role_id = Set(payload.role_id);
    }

    active.status = Set(Status::from_flag(payload.status));
    active.updated_at = Set(chrono::Utc::now().into());

    let updated = active.update(&state.db).await?;
    Ok(Json(MutationResponse {
        data: updated,
        message: "Пользователь успешно обновлен",
    }))
}

/// DELETE /api/users/{id}
///
/// Super-admin accounts are refused here, not only hidden in the dashboard.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    let user = resource::find_by_id::<user::Entity>(&state.db, id, NOT_FOUND).await?;
    if user.is_super_admin {
        return Err(AppError::BadRequest(SUPER_ADMIN_PROTECTED.to_string()));
    }

    resource::delete_by_id::<user::Entity>(&state.db, id, NOT_FOUND).await?;
    Ok(Json(MessageResponse {
        message: "Пользователь успешно удален",
    }))
}

/// POST /api/users/batch-delete
pub async fn batch_remove(
    State(state): State<AppState>,
    Json(payload): Json<BatchDeleteRequest>,
) -> AppResult<Json<BatchDeleteResponse>> {
    let mut outcomes = Vec::with_capacity(payload.ids.len());

    for &id in &payload.ids {
        let outcome = match user::Entity::find_by_id(id).one(&state.db).await {
            Ok(None) => BatchDeleteOutcome {
                id,
                deleted: false,
                message: Some(NOT_FOUND.to_string()),
            },
            Ok(Some(u)) if u.is_super_admin => BatchDeleteOutcome {
                id,
                deleted: false,
                message: Some(SUPER_ADMIN_PROTECTED.to_string()),
            },
            Ok(Some(_)) => match resource::delete_by_id::<user::Entity>(&state.db, id, NOT_FOUND)
                .await
            {
                Ok(()) => BatchDeleteOutcome {
                    id,
                    deleted: true,
                    message: None,
                },
                Err(err) => BatchDeleteOutcome {
                    id,
                    deleted: false,
                    message: Some(err.to_string()),
                },
            },
            Err(err) => BatchDeleteOutcome {
                id,
                deleted: false,
                message: Some(err.to_string()),
            },
        };
        outcomes.push(outcome);
    }

    Ok(Json(BatchDeleteResponse { data: outcomes }))
}
